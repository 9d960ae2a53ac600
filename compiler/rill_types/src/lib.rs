//! Types for the Rill language.
//!
//! The type system is small: the primitives `int`, `float`, `bool`, `str`,
//! and `void`, the internal `null` and poison types, and the optional wrapper
//! `T?`. Types are interned into a [`TypeInterner`] and passed around as
//! compact [`TypeId`] handles, so type equality is an integer comparison.

mod data;
mod id;
mod interner;

pub use data::TypeData;
pub use id::TypeId;
pub use interner::TypeInterner;
