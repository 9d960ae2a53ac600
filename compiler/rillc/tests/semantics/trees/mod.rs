//! Operation tree goldens, one module per construct family.

mod assignments;
mod conditionals;
mod control_flow;
mod conversions;
mod declarations;
mod invalid;
mod invocations;
mod literals;
mod operators;
