//! Diagnostic positions and messages, phase by phase.

mod binder;
mod flow;
