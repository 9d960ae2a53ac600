//! Control-flow graph goldens.

mod branching;
mod captures;
mod loops;
mod regions;
mod short_circuit;
mod straight_line;
mod unreachable;
