//! SeaORM entities backing the closure table.

pub mod node;
pub mod node_closure;
