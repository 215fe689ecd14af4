//! Reusable view components.

pub mod summit_graph;
