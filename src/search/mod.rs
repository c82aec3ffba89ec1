//! Search procedures for the graph coloring problem.

/// solution state and its move operators
pub mod state;

/// simulated annealing engine
pub mod annealing;

/// greedy DSATUR construction (alternative starting state)
pub mod greedy_dsatur;
