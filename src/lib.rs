//! Simulated annealing for the Graph Coloring problem

// #![warn(clippy::all, clippy::pedantic)]
// useful additional warnings if docs are missing, or crates imported but unused, etc.
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_extern_crates)]
#![warn(variant_size_differences)]

// not sure if already by default in clippy
#![warn(clippy::similar_names)]
#![warn(clippy::shadow_unrelated)]
#![warn(clippy::shadow_same)]
#![warn(clippy::shadow_reuse)]


/// coloring base types, solutions and checker
pub mod color;

/// read DIMACS "col" format
pub mod dimacs;

/// graph with mutable coloring state (search states own copies of it)
pub mod graph;

/// export/import the instance as a MathProg data file (GLPK interoperability)
pub mod mathprog;

/// helper and utility methods for executables
pub mod util;

/// search procedures for the graph coloring problem
pub mod search;
