// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod state;
pub mod constants;

// Re-export public types for convenient access via `grover_sudoku::core::TypeName`
pub use error::{CircuitError, LineId};
pub use state::StateVector;
pub use constants::{AMPLITUDE_TOLERANCE, DEFAULT_ITERATIONS, DEFAULT_SHOTS, NORM_TOLERANCE};
