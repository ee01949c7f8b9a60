// src/lib.rs

//! `grover_sudoku` - Grover search over a reversible Sudoku oracle
//!
//! The crate compiles the 3x3 binary Sudoku rules ("every row and column
//! holds exactly one 1") into reversible gates, amplifies the satisfying
//! assignments with Grover's algorithm, and samples the result on a
//! sparse state-vector simulator.

pub mod core;
pub mod operations;
pub mod circuits;
pub mod simulation;
pub mod validation;
pub mod sudoku;

// Re-export the most common types for easier top-level use
pub use core::{CircuitError, LineId, StateVector};
pub use operations::{Operation, PermutationTable};
pub use circuits::{Circuit, CircuitBuilder, Register};
pub use simulation::{SimulationResult, Simulator, SimulatorConfig};
pub use sudoku::{ClauseSet, GroverConfig, IterationPolicy, SudokuGrover, SudokuOracle};
pub use validation::{check_lines_clear, check_normalization};

// Example 1: Solving the 3x3 grid
// Builds the default search (two Grover rounds), samples it, and checks
// that the identity-permutation grid stands out.
/// ```
/// use grover_sudoku::{GroverConfig, Simulator, SimulatorConfig, SudokuGrover, CircuitError};
///
/// fn main() -> Result<(), CircuitError> {
///     let grover = SudokuGrover::new(GroverConfig::default())?;
///     let simulator = Simulator::with_config(SimulatorConfig::default().with_seed(7));
///
///     let probabilities = grover.probabilities(&simulator)?;
///     // Two rounds lift each of the 6 solutions to about 4.4%,
///     // while every other grid stays near 0.15%.
///     assert!(probabilities["100010001"] > 0.04);
///
///     let result = grover.run(&simulator)?;
///     println!("{}", result.histogram(40, 10));
///     assert_eq!(result.shots(), 1024);
///     Ok(())
/// }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Marking with the oracle alone
// Runs the phase oracle on one basis assignment and reads the output line.
/// ```
/// use grover_sudoku::{CircuitBuilder, ClauseSet, Simulator, StateVector, SudokuOracle, CircuitError};
///
/// fn main() -> Result<(), CircuitError> {
///     let mut builder = CircuitBuilder::new();
///     let oracle = SudokuOracle::allocate(&mut builder, ClauseSet::standard_3x3())?;
///     // v0, v4, v8 = 1: a valid grid.
///     for i in [0, 4, 8] {
///         builder.x(oracle.variables()[i])?;
///     }
///     oracle.apply(&mut builder)?;
///
///     let state = Simulator::new().final_state(&builder.build())?;
///     let (index, _) = state.sorted_entries()[0];
///     assert!(StateVector::bit(index, oracle.output()));
///     grover_sudoku::check_lines_clear(&state, &oracle.scratch_lines())?;
///     Ok(())
/// }
/// ```
#[doc(hidden)]
const _: () = ();
