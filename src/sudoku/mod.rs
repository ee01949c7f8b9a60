// src/sudoku/mod.rs

//! The binary Sudoku search problem and its quantum encoding.
//!
//! A 3x3 grid of binary cells `v0..v8` is valid when every row and every
//! column holds exactly one 1:
//!
//! ```text
//! | v0 | v1 | v2 |
//! | v3 | v4 | v5 |
//! | v6 | v7 | v8 |
//! ```
//!
//! Each row and column is a `Clause`. The `constraint` module compiles one
//! clause into reversible gates, `oracle` combines all clauses into a
//! phase-marking operator, `diffuser` provides the reflection about the
//! mean and `grover` drives the amplification loop.

pub mod constraint;
pub mod diffuser;
pub mod grover;
pub mod oracle;

pub use constraint::{or_permutation, ExactlyOneTrue, OR_MATRIX};
pub use diffuser::diffuser;
pub use grover::{GroverConfig, IterationPolicy, SudokuGrover};
pub use oracle::SudokuOracle;

use crate::core::CircuitError;
use std::fmt;

/// Largest variable count for which classical enumeration is allowed.
const MAX_VARIABLES: usize = 32;

/// Three variable indices that must hold exactly one 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Clause(pub [usize; 3]);

impl Clause {
    pub fn indices(&self) -> [usize; 3] {
        self.0
    }

    /// `true` if exactly one of the clause's variables is set in `assignment`.
    pub fn is_satisfied(&self, assignment: u64) -> bool {
        self.0.iter().filter(|&&i| assignment & (1 << i) != 0).count() == 1
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[v{}, v{}, v{}]", self.0[0], self.0[1], self.0[2])
    }
}

/// A validated list of clauses over `num_variables` binary variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseSet {
    num_variables: usize,
    clauses: Vec<Clause>,
}

impl ClauseSet {
    /// Validates and wraps `clauses`.
    ///
    /// # Errors
    /// `InvalidClause` if there are no clauses, an index is out of range,
    /// an index repeats inside a clause, or there are more than 32 variables.
    pub fn new(num_variables: usize, clauses: Vec<[usize; 3]>) -> Result<Self, CircuitError> {
        if num_variables == 0 || num_variables > MAX_VARIABLES {
            return Err(CircuitError::InvalidClause {
                message: format!("Variable count {} is outside 1..={}", num_variables, MAX_VARIABLES),
            });
        }
        if clauses.is_empty() {
            return Err(CircuitError::InvalidClause { message: "At least one clause is required".to_string() });
        }
        for (position, clause) in clauses.iter().enumerate() {
            if let Some(index) = clause.iter().find(|&&i| i >= num_variables) {
                return Err(CircuitError::InvalidClause {
                    message: format!("Clause {} refers to v{} but only {} variables exist", position, index, num_variables),
                });
            }
            if clause[0] == clause[1] || clause[1] == clause[2] || clause[0] == clause[2] {
                return Err(CircuitError::InvalidClause {
                    message: format!("Clause {} repeats a variable: {:?}", position, clause),
                });
            }
        }
        Ok(Self { num_variables, clauses: clauses.into_iter().map(Clause).collect() })
    }

    /// Rows then columns of the 3x3 grid.
    pub fn standard_3x3() -> Self {
        Self {
            num_variables: 9,
            clauses: vec![
                Clause([0, 1, 2]),
                Clause([3, 4, 5]),
                Clause([6, 7, 8]),
                Clause([0, 3, 6]),
                Clause([1, 4, 7]),
                Clause([2, 5, 8]),
            ],
        }
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Always `false` for a validated set.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Classical predicate: every clause satisfied.
    pub fn is_satisfied(&self, assignment: u64) -> bool {
        self.clauses.iter().all(|c| c.is_satisfied(assignment))
    }

    /// Every satisfying assignment, in increasing numeric order.
    pub fn solutions(&self) -> Vec<u64> {
        (0..1u64 << self.num_variables).filter(|a| self.is_satisfied(*a)).collect()
    }

    /// Outcome string for an assignment, `v0` leftmost.
    pub fn label(&self, assignment: u64) -> String {
        assignment_label(assignment, self.num_variables)
    }
}

impl Default for ClauseSet {
    fn default() -> Self {
        Self::standard_3x3()
    }
}

/// Renders `assignment` as `num_variables` characters, variable 0 first.
pub fn assignment_label(assignment: u64, num_variables: usize) -> String {
    (0..num_variables).map(|i| if assignment & (1 << i) != 0 { '1' } else { '0' }).collect()
}

/// Parses an outcome string produced by `assignment_label`.
pub fn parse_assignment(label: &str) -> Result<u64, CircuitError> {
    label.chars().enumerate().try_fold(0u64, |acc, (i, ch)| match ch {
        '0' => Ok(acc),
        '1' if i < 64 => Ok(acc | (1 << i)),
        _ => Err(CircuitError::InvalidClause { message: format!("'{}' is not a binary assignment", label) }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_set_has_six_solutions() {
        let clauses = ClauseSet::standard_3x3();
        let labels: Vec<String> = clauses.solutions().into_iter().map(|a| clauses.label(a)).collect();
        assert_eq!(labels.len(), 6);
        assert!(labels.contains(&"100010001".to_string()));
        assert!(labels.contains(&"001010100".to_string()));
        for label in &labels {
            assert_eq!(label.chars().filter(|c| *c == '1').count(), 3);
        }
    }

    #[test]
    fn test_clause_edge_cases() {
        let clause = Clause([0, 1, 2]);
        assert!(!clause.is_satisfied(0b000));
        assert!(!clause.is_satisfied(0b111));
        assert!(!clause.is_satisfied(0b011));
        assert!(clause.is_satisfied(0b010));
    }

    #[test]
    fn test_clause_set_validation() {
        assert!(ClauseSet::new(9, vec![[0, 1, 9]]).is_err());
        assert!(ClauseSet::new(9, vec![[0, 1, 1]]).is_err());
        assert!(ClauseSet::new(9, vec![]).is_err());
        assert!(ClauseSet::new(3, vec![[2, 1, 0]]).is_ok());
    }

    #[test]
    fn test_label_round_trip_for_identity_solution() -> Result<(), CircuitError> {
        let identity = parse_assignment("100010001")?;
        assert_eq!(identity, 0b1_0001_0001);
        assert_eq!(assignment_label(identity, 9), "100010001");
        assert!(parse_assignment("10x").is_err());
        Ok(())
    }
}
