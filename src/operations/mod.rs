// src/operations/mod.rs

//! Defines the gate vocabulary a circuit is written in.
//!
//! Every operation except `Measure` is reversible. The classical gates
//! (`Flip`, `ControlledFlip`, `Permutation`) permute basis states, which is
//! all the Sudoku oracle needs; `Superposition` is the only gate that
//! mixes amplitudes.

use crate::core::{CircuitError, LineId};
use std::fmt;

/// A single step of a circuit.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// NOT on one line.
    ///
    /// Analogy: Pauli-X.
    Flip {
        /// The line to invert.
        target: LineId,
    },

    /// Hadamard on one line: |0> -> |+>, |1> -> |->.
    Superposition {
        /// The line to rotate.
        target: LineId,
    },

    /// Flips `target` when every control line reads 1.
    ///
    /// With one control this is CNOT, with two a Toffoli, with more a
    /// multi-controlled Toffoli.
    ControlledFlip {
        /// Lines that must all be 1 for the flip to happen.
        controls: Vec<LineId>,
        /// The line that is flipped.
        target: LineId,
    },

    /// Applies a basis permutation to a group of lines.
    ///
    /// The local index of a basis state is built from `targets` with the
    /// first target as the least significant bit.
    Permutation {
        /// Lines the permutation acts on, least significant first.
        targets: Vec<LineId>,
        /// The validated permutation.
        table: PermutationTable,
    },

    /// Visual separator. Has no effect on the state.
    Barrier,

    /// Samples the listed lines. Measurements must close the circuit.
    Measure {
        /// Lines to read, in output order.
        targets: Vec<LineId>,
    },
}

impl Operation {
    /// Returns every line mentioned by the operation.
    pub fn involved_lines(&self) -> Vec<LineId> {
        match self {
            Operation::Flip { target } => vec![*target],
            Operation::Superposition { target } => vec![*target],
            Operation::ControlledFlip { controls, target } => {
                let mut lines = controls.clone();
                lines.push(*target);
                lines
            }
            Operation::Permutation { targets, .. } => targets.clone(),
            Operation::Barrier => Vec::new(),
            Operation::Measure { targets } => targets.clone(),
        }
    }

    /// Checks the operation's own shape: no repeated lines, non-empty
    /// line lists, permutation size matching its targets.
    pub fn validate_shape(&self) -> Result<(), CircuitError> {
        match self {
            Operation::ControlledFlip { controls, .. } if controls.is_empty() => {
                return Err(CircuitError::InvalidOperation { message: "Controlled flip needs at least one control line".to_string() });
            }
            Operation::Permutation { targets, table } => {
                if targets.is_empty() {
                    return Err(CircuitError::InvalidOperation { message: "Permutation needs at least one target line".to_string() });
                }
                if table.num_lines() != targets.len() {
                    return Err(CircuitError::InvalidPermutation {
                        message: format!(
                            "Permutation of size {} acts on {} lines but was given {} targets",
                            table.len(),
                            table.num_lines(),
                            targets.len()
                        ),
                    });
                }
            }
            Operation::Measure { targets } if targets.is_empty() => {
                return Err(CircuitError::InvalidOperation { message: "Measurement needs at least one target line".to_string() });
            }
            _ => {}
        }

        let mut lines = self.involved_lines();
        lines.sort();
        if let Some(pair) = lines.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(CircuitError::InvalidOperation {
                message: format!("Line {} appears more than once in a single operation", pair[0]),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Flip { target } => write!(f, "X {}", target),
            Operation::Superposition { target } => write!(f, "H {}", target),
            Operation::ControlledFlip { controls, target } => {
                let controls: Vec<String> = controls.iter().map(|c| c.to_string()).collect();
                write!(f, "C{}X [{}] -> {}", controls.len(), controls.join(","), target)
            }
            Operation::Permutation { targets, .. } => {
                let targets: Vec<String> = targets.iter().map(|t| t.to_string()).collect();
                write!(f, "PERM [{}]", targets.join(","))
            }
            Operation::Barrier => write!(f, "BARRIER"),
            Operation::Measure { targets } => {
                let targets: Vec<String> = targets.iter().map(|t| t.to_string()).collect();
                write!(f, "MEASURE [{}]", targets.join(","))
            }
        }
    }
}

//-------------------------------------------------------------------------
// Permutation tables
//-------------------------------------------------------------------------

/// A bijection on the `2^k` basis states of `k` lines.
///
/// `mapping[j] = i` sends basis state `|j>` to `|i>`, i.e. column `j` of
/// the equivalent unitary has its single 1 in row `i`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermutationTable {
    mapping: Vec<usize>,
    num_lines: usize,
}

impl PermutationTable {
    /// Builds a table from an explicit mapping, checking it is a bijection
    /// on a power-of-two sized basis.
    pub fn from_mapping(mapping: Vec<usize>) -> Result<Self, CircuitError> {
        let size = mapping.len();
        if size < 2 || !size.is_power_of_two() {
            return Err(CircuitError::InvalidPermutation {
                message: format!("Permutation size {} is not a power of two of at least 2", size),
            });
        }

        let mut seen = vec![false; size];
        for (source, &image) in mapping.iter().enumerate() {
            if image >= size {
                return Err(CircuitError::InvalidPermutation {
                    message: format!("Basis state {} maps outside the table ({} >= {})", source, image, size),
                });
            }
            if seen[image] {
                return Err(CircuitError::InvalidPermutation {
                    message: format!("Basis state {} is the image of more than one input", image),
                });
            }
            seen[image] = true;
        }

        Ok(Self { num_lines: size.trailing_zeros() as usize, mapping })
    }

    /// Builds a table from a square 0/1 matrix acting on column vectors.
    ///
    /// Rejects the matrix unless each row and each column holds exactly one
    /// 1 and every other entry is 0; such a matrix is unitary.
    pub fn from_matrix<const N: usize>(matrix: &[[u8; N]; N]) -> Result<Self, CircuitError> {
        let mut mapping = vec![usize::MAX; N];
        for (row, entries) in matrix.iter().enumerate() {
            let mut ones = 0;
            for (col, &entry) in entries.iter().enumerate() {
                match entry {
                    0 => {}
                    1 => {
                        ones += 1;
                        if mapping[col] != usize::MAX {
                            return Err(CircuitError::InvalidPermutation {
                                message: format!("Column {} has more than one non-zero entry", col),
                            });
                        }
                        mapping[col] = row;
                    }
                    other => {
                        return Err(CircuitError::InvalidPermutation {
                            message: format!("Entry ({}, {}) is {}; only 0 and 1 are allowed", row, col, other),
                        });
                    }
                }
            }
            if ones != 1 {
                return Err(CircuitError::InvalidPermutation {
                    message: format!("Row {} has {} non-zero entries, expected exactly one", row, ones),
                });
            }
        }
        if let Some(col) = mapping.iter().position(|&row| row == usize::MAX) {
            return Err(CircuitError::InvalidPermutation { message: format!("Column {} has no non-zero entry", col) });
        }
        Self::from_mapping(mapping)
    }

    /// Image of a local basis index.
    pub fn apply(&self, index: usize) -> usize {
        self.mapping[index]
    }

    /// Number of basis states (`2^num_lines`).
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    /// Always `false`; a table covers at least one line.
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Number of lines the table acts on.
    pub fn num_lines(&self) -> usize {
        self.num_lines
    }

    /// `true` if applying the table twice is the identity.
    pub fn is_involution(&self) -> bool {
        self.mapping.iter().enumerate().all(|(j, &i)| self.mapping[i] == j)
    }

    /// The inverse permutation.
    pub fn inverse(&self) -> Self {
        let mut mapping = vec![0; self.mapping.len()];
        for (j, &i) in self.mapping.iter().enumerate() {
            mapping[i] = j;
        }
        Self { mapping, num_lines: self.num_lines }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_matrix_swap() -> Result<(), CircuitError> {
        let swap = PermutationTable::from_matrix(&[
            [1, 0, 0, 0],
            [0, 0, 1, 0],
            [0, 1, 0, 0],
            [0, 0, 0, 1],
        ])?;
        assert_eq!(swap.num_lines(), 2);
        assert_eq!(swap.apply(1), 2);
        assert_eq!(swap.apply(2), 1);
        assert!(swap.is_involution());
        Ok(())
    }

    #[test]
    fn test_from_matrix_rejects_duplicate_row() {
        let result = PermutationTable::from_matrix(&[
            [1, 1],
            [0, 0],
        ]);
        assert!(matches!(result, Err(CircuitError::InvalidPermutation { .. })));
    }

    #[test]
    fn test_from_matrix_rejects_non_binary_entry() {
        let result = PermutationTable::from_matrix(&[
            [0, 2],
            [1, 0],
        ]);
        assert!(matches!(result, Err(CircuitError::InvalidPermutation { .. })));
    }

    #[test]
    fn test_from_mapping_rejects_non_power_of_two() {
        let result = PermutationTable::from_mapping(vec![0, 2, 1]);
        assert!(matches!(result, Err(CircuitError::InvalidPermutation { .. })));
    }

    #[test]
    fn test_inverse_of_cycle() -> Result<(), CircuitError> {
        let cycle = PermutationTable::from_mapping(vec![1, 2, 3, 0])?;
        assert!(!cycle.is_involution());
        let inverse = cycle.inverse();
        for j in 0..4 {
            assert_eq!(inverse.apply(cycle.apply(j)), j);
        }
        Ok(())
    }

    #[test]
    fn test_validate_shape_rejects_target_among_controls() {
        let op = Operation::ControlledFlip { controls: vec![LineId(0), LineId(1)], target: LineId(1) };
        assert!(matches!(op.validate_shape(), Err(CircuitError::InvalidOperation { .. })));
    }

    #[test]
    fn test_validate_shape_rejects_mismatched_table() -> Result<(), CircuitError> {
        let table = PermutationTable::from_mapping(vec![1, 0])?;
        let op = Operation::Permutation { targets: vec![LineId(0), LineId(1)], table };
        assert!(matches!(op.validate_shape(), Err(CircuitError::InvalidPermutation { .. })));
        Ok(())
    }
}
