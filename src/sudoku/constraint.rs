// src/sudoku/constraint.rs

//! Reversible "exactly one of three is true" check.
//!
//! For inputs `a, b, c` the predicate is
//! `(¬a ∧ (b ⊕ c)) ∨ (¬c ∧ (a ⊕ b))`. Each conjunct is computed into its own
//! ancilla with a Toffoli, the disjunction is written to the output line by
//! a permutation (there is no primitive reversible OR), and the conjuncts
//! are uncomputed so both ancillas end at |0>.

use crate::circuits::CircuitBuilder;
use crate::core::{CircuitError, LineId};
use crate::operations::PermutationTable;

/// OR into a target, on `(x, y, out)` with `x` as the least significant bit:
/// `|x, y, out> -> |x, y, out ⊕ (x ∨ y)>`.
///
/// Swaps local basis states 1↔5, 2↔6 and 3↔7; a self-inverse permutation.
pub const OR_MATRIX: [[u8; 8]; 8] = [
    [1, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 1, 0, 0],
    [0, 0, 0, 0, 0, 0, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 1],
    [0, 0, 0, 0, 1, 0, 0, 0],
    [0, 1, 0, 0, 0, 0, 0, 0],
    [0, 0, 1, 0, 0, 0, 0, 0],
    [0, 0, 0, 1, 0, 0, 0, 0],
];

/// The validated `OR_MATRIX`.
pub fn or_permutation() -> Result<PermutationTable, CircuitError> {
    PermutationTable::from_matrix(&OR_MATRIX)
}

/// Line assignment for one exactly-one-true check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactlyOneTrue {
    inputs: [LineId; 3],
    ancillas: [LineId; 2],
    output: LineId,
}

impl ExactlyOneTrue {
    /// # Errors
    /// `InvalidOperation` if any two of the six lines coincide.
    pub fn new(inputs: [LineId; 3], ancillas: [LineId; 2], output: LineId) -> Result<Self, CircuitError> {
        let mut lines = vec![inputs[0], inputs[1], inputs[2], ancillas[0], ancillas[1], output];
        lines.sort();
        lines.dedup();
        if lines.len() != 6 {
            return Err(CircuitError::InvalidOperation {
                message: format!("Exactly-one check needs six distinct lines, got inputs {:?}, ancillas {:?}, output {}", inputs, ancillas, output),
            });
        }
        Ok(Self { inputs, ancillas, output })
    }

    pub fn inputs(&self) -> [LineId; 3] {
        self.inputs
    }

    pub fn ancillas(&self) -> [LineId; 2] {
        self.ancillas
    }

    pub fn output(&self) -> LineId {
        self.output
    }

    /// Flips the output line iff exactly one input is 1.
    ///
    /// Inputs are unchanged and both ancillas must enter and leave at |0>.
    /// The output line may hold any value on entry, which lets the oracle
    /// run the same sequence a second time to clear it.
    pub fn apply(&self, builder: &mut CircuitBuilder, or_table: &PermutationTable) -> Result<(), CircuitError> {
        if or_table.num_lines() != 3 {
            return Err(CircuitError::InvalidPermutation {
                message: format!("OR permutation must act on 3 lines, got {}", or_table.num_lines()),
            });
        }
        let [first, second] = self.ancillas;

        self.mark_not_a_and_b_xor_c(builder)?;
        self.mark_not_c_and_a_xor_b(builder)?;
        builder.permute(or_table, &[first, second, self.output])?;
        self.mark_not_c_and_a_xor_b(builder)?;
        self.mark_not_a_and_b_xor_c(builder)?;
        Ok(())
    }

    /// `ancilla0 ^= ¬a ∧ (b ⊕ c)`, with `c` borrowed to hold `b ⊕ c`.
    fn mark_not_a_and_b_xor_c(&self, builder: &mut CircuitBuilder) -> Result<(), CircuitError> {
        let [a, b, c] = self.inputs;
        let target = self.ancillas[0];
        builder.with_negated(&[a], |scope| {
            scope.with_xor_into(c, &[b], |inner| {
                inner.ccx(a, c, target)?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    }

    /// `ancilla1 ^= ¬c ∧ (a ⊕ b)`, with `b` borrowed to hold `a ⊕ b`.
    fn mark_not_c_and_a_xor_b(&self, builder: &mut CircuitBuilder) -> Result<(), CircuitError> {
        let [a, b, c] = self.inputs;
        let target = self.ancillas[1];
        builder.with_negated(&[c], |scope| {
            scope.with_xor_into(b, &[a], |inner| {
                inner.ccx(c, b, target)?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    }
}
