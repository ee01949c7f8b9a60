// src/sudoku/oracle.rs

//! Phase oracle marking assignments that satisfy every clause.

use super::constraint::{or_permutation, ExactlyOneTrue};
use super::ClauseSet;
use crate::circuits::{CircuitBuilder, Register};
use crate::core::{CircuitError, LineId};
use crate::operations::PermutationTable;
use tracing::debug;

/// Clause checks plus the lines they run on.
///
/// Clause `i` reads its three variable lines, borrows ancillas `2i` and
/// `2i + 1`, and writes clause line `i`. Applying the oracle computes all
/// clause lines, flips the output line if every clause holds, and then
/// repeats the clause checks in the same order to clear the clause lines.
#[derive(Debug, Clone)]
pub struct SudokuOracle {
    clauses: ClauseSet,
    variables: Vec<LineId>,
    ancillas: Vec<LineId>,
    clause_lines: Vec<LineId>,
    output: LineId,
    checks: Vec<ExactlyOneTrue>,
    or_table: PermutationTable,
    or_inverse: PermutationTable,
}

impl SudokuOracle {
    /// Wires the oracle onto existing registers.
    ///
    /// # Errors
    /// `InvalidClause` if the registers do not match the clause set:
    /// at least `num_variables` variable lines, exactly two ancillas and
    /// one clause line per clause.
    pub fn new(
        clauses: ClauseSet,
        variables: &Register,
        ancillas: &Register,
        clause_lines: &Register,
        output: LineId,
    ) -> Result<Self, CircuitError> {
        if variables.len() < clauses.num_variables() {
            return Err(CircuitError::InvalidClause {
                message: format!("{} variables need {} lines, register '{}' has {}", clauses.num_variables(), clauses.num_variables(), variables.name(), variables.len()),
            });
        }
        if ancillas.len() != 2 * clauses.len() {
            return Err(CircuitError::InvalidClause {
                message: format!("{} clauses need {} ancilla lines, register '{}' has {}", clauses.len(), 2 * clauses.len(), ancillas.name(), ancillas.len()),
            });
        }
        if clause_lines.len() != clauses.len() {
            return Err(CircuitError::InvalidClause {
                message: format!("{} clauses need as many clause lines, register '{}' has {}", clauses.len(), clause_lines.name(), clause_lines.len()),
            });
        }

        let mut checks = Vec::with_capacity(clauses.len());
        for (i, clause) in clauses.clauses().iter().enumerate() {
            let [a, b, c] = clause.indices();
            checks.push(ExactlyOneTrue::new(
                [variables.get(a)?, variables.get(b)?, variables.get(c)?],
                [ancillas.get(2 * i)?, ancillas.get(2 * i + 1)?],
                clause_lines.get(i)?,
            )?);
        }

        let mut used = [
            &variables.lines()[..clauses.num_variables()],
            ancillas.lines(),
            clause_lines.lines(),
            &[output][..],
        ]
        .concat();
        let total = used.len();
        used.sort();
        used.dedup();
        if used.len() != total {
            return Err(CircuitError::InvalidOperation {
                message: format!(
                    "Variable, ancilla, clause and output lines must be disjoint; registers '{}', '{}', '{}' and {} share {} line(s)",
                    variables.name(),
                    ancillas.name(),
                    clause_lines.name(),
                    output,
                    total - used.len()
                ),
            });
        }

        let or_table = or_permutation()?;
        Ok(Self {
            variables: variables.lines()[..clauses.num_variables()].to_vec(),
            ancillas: ancillas.lines().to_vec(),
            clause_lines: clause_lines.lines().to_vec(),
            output,
            checks,
            or_inverse: or_table.inverse(),
            or_table,
            clauses,
        })
    }

    /// Allocates the `v`, `ancilla`, `c` and `out` registers on `builder`
    /// and wires an oracle onto them.
    pub fn allocate(builder: &mut CircuitBuilder, clauses: ClauseSet) -> Result<Self, CircuitError> {
        let variables = builder.register("v", clauses.num_variables())?;
        let ancillas = builder.register("ancilla", 2 * clauses.len())?;
        let clause_lines = builder.register("c", clauses.len())?;
        let output = builder.register("out", 1)?;
        Self::new(clauses, &variables, &ancillas, &clause_lines, output[0])
    }

    /// Appends compute, global AND onto the output line, and uncompute.
    pub fn apply(&self, builder: &mut CircuitBuilder) -> Result<(), CircuitError> {
        for check in &self.checks {
            check.apply(builder, &self.or_table)?;
        }
        builder.mcx(&self.clause_lines, self.output)?;
        // Each check owns its scratch lines, so the uncompute order is free.
        for check in &self.checks {
            check.apply(builder, &self.or_inverse)?;
        }
        debug!(clauses = self.checks.len(), operations = builder.circuit().len(), "oracle appended");
        Ok(())
    }

    pub fn clauses(&self) -> &ClauseSet {
        &self.clauses
    }

    pub fn variables(&self) -> &[LineId] {
        &self.variables
    }

    pub fn ancillas(&self) -> &[LineId] {
        &self.ancillas
    }

    pub fn clause_lines(&self) -> &[LineId] {
        &self.clause_lines
    }

    pub fn output(&self) -> LineId {
        self.output
    }

    /// Ancilla and clause lines; all must read 0 after `apply`.
    pub fn scratch_lines(&self) -> Vec<LineId> {
        [self.ancillas.as_slice(), self.clause_lines.as_slice()].concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_standard_layout() -> Result<(), CircuitError> {
        let mut builder = CircuitBuilder::new();
        let oracle = SudokuOracle::allocate(&mut builder, ClauseSet::standard_3x3())?;
        assert_eq!(builder.circuit().num_lines(), 28);
        assert_eq!(oracle.variables().len(), 9);
        assert_eq!(oracle.scratch_lines().len(), 18);
        assert_eq!(oracle.output(), LineId(27));
        Ok(())
    }

    #[test]
    fn test_mismatched_ancilla_register_rejected() -> Result<(), CircuitError> {
        let mut builder = CircuitBuilder::new();
        let v = builder.register("v", 9)?;
        let anc = builder.register("ancilla", 11)?;
        let c = builder.register("c", 6)?;
        let out = builder.register("out", 1)?;
        let result = SudokuOracle::new(ClauseSet::standard_3x3(), &v, &anc, &c, out[0]);
        assert!(matches!(result, Err(CircuitError::InvalidClause { .. })));
        Ok(())
    }

    #[test]
    fn test_shared_variable_and_ancilla_register_rejected() -> Result<(), CircuitError> {
        let clauses = ClauseSet::new(6, vec![[3, 4, 5], [0, 1, 4], [0, 1, 2]])?;
        let mut builder = CircuitBuilder::new();
        let v = builder.register("v", 6)?;
        let c = builder.register("c", 3)?;
        let out = builder.register("out", 1)?;
        let result = SudokuOracle::new(clauses, &v, &v, &c, out[0]);
        assert!(matches!(result, Err(CircuitError::InvalidOperation { .. })));
        Ok(())
    }

    #[test]
    fn test_output_inside_clause_register_rejected() -> Result<(), CircuitError> {
        let mut builder = CircuitBuilder::new();
        let v = builder.register("v", 9)?;
        let anc = builder.register("ancilla", 12)?;
        let c = builder.register("c", 6)?;
        let result = SudokuOracle::new(ClauseSet::standard_3x3(), &v, &anc, &c, c[5]);
        assert!(matches!(result, Err(CircuitError::InvalidOperation { .. })));
        Ok(())
    }

    #[test]
    fn test_wider_variable_register_uses_prefix() -> Result<(), CircuitError> {
        // Only the first `num_variables` lines of the variable register are wired.
        let clauses = ClauseSet::new(3, vec![[0, 1, 2]])?;
        let mut builder = CircuitBuilder::new();
        let wide = builder.register("wide", 6)?;
        let c = builder.register("c", 1)?;
        let anc = builder.register("ancilla", 2)?;
        let out = builder.register("out", 1)?;
        let oracle = SudokuOracle::new(clauses, &wide, &anc, &c, out[0])?;
        assert_eq!(oracle.variables(), &wide.lines()[..3]);
        Ok(())
    }

    #[test]
    fn test_apply_is_symmetric() -> Result<(), CircuitError> {
        let mut builder = CircuitBuilder::new();
        let oracle = SudokuOracle::allocate(&mut builder, ClauseSet::standard_3x3())?;
        oracle.apply(&mut builder)?;
        let ops = builder.build().operations().to_vec();
        let half = ops.len() / 2;
        assert_eq!(ops.len() % 2, 1);
        assert_eq!(ops[..half], ops[half + 1..]);
        Ok(())
    }
}
