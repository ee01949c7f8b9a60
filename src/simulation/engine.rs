// src/simulation/engine.rs
use crate::core::{CircuitError, LineId, StateVector};
use crate::operations::{Operation, PermutationTable};
use num_complex::Complex;
use std::collections::BTreeMap;
use std::f64::consts::FRAC_1_SQRT_2;
use tracing::trace;

/// Evolves a sparse state vector through a sequence of operations.
/// (Internal visibility)
pub(crate) struct SimulationEngine {
    num_lines: usize,
    state: StateVector,
}

impl SimulationEngine {
    /// Initializes the engine in |0...0> over `num_lines` lines.
    pub(crate) fn init(num_lines: usize) -> Result<Self, CircuitError> {
        if num_lines == 0 {
            return Err(CircuitError::InvalidOperation { message: "Cannot initialize simulation engine with zero lines".to_string() });
        }
        if num_lines > 64 {
            return Err(CircuitError::SimulationError {
                message: format!("{} lines do not fit a 64-bit basis index", num_lines),
            });
        }
        Ok(Self { num_lines, state: StateVector::zero(num_lines) })
    }

    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: StateVector) -> Result<(), CircuitError> {
        if state.num_lines() != self.num_lines {
            Err(CircuitError::SimulationError {
                message: format!("Cannot set state: provided state spans {} lines, engine spans {}", state.num_lines(), self.num_lines),
            })
        } else {
            self.state = state;
            Ok(())
        }
    }

    pub(crate) fn state(&self) -> &StateVector {
        &self.state
    }

    pub(crate) fn into_state(self) -> StateVector {
        self.state
    }

    /// Applies a single non-measurement operation to the state.
    pub(crate) fn apply_operation(&mut self, op: &Operation) -> Result<(), CircuitError> {
        for line in op.involved_lines() {
            self.check_line(line)?;
        }
        trace!(operation = %op, support = self.state.support_len(), "applying operation");

        match op {
            Operation::Flip { target } => {
                let mask = target.mask();
                self.map_basis(|index| index ^ mask);
            }
            Operation::Superposition { target } => self.apply_hadamard(*target),
            Operation::ControlledFlip { controls, target } => {
                let control_mask = controls.iter().fold(0u64, |acc, c| acc | c.mask());
                let target_mask = target.mask();
                self.map_basis(|index| {
                    if index & control_mask == control_mask { index ^ target_mask } else { index }
                });
            }
            Operation::Permutation { targets, table } => self.apply_permutation(targets, table)?,
            Operation::Barrier => {}
            Operation::Measure { .. } => {
                return Err(CircuitError::InvalidOperation { message: "Measure operation should not be passed directly to apply_operation".to_string() });
            }
        }
        Ok(())
    }

    /// Probability of each outcome string over `lines` (first line = leftmost character).
    pub(crate) fn marginal(&self, lines: &[LineId]) -> Result<BTreeMap<String, f64>, CircuitError> {
        for line in lines {
            self.check_line(*line)?;
        }
        let mut distribution = BTreeMap::new();
        for (index, amp) in self.state.iter() {
            let outcome: String = lines.iter().map(|l| if StateVector::bit(index, *l) { '1' } else { '0' }).collect();
            *distribution.entry(outcome).or_insert(0.0) += amp.norm_sqr();
        }
        Ok(distribution)
    }

    fn check_line(&self, line: LineId) -> Result<(), CircuitError> {
        if line.0 >= self.num_lines {
            return Err(CircuitError::ReferenceViolation {
                line,
                message: format!("Line not found in simulation context of {} lines", self.num_lines),
            });
        }
        Ok(())
    }

    /// Relabels basis states through a bijection on indices.
    fn map_basis<F>(&mut self, f: F)
    where
        F: Fn(u64) -> u64,
    {
        let entries: Vec<_> = self.state.iter().map(|(index, amp)| (f(index), amp)).collect();
        self.state = StateVector::from_entries(self.num_lines, entries);
    }

    fn apply_hadamard(&mut self, target: LineId) {
        let mask = target.mask();
        let h = Complex::new(FRAC_1_SQRT_2, 0.0);
        let mut entries = Vec::with_capacity(self.state.support_len() * 2);
        for (index, amp) in self.state.iter() {
            let i0 = index & !mask;
            let i1 = index | mask;
            if index & mask == 0 {
                entries.push((i0, amp * h));
                entries.push((i1, amp * h));
            } else {
                entries.push((i0, amp * h));
                entries.push((i1, -amp * h));
            }
        }
        self.state = StateVector::from_entries(self.num_lines, entries);
    }

    fn apply_permutation(&mut self, targets: &[LineId], table: &PermutationTable) -> Result<(), CircuitError> {
        if table.num_lines() != targets.len() {
            return Err(CircuitError::InvalidPermutation {
                message: format!("Permutation over {} lines applied to {} targets", table.num_lines(), targets.len()),
            });
        }
        let clear_mask = !targets.iter().fold(0u64, |acc, t| acc | t.mask());
        self.map_basis(|index| {
            let local = targets
                .iter()
                .enumerate()
                .fold(0usize, |acc, (bit, t)| if StateVector::bit(index, *t) { acc | (1 << bit) } else { acc });
            let image = table.apply(local);
            targets
                .iter()
                .enumerate()
                .fold(index & clear_mask, |acc, (bit, t)| if image & (1 << bit) != 0 { acc | t.mask() } else { acc })
        });
        Ok(())
    }
}
