// src/core/state.rs

use num_complex::Complex;
use num_traits::Zero;
use std::collections::HashMap;
use std::fmt;

use super::constants::AMPLITUDE_TOLERANCE;
use super::error::LineId;

/// Sparse amplitude vector over `num_lines` binary lines.
///
/// Only basis states with non-negligible amplitude are stored, keyed by
/// their basis index (bit `k` of the index is the value of line `k`).
/// The Sudoku circuit allocates 28 lines, but every ancilla is a function
/// of the variable lines, so the support never grows beyond a few thousand
/// entries even though the dense vector would hold 2^28 amplitudes.
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct StateVector {
    num_lines: usize,
    amplitudes: HashMap<u64, Complex<f64>>,
}

impl StateVector {
    /// The all-zero basis state |0...0> on `num_lines` lines.
    pub fn zero(num_lines: usize) -> Self {
        Self::basis(num_lines, 0)
    }

    /// A single basis state with amplitude 1.
    pub fn basis(num_lines: usize, index: u64) -> Self {
        let mut amplitudes = HashMap::with_capacity(1);
        amplitudes.insert(index, Complex::new(1.0, 0.0));
        Self { num_lines, amplitudes }
    }

    /// Builds a state from explicit `(index, amplitude)` pairs, dropping
    /// negligible entries and summing duplicates.
    pub(crate) fn from_entries<I>(num_lines: usize, entries: I) -> Self
    where
        I: IntoIterator<Item = (u64, Complex<f64>)>,
    {
        let mut amplitudes: HashMap<u64, Complex<f64>> = HashMap::new();
        for (index, amp) in entries {
            *amplitudes.entry(index).or_insert_with(Complex::zero) += amp;
        }
        amplitudes.retain(|_, amp| amp.norm_sqr() > AMPLITUDE_TOLERANCE);
        Self { num_lines, amplitudes }
    }

    /// Number of lines the state is defined over.
    pub fn num_lines(&self) -> usize {
        self.num_lines
    }

    /// Number of basis states currently carrying amplitude.
    pub fn support_len(&self) -> usize {
        self.amplitudes.len()
    }

    /// Amplitude of a basis state (zero when absent).
    pub fn amplitude(&self, index: u64) -> Complex<f64> {
        self.amplitudes.get(&index).copied().unwrap_or_else(Complex::zero)
    }

    /// Iterates over the non-negligible `(index, amplitude)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u64, Complex<f64>)> + '_ {
        self.amplitudes.iter().map(|(index, amp)| (*index, *amp))
    }

    /// Entries sorted by basis index, for deterministic traversal.
    pub fn sorted_entries(&self) -> Vec<(u64, Complex<f64>)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by_key(|(index, _)| *index);
        entries
    }

    /// Sum of squared amplitude magnitudes.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.values().map(|c| c.norm_sqr()).sum()
    }

    /// Value of `line` in the basis state `index`.
    pub fn bit(index: u64, line: LineId) -> bool {
        index & line.mask() != 0
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State[{} lines;", self.num_lines)?;
        for (i, (index, amp)) in self.sorted_entries().into_iter().enumerate() {
            write!(f, "{} |{:b}>: {:.4}", if i > 0 { "," } else { "" }, index, amp)?;
        }
        write!(f, "]")
    }
}
