// src/validation/mod.rs

//! Provides functions to validate a `StateVector`.

use crate::core::{CircuitError, LineId, StateVector, NORM_TOLERANCE};

/// Checks if the state vector is normalized (sum of squared amplitudes ≈ 1.0).
///
/// # Arguments
/// * `state` - The `StateVector` to check.
/// * `tolerance` - Allowed deviation from 1.0. Defaults to `NORM_TOLERANCE`.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(CircuitError::Incoherence)` if normalization fails.
pub fn check_normalization(state: &StateVector, tolerance: Option<f64>) -> Result<(), CircuitError> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sq = state.norm_sqr();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(CircuitError::Incoherence {
            message: format!(
                "State vector norm deviated significantly from 1: {} (Tolerance: {})",
                norm_sq, effective_tolerance
            ),
        })
    } else {
        Ok(())
    }
}

/// Checks that every basis state carrying amplitude has all `lines` at 0.
///
/// This is the release condition for scratch lines: after a
/// compute/uncompute pair the ancillas must be back to |0> in every
/// branch, otherwise they stay entangled with the rest of the state.
pub fn check_lines_clear(state: &StateVector, lines: &[LineId]) -> Result<(), CircuitError> {
    for (index, _) in state.sorted_entries() {
        if let Some(line) = lines.iter().find(|l| StateVector::bit(index, **l)) {
            return Err(CircuitError::Incoherence {
                message: format!("Line {} is still set in basis state |{:b}>", line, index),
            });
        }
    }
    Ok(())
}
