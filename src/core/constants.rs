//! Numerical constants and defaults shared across the crate.

/// Squared magnitude below which an amplitude is treated as zero and
/// dropped from the sparse state.
pub const AMPLITUDE_TOLERANCE: f64 = 1e-20;

/// Allowed deviation of the state norm from 1.0.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Measurement repetitions used when no shot count is configured.
pub const DEFAULT_SHOTS: usize = 1024;

/// Grover rounds applied when no iteration policy is chosen.
pub const DEFAULT_ITERATIONS: usize = 2;
