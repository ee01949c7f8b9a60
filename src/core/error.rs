//! Error handling logic

use std::fmt;

/// Identifier of a single binary line (qubit) within a circuit.
/// Ids are handed out contiguously by the `CircuitBuilder`, so the id is
/// also the line's bit position in a basis-state index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub usize);

impl LineId {
    /// Bit mask selecting this line in a basis-state index.
    pub fn mask(self) -> u64 {
        1u64 << self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Errors raised while building or simulating a circuit.
///
/// Construction problems (unknown lines, malformed clauses, a bad
/// permutation matrix) are reported when the offending piece is added,
/// never deferred to simulation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CircuitError {
    /// An operation is malformed or not allowed at this point of the circuit.
    InvalidOperation {
        /// InvalidOperation failure message
        message: String
    },

    /// An operation refers to a line the circuit never allocated.
    ReferenceViolation {
        /// The offending line
        line: LineId,
        /// ReferenceViolation failure message
        message: String
    },

    /// A permutation matrix is not a permutation, or does not fit its lines.
    InvalidPermutation {
        /// InvalidPermutation failure message
        message: String
    },

    /// A clause or clause set does not fit the variable layout.
    InvalidClause {
        /// InvalidClause failure message
        message: String
    },

    /// The state vector lost its normalization during simulation.
    Incoherence {
        /// Incoherence failure message
        message: String
    },

    /// General error encountered during the simulation process itself.
    SimulationError {
        /// SimulationError failure message
        message: String
    },
}

impl fmt::Display for CircuitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitError::InvalidOperation { message } => write!(f, "Invalid Operation: {}", message),
            CircuitError::ReferenceViolation { line, message } => write!(f, "Reference Violation ({}): {}", line, message),
            CircuitError::InvalidPermutation { message } => write!(f, "Invalid Permutation: {}", message),
            CircuitError::InvalidClause { message } => write!(f, "Invalid Clause: {}", message),
            CircuitError::Incoherence { message } => write!(f, "Incoherence Violation: {}", message),
            CircuitError::SimulationError { message } => write!(f, "Simulation Process Error: {}", message),
        }
    }
}

impl std::error::Error for CircuitError {}
