// src/simulation/mod.rs

//! Simulates the execution of `grover_sudoku::circuits::Circuit`.
//! This module contains the `Simulator` entry point and the internal
//! `SimulationEngine` that evolves the sparse state vector.

mod results;
pub(crate) mod engine;

pub use results::SimulationResult;

use crate::circuits::Circuit;
use crate::core::{CircuitError, StateVector, DEFAULT_SHOTS};
use crate::operations::Operation;
use crate::validation::check_normalization;
use engine::SimulationEngine;
use rand::SeedableRng;
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use std::collections::BTreeMap;
use tracing::debug;

/// Settings for a `Simulator`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Number of measurement samples drawn per run.
    pub shots: usize,
    /// Fixed RNG seed. When `None` the seed is derived from the final
    /// state, so identical circuits sample identically.
    pub seed: Option<u64>,
    /// Fail the run with `Incoherence` if the final state is not normalized.
    pub check_normalization: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self { shots: DEFAULT_SHOTS, seed: None, check_normalization: true }
    }
}

impl SimulatorConfig {
    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_normalization_check(mut self, enabled: bool) -> Self {
        self.check_normalization = enabled;
        self
    }
}

/// Runs circuits on the sparse state-vector engine and samples their
/// measurements.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Creates a new Simulator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Runs a simulation of the provided circuit.
    ///
    /// Evolves |0...0> through every gate, then draws `shots` samples over
    /// the measured lines.
    ///
    /// # Returns
    /// * `Ok(SimulationResult)` with the outcome frequency table (empty if
    ///   the circuit measures nothing).
    /// * `Err(CircuitError)` if the circuit cannot be simulated or the state
    ///   loses normalization.
    pub fn run(&self, circuit: &Circuit) -> Result<SimulationResult, CircuitError> {
        let measured = circuit.measured_lines();
        let mut result = SimulationResult::new(measured.clone());
        if circuit.is_empty() || measured.is_empty() {
            return Ok(result);
        }

        let engine = self.evolve(circuit)?;
        let distribution: Vec<(String, f64)> = engine.marginal(&measured)?.into_iter().collect();

        let seed = self.config.seed.unwrap_or_else(|| state_seed(engine.state()));
        let mut rng = StdRng::seed_from_u64(seed);

        let mut cumulative = Vec::with_capacity(distribution.len());
        let mut total = 0.0;
        for (_, p) in &distribution {
            total += *p;
            cumulative.push(total);
        }
        if distribution.is_empty() || total <= 0.0 {
            return Err(CircuitError::SimulationError { message: "Measured lines carry no probability mass".to_string() });
        }

        for _ in 0..self.config.shots {
            let u: f64 = StandardUniform.sample(&mut rng);
            let p_sample = u * total;
            let chosen = cumulative.partition_point(|c| *c <= p_sample).min(distribution.len() - 1);
            result.record(&distribution[chosen].0);
        }

        debug!(shots = self.config.shots, seed, outcomes = result.counts().len(), "sampling finished");
        Ok(result)
    }

    /// Exact probability of each outcome over the measured lines.
    pub fn probabilities(&self, circuit: &Circuit) -> Result<BTreeMap<String, f64>, CircuitError> {
        let measured = circuit.measured_lines();
        if measured.is_empty() {
            return Err(CircuitError::InvalidOperation { message: "Circuit measures no lines".to_string() });
        }
        self.evolve(circuit)?.marginal(&measured)
    }

    /// The state reached just before measurement.
    pub fn final_state(&self, circuit: &Circuit) -> Result<StateVector, CircuitError> {
        Ok(self.evolve(circuit)?.into_state())
    }

    fn evolve(&self, circuit: &Circuit) -> Result<SimulationEngine, CircuitError> {
        let mut engine = SimulationEngine::init(circuit.num_lines())?;
        debug!(lines = circuit.num_lines(), operations = circuit.len(), "simulating circuit");

        for op in circuit.operations() {
            match op {
                Operation::Measure { .. } => {} // sampled after evolution
                _ => engine.apply_operation(op)?,
            }
        }

        if self.config.check_normalization {
            check_normalization(engine.state(), None)?;
        }
        debug!(support = engine.state().support_len(), "evolution finished");
        Ok(engine)
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Seed derived from the state, rounded so that last-bit floating
/// differences do not change it.
///
/// FNV-1a over the little-endian bytes of each sorted entry, so the seed
/// is the same on every platform and toolchain.
fn state_seed(state: &StateVector) -> u64 {
    let mut hash = FNV_OFFSET;
    let mut feed = |bytes: [u8; 8]| {
        for byte in bytes {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    };
    for (index, amp) in state.sorted_entries() {
        feed(index.to_le_bytes());
        feed(((amp.re * 1e9).round() as i64).to_le_bytes());
        feed(((amp.im * 1e9).round() as i64).to_le_bytes());
    }
    hash
}
