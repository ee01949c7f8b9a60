// src/sudoku/grover.rs

//! Grover amplitude amplification over the Sudoku oracle.

use super::diffuser::diffuser;
use super::oracle::SudokuOracle;
use super::ClauseSet;
use crate::circuits::{Circuit, CircuitBuilder};
use crate::core::{CircuitError, DEFAULT_ITERATIONS};
use crate::simulation::{SimulationResult, Simulator};
use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_4;
use tracing::info;

/// How many (oracle, diffuser) rounds to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationPolicy {
    /// A fixed count.
    Fixed(usize),
    /// `⌊π/4 · √(N/M)⌋` for `N = 2^variables` and `M` classical solutions.
    Optimal,
}

impl IterationPolicy {
    /// Resolves the policy to a concrete round count for `clauses`.
    ///
    /// # Errors
    /// `InvalidClause` for `Optimal` when the clauses have no solution.
    pub fn resolve(&self, clauses: &ClauseSet) -> Result<usize, CircuitError> {
        match self {
            IterationPolicy::Fixed(n) => Ok(*n),
            IterationPolicy::Optimal => self.resolve_counted(clauses.num_variables(), clauses.solutions().len()),
        }
    }

    /// Same as `resolve` with the solution count already known.
    fn resolve_counted(&self, num_variables: usize, solutions: usize) -> Result<usize, CircuitError> {
        match self {
            IterationPolicy::Fixed(n) => Ok(*n),
            IterationPolicy::Optimal => {
                if solutions == 0 {
                    return Err(CircuitError::InvalidClause {
                        message: "No assignment satisfies the clauses; optimal iteration count is undefined".to_string(),
                    });
                }
                let space = (1u64 << num_variables) as f64;
                Ok((FRAC_PI_4 * (space / solutions as f64).sqrt()).floor() as usize)
            }
        }
    }
}

impl Default for IterationPolicy {
    fn default() -> Self {
        IterationPolicy::Fixed(DEFAULT_ITERATIONS)
    }
}

/// Problem and loop settings for `SudokuGrover`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroverConfig {
    pub clauses: ClauseSet,
    pub iterations: IterationPolicy,
}

impl GroverConfig {
    pub fn with_clauses(mut self, clauses: ClauseSet) -> Self {
        self.clauses = clauses;
        self
    }

    pub fn with_iterations(mut self, iterations: IterationPolicy) -> Self {
        self.iterations = iterations;
        self
    }
}

/// Builds and runs the full search circuit.
///
/// The circuit puts every variable line in |+>, the output line in |->,
/// applies `iterations` rounds of (oracle, diffuser) and measures the
/// variable lines.
#[derive(Debug, Clone)]
pub struct SudokuGrover {
    config: GroverConfig,
    iterations: usize,
    solution_labels: Vec<String>,
}

impl SudokuGrover {
    pub fn new(config: GroverConfig) -> Result<Self, CircuitError> {
        let clauses = &config.clauses;
        let solution_labels: Vec<String> = clauses.solutions().into_iter().map(|a| clauses.label(a)).collect();
        let iterations = config.iterations.resolve_counted(clauses.num_variables(), solution_labels.len())?;
        info!(
            variables = clauses.num_variables(),
            clauses = clauses.len(),
            solutions = solution_labels.len(),
            policy = ?config.iterations,
            iterations,
            "grover search configured"
        );
        Ok(Self { config, iterations, solution_labels })
    }

    /// Number of (oracle, diffuser) rounds the circuit applies.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn clauses(&self) -> &ClauseSet {
        &self.config.clauses
    }

    /// Assembles the measured search circuit.
    pub fn circuit(&self) -> Result<Circuit, CircuitError> {
        let mut builder = CircuitBuilder::new();
        let oracle = SudokuOracle::allocate(&mut builder, self.config.clauses.clone())?;
        let variables = oracle.variables().to_vec();

        for &line in &variables {
            builder.h(line)?;
        }
        builder.prepare_minus(oracle.output())?;
        builder.barrier()?;

        for _ in 0..self.iterations {
            oracle.apply(&mut builder)?;
            builder.barrier()?;
            diffuser(&mut builder, &variables)?;
        }
        builder.measure(&variables)?;

        let circuit = builder.build();
        info!(lines = circuit.num_lines(), operations = circuit.len(), "search circuit built");
        Ok(circuit)
    }

    /// Builds the circuit and samples it on `simulator`.
    pub fn run(&self, simulator: &Simulator) -> Result<SimulationResult, CircuitError> {
        let result = simulator.run(&self.circuit()?)?;
        let hits: usize = self.solution_labels.iter().map(|label| result.count(label)).sum();
        info!(shots = result.shots(), solution_hits = hits, "search sampled");
        Ok(result)
    }

    /// Exact probability of every outcome after the final diffuser.
    pub fn probabilities(&self, simulator: &Simulator) -> Result<BTreeMap<String, f64>, CircuitError> {
        simulator.probabilities(&self.circuit()?)
    }

    /// Classical solutions as outcome strings, enumerated once at construction.
    pub fn solution_labels(&self) -> &[String] {
        &self.solution_labels
    }
}
