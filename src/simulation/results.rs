// src/simulation/results.rs
use crate::core::LineId;
use std::collections::BTreeMap;
use std::fmt;

/// Frequency table produced by sampling a circuit's measured lines.
///
/// Outcome strings list the measured lines in measurement order, first
/// line leftmost.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    measured: Vec<LineId>,
    counts: BTreeMap<String, usize>,
    shots: usize,
}

impl SimulationResult {
    /// Creates a new, empty result set. (Internal visibility)
    pub(crate) fn new(measured: Vec<LineId>) -> Self {
        Self { measured, counts: BTreeMap::new(), shots: 0 }
    }

    /// Records one observation of `outcome`. (Internal visibility)
    pub(crate) fn record(&mut self, outcome: &str) {
        *self.counts.entry(outcome.to_string()).or_insert(0) += 1;
        self.shots += 1;
    }

    /// Lines that were measured, in outcome-string order.
    pub fn measured_lines(&self) -> &[LineId] {
        &self.measured
    }

    /// Number of recorded samples.
    pub fn shots(&self) -> usize {
        self.shots
    }

    /// How often `outcome` was observed (0 if never).
    pub fn count(&self, outcome: &str) -> usize {
        self.counts.get(outcome).copied().unwrap_or(0)
    }

    /// Observed share of `outcome`.
    pub fn frequency(&self, outcome: &str) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.count(outcome) as f64 / self.shots as f64
    }

    /// All observed outcomes with their counts, ordered by outcome string.
    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    /// Outcomes sorted by descending count, ties broken by outcome string.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self.counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    /// Text histogram of the `limit` most frequent outcomes, bars scaled so
    /// the largest count spans `width` characters.
    pub fn histogram(&self, width: usize, limit: usize) -> String {
        let ranked = self.ranked();
        let max = ranked.first().map(|(_, c)| *c).unwrap_or(0);
        let mut out = String::new();
        for (outcome, count) in ranked.into_iter().take(limit) {
            let bar_len = if max == 0 { 0 } else { (count * width).div_ceil(max) };
            out.push_str(&format!(
                "{} | {:<width$} {:>5} ({:.3})\n",
                outcome,
                "█".repeat(bar_len),
                count,
                self.frequency(outcome),
                width = width
            ));
        }
        out
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Results ({} shots):", self.shots)?;
        if self.counts.is_empty() {
            writeln!(f, "  No lines were measured.")?;
        } else {
            for (outcome, count) in self.ranked() {
                writeln!(f, "  {}: {}", outcome, count)?;
            }
        }
        Ok(())
    }
}
