//! Example: Grover search for the 3x3 binary Sudoku.
//!
//! Every row and column of the grid must contain exactly one 1:
//!
//! ```text
//! | v0 | v1 | v2 |
//! | v3 | v4 | v5 |
//! | v6 | v7 | v8 |
//! ```
//!
//! Settings come from the environment:
//! * `GROVER_SHOTS` - number of samples (default 1024)
//! * `GROVER_SEED` - RNG seed (default: derived from the final state)
//! * `GROVER_ITERATIONS` - a round count or `optimal` (default 2)
//! * `RUST_LOG` - tracing filter (default `info`)

use grover_sudoku::{GroverConfig, IterationPolicy, Simulator, SimulatorConfig, SudokuGrover};
use std::env;
use tracing_subscriber::EnvFilter;

fn env_number<T: std::str::FromStr>(name: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| format!("{} must be a number, got '{}'", name, raw).into()),
        Err(_) => Ok(None),
    }
}

fn iteration_policy() -> Result<IterationPolicy, Box<dyn std::error::Error>> {
    match env::var("GROVER_ITERATIONS") {
        Ok(raw) if raw.trim().eq_ignore_ascii_case("optimal") => Ok(IterationPolicy::Optimal),
        Ok(_) => Ok(IterationPolicy::Fixed(env_number("GROVER_ITERATIONS")?.unwrap_or(2))),
        Err(_) => Ok(IterationPolicy::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("--- Grover Search: 3x3 Binary Sudoku ---");

    let mut sim_config = SimulatorConfig::default();
    if let Some(shots) = env_number::<usize>("GROVER_SHOTS")? {
        sim_config = sim_config.with_shots(shots);
    }
    if let Some(seed) = env_number::<u64>("GROVER_SEED")? {
        sim_config = sim_config.with_seed(seed);
    }
    let simulator = Simulator::with_config(sim_config);

    let grover = SudokuGrover::new(GroverConfig::default().with_iterations(iteration_policy()?))?;
    println!("Grover rounds: {}", grover.iterations());
    println!("Classical solutions: {:?}", grover.solution_labels());

    let result = grover.run(&simulator)?;
    println!("\nMost frequent outcomes (v0..v8):");
    print!("{}", result.histogram(40, 12));

    let solutions = grover.solution_labels();
    let hits: usize = solutions.iter().map(|s| result.count(s)).sum();
    println!(
        "\nSolutions drew {} of {} samples ({:.1}%)",
        hits,
        result.shots(),
        100.0 * hits as f64 / result.shots().max(1) as f64
    );

    if let Some((best, _)) = result.ranked().first() {
        println!("\nMost frequent grid:");
        for row in best.as_bytes().chunks(3) {
            let cells: Vec<String> = row.iter().map(|c| (*c as char).to_string()).collect();
            println!("| {} |", cells.join(" | "));
        }
    }
    Ok(())
}
