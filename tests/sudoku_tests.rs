// tests/sudoku_tests.rs

use grover_sudoku::sudoku::{diffuser, parse_assignment};
use grover_sudoku::{
    check_lines_clear, CircuitBuilder, CircuitError, ClauseSet, GroverConfig, IterationPolicy, SimulatorConfig,
    StateVector, SudokuGrover, SudokuOracle, simulation::Simulator,
};
use std::f64::consts::FRAC_1_SQRT_2;

const TEST_TOLERANCE: f64 = 1e-9;

// Helper: oracle circuit with the variable lines set to `assignment`.
fn oracle_on_assignment(assignment: u64, minus_output: bool) -> Result<(StateVector, SudokuOracle), CircuitError> {
    let mut builder = CircuitBuilder::new();
    let oracle = SudokuOracle::allocate(&mut builder, ClauseSet::standard_3x3())?;
    for (i, line) in oracle.variables().iter().enumerate() {
        if assignment & (1 << i) != 0 {
            builder.x(*line)?;
        }
    }
    if minus_output {
        builder.prepare_minus(oracle.output())?;
    }
    oracle.apply(&mut builder)?;
    let state = Simulator::new().final_state(&builder.build())?;
    Ok((state, oracle))
}

#[test]
fn test_oracle_flips_output_exactly_for_solutions() -> Result<(), CircuitError> {
    let clauses = ClauseSet::standard_3x3();
    let mut marked = Vec::new();

    for assignment in 0u64..512 {
        let (state, oracle) = oracle_on_assignment(assignment, false)?;
        assert_eq!(state.support_len(), 1, "oracle must keep basis states classical");
        let (index, _) = state.sorted_entries()[0];

        check_lines_clear(&state, &oracle.scratch_lines())?;
        assert_eq!(index & 0x1ff, assignment, "variables must be unchanged");

        let flipped = StateVector::bit(index, oracle.output());
        assert_eq!(flipped, clauses.is_satisfied(assignment), "assignment {}", clauses.label(assignment));
        if flipped {
            marked.push(clauses.label(assignment));
        }
    }

    assert_eq!(marked.len(), 6);
    assert!(marked.contains(&"100010001".to_string()));
    Ok(())
}

#[test]
fn test_oracle_phase_marks_solutions() -> Result<(), CircuitError> {
    let clauses = ClauseSet::standard_3x3();
    for assignment in 0u64..512 {
        let (state, oracle) = oracle_on_assignment(assignment, true)?;
        check_lines_clear(&state, &oracle.scratch_lines())?;

        let sign = if clauses.is_satisfied(assignment) { -1.0 } else { 1.0 };
        let amp_zero = state.amplitude(assignment);
        let amp_one = state.amplitude(assignment | oracle.output().mask());
        assert!((amp_zero.re - sign * FRAC_1_SQRT_2).abs() < TEST_TOLERANCE, "assignment {}", clauses.label(assignment));
        assert!((amp_one.re + sign * FRAC_1_SQRT_2).abs() < TEST_TOLERANCE, "assignment {}", clauses.label(assignment));
    }
    Ok(())
}

#[test]
fn test_oracle_on_custom_clause_layout() -> Result<(), CircuitError> {
    // v0, v1 and v4 each appear in two clauses.
    let clauses = ClauseSet::new(6, vec![[3, 4, 5], [0, 1, 4], [0, 1, 2]])?;
    let mut wrong = Vec::new();

    for assignment in 0u64..64 {
        let mut builder = CircuitBuilder::new();
        let oracle = SudokuOracle::allocate(&mut builder, clauses.clone())?;
        for (i, line) in oracle.variables().iter().enumerate() {
            if assignment & (1 << i) != 0 {
                builder.x(*line)?;
            }
        }
        oracle.apply(&mut builder)?;
        let state = Simulator::new().final_state(&builder.build())?;
        check_lines_clear(&state, &oracle.scratch_lines())?;

        let (index, _) = state.sorted_entries()[0];
        let variables_kept = index & 0x3f == assignment;
        let flipped = StateVector::bit(index, oracle.output());
        if !variables_kept || flipped != clauses.is_satisfied(assignment) {
            wrong.push(clauses.label(assignment));
        }
    }
    assert!(wrong.is_empty(), "mis-marked assignments: {:?}", wrong);
    Ok(())
}

#[test]
fn test_identity_grid_is_marked() -> Result<(), CircuitError> {
    let identity = parse_assignment("100010001")?;
    let (state, oracle) = oracle_on_assignment(identity, false)?;
    let (index, _) = state.sorted_entries()[0];
    assert!(StateVector::bit(index, oracle.output()));
    Ok(())
}

#[test]
fn test_diffuser_twice_restores_uniform_state() -> Result<(), CircuitError> {
    let mut builder = CircuitBuilder::new();
    let v = builder.register("v", 9)?;
    for line in v.lines() {
        builder.h(*line)?;
    }
    diffuser(&mut builder, v.lines())?;
    diffuser(&mut builder, v.lines())?;
    let state = Simulator::new().final_state(&builder.build())?;

    assert_eq!(state.support_len(), 512);
    let reference = state.amplitude(0);
    assert!((reference.norm() - 1.0 / 512f64.sqrt()).abs() < TEST_TOLERANCE);
    for (index, amp) in state.iter() {
        assert!((amp - reference).norm() < TEST_TOLERANCE, "amplitude at {} differs", index);
    }
    Ok(())
}

#[test]
fn test_two_rounds_favour_every_solution() -> Result<(), CircuitError> {
    let grover = SudokuGrover::new(GroverConfig::default())?;
    let solutions = grover.solution_labels();
    let probabilities = grover.probabilities(&Simulator::new())?;

    let valid: Vec<f64> = solutions.iter().map(|s| probabilities.get(s).copied().unwrap_or(0.0)).collect();
    let max_invalid = probabilities
        .iter()
        .filter(|(outcome, _)| !solutions.contains(*outcome))
        .map(|(_, p)| *p)
        .fold(0.0, f64::max);
    let min_valid = valid.iter().copied().fold(f64::INFINITY, f64::min);
    let total_valid: f64 = valid.iter().sum();

    // sin²(5θ) with sin θ = √(6/512)
    assert!((total_valid - 0.2664).abs() < 0.01, "total solution probability {}", total_valid);
    assert!(min_valid > 10.0 * max_invalid, "valid {} vs invalid {}", min_valid, max_invalid);
    Ok(())
}

#[test]
fn test_two_rounds_sampled() -> Result<(), CircuitError> {
    let grover = SudokuGrover::new(GroverConfig::default())?;
    let simulator = Simulator::with_config(SimulatorConfig::default().with_shots(4096).with_seed(2024));
    let result = grover.run(&simulator)?;
    let solutions = grover.solution_labels();

    let min_valid = solutions.iter().map(|s| result.count(s)).min().unwrap_or(0);
    let max_invalid = result
        .counts()
        .iter()
        .filter(|(outcome, _)| !solutions.contains(*outcome))
        .map(|(_, c)| *c)
        .max()
        .unwrap_or(0);
    assert!(min_valid > max_invalid, "least common solution {} vs most common non-solution {}", min_valid, max_invalid);

    let top: Vec<&str> = result.ranked().into_iter().take(6).map(|(o, _)| o).collect();
    assert!(top.contains(&"100010001"));
    Ok(())
}

#[test]
fn test_optimal_rounds_concentrate_on_solutions() -> Result<(), CircuitError> {
    let grover = SudokuGrover::new(GroverConfig::default().with_iterations(IterationPolicy::Optimal))?;
    assert_eq!(grover.iterations(), 7);

    let simulator = Simulator::with_config(SimulatorConfig::default().with_seed(5));
    let result = grover.run(&simulator)?;
    let hits: usize = grover.solution_labels().iter().map(|s| result.count(s)).sum();
    let share = hits as f64 / result.shots() as f64;
    assert!(share > 0.9, "solutions drew only {:.3} of the samples", share);
    Ok(())
}

#[test]
fn test_zero_rounds_is_uniform() -> Result<(), CircuitError> {
    let grover = SudokuGrover::new(GroverConfig::default().with_iterations(IterationPolicy::Fixed(0)))?;
    let probabilities = grover.probabilities(&Simulator::new())?;
    assert_eq!(probabilities.len(), 512);
    for p in probabilities.values() {
        assert!((p - 1.0 / 512.0).abs() < TEST_TOLERANCE);
    }
    Ok(())
}
