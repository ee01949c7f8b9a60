// src/circuits/mod.rs

//! Defines structures for representing and building ordered sequences of
//! operations (`grover_sudoku::operations::Operation`).
//!
//! A `Circuit` owns its lines (grouped in named registers) and the ordered
//! list of operations applied to them. Circuits are assembled through a
//! `CircuitBuilder`, which is passed by `&mut` into every construction
//! step and validates each operation as it is appended.

use crate::core::{CircuitError, LineId};
use crate::operations::{Operation, PermutationTable};
use std::fmt;
use std::ops::Index;

/// A named, contiguous group of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    name: String,
    lines: Vec<LineId>,
}

impl Register {
    /// Register name, used as the wire label prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lines of the register in order.
    pub fn lines(&self) -> &[LineId] {
        &self.lines
    }

    /// Number of lines in the register.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// `true` if the register holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line at `offset`, or an `InvalidOperation` naming the register.
    pub fn get(&self, offset: usize) -> Result<LineId, CircuitError> {
        self.lines.get(offset).copied().ok_or_else(|| CircuitError::InvalidOperation {
            message: format!("Register '{}' has {} lines, offset {} is out of range", self.name, self.lines.len(), offset),
        })
    }
}

impl Index<usize> for Register {
    type Output = LineId;

    fn index(&self, offset: usize) -> &LineId {
        &self.lines[offset]
    }
}

/// An ordered sequence of operations over a fixed set of lines.
///
/// Analogy: `qiskit.QuantumCircuit` with its quantum registers.
#[derive(Clone, PartialEq)]
pub struct Circuit {
    /// Registers in allocation order; together they cover lines `0..num_lines`.
    registers: Vec<Register>,

    num_lines: usize,

    /// The order is the execution order.
    operations: Vec<Operation>,

    /// Set once a measurement is appended; only measurements may follow.
    measured: bool,
}

impl Circuit {
    /// Creates a new, empty circuit without any lines.
    pub fn new() -> Self {
        Self {
            registers: Vec::new(),
            num_lines: 0,
            operations: Vec::new(),
            measured: false,
        }
    }

    /// Allocates `size` fresh lines under `name` and returns the register.
    pub fn add_register(&mut self, name: &str, size: usize) -> Result<Register, CircuitError> {
        if size == 0 {
            return Err(CircuitError::InvalidOperation { message: format!("Register '{}' must hold at least one line", name) });
        }
        if self.registers.iter().any(|r| r.name == name) {
            return Err(CircuitError::InvalidOperation { message: format!("Register '{}' is already allocated", name) });
        }
        if self.num_lines + size > 64 {
            return Err(CircuitError::InvalidOperation {
                message: format!("Register '{}' would grow the circuit to {} lines; at most 64 are addressable", name, self.num_lines + size),
            });
        }
        let lines = (self.num_lines..self.num_lines + size).map(LineId).collect();
        self.num_lines += size;
        let register = Register { name: name.to_string(), lines };
        self.registers.push(register.clone());
        Ok(register)
    }

    /// Appends an operation after validating it against the circuit.
    ///
    /// # Errors
    /// * `ReferenceViolation` if the operation names a line that was never allocated.
    /// * `InvalidOperation` / `InvalidPermutation` if the operation is malformed
    ///   or follows a measurement.
    pub fn add_operation(&mut self, op: Operation) -> Result<(), CircuitError> {
        op.validate_shape()?;
        for line in op.involved_lines() {
            if line.0 >= self.num_lines {
                return Err(CircuitError::ReferenceViolation {
                    line,
                    message: format!("Circuit has {} lines", self.num_lines),
                });
            }
        }
        let is_measure = matches!(op, Operation::Measure { .. });
        if self.measured && !is_measure {
            return Err(CircuitError::InvalidOperation { message: format!("'{}' cannot follow a measurement", op) });
        }
        self.measured |= is_measure;
        self.operations.push(op);
        Ok(())
    }

    /// Registers in allocation order.
    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    /// Looks up a register by name.
    pub fn register(&self, name: &str) -> Option<&Register> {
        self.registers.iter().find(|r| r.name == name)
    }

    /// Total number of allocated lines.
    pub fn num_lines(&self) -> usize {
        self.num_lines
    }

    /// Returns a slice containing the ordered sequence of operations in this circuit.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Lines read by the measurements, in output order.
    pub fn measured_lines(&self) -> Vec<LineId> {
        self.operations
            .iter()
            .filter_map(|op| match op {
                Operation::Measure { targets } => Some(targets.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Returns the total number of operations defined in the circuit.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Wire label such as `v[3]` for a line.
    pub fn label(&self, line: LineId) -> String {
        for register in &self.registers {
            if let Some(offset) = register.lines.iter().position(|l| *l == line) {
                return format!("{}[{}]", register.name, offset);
            }
        }
        line.to_string()
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// Incrementally assembles a `Circuit`.
///
/// Each gate helper validates and appends one operation and returns the
/// builder again so calls can be chained with `?`. The scoped helpers
/// `with_negated` and `with_xor_into` apply a change, run a body and then
/// undo the change, so a temporary modification of a line cannot be left
/// unrestored.
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Creates a new, empty CircuitBuilder.
    pub fn new() -> Self {
        Self { circuit: Circuit::new() }
    }

    /// Allocates a named register of `size` lines.
    pub fn register(&mut self, name: &str, size: usize) -> Result<Register, CircuitError> {
        self.circuit.add_register(name, size)
    }

    /// Adds a single operation to the circuit being built.
    pub fn add_op(&mut self, op: Operation) -> Result<&mut Self, CircuitError> {
        self.circuit.add_operation(op)?;
        Ok(self)
    }

    /// NOT on `target`.
    pub fn x(&mut self, target: LineId) -> Result<&mut Self, CircuitError> {
        self.add_op(Operation::Flip { target })
    }

    /// Hadamard on `target`.
    pub fn h(&mut self, target: LineId) -> Result<&mut Self, CircuitError> {
        self.add_op(Operation::Superposition { target })
    }

    /// CNOT.
    pub fn cx(&mut self, control: LineId, target: LineId) -> Result<&mut Self, CircuitError> {
        self.add_op(Operation::ControlledFlip { controls: vec![control], target })
    }

    /// Toffoli.
    pub fn ccx(&mut self, control1: LineId, control2: LineId, target: LineId) -> Result<&mut Self, CircuitError> {
        self.add_op(Operation::ControlledFlip { controls: vec![control1, control2], target })
    }

    /// Multi-controlled NOT.
    pub fn mcx(&mut self, controls: &[LineId], target: LineId) -> Result<&mut Self, CircuitError> {
        self.add_op(Operation::ControlledFlip { controls: controls.to_vec(), target })
    }

    /// Basis permutation on `targets` (first target = least significant bit).
    pub fn permute(&mut self, table: &PermutationTable, targets: &[LineId]) -> Result<&mut Self, CircuitError> {
        self.add_op(Operation::Permutation { targets: targets.to_vec(), table: table.clone() })
    }

    pub fn barrier(&mut self) -> Result<&mut Self, CircuitError> {
        self.add_op(Operation::Barrier)
    }

    /// Measures `targets`; nothing but further measurements may follow.
    pub fn measure(&mut self, targets: &[LineId]) -> Result<&mut Self, CircuitError> {
        self.add_op(Operation::Measure { targets: targets.to_vec() })
    }

    /// Prepares a fresh line in |-> = (|0> - |1>)/sqrt(2).
    pub fn prepare_minus(&mut self, target: LineId) -> Result<&mut Self, CircuitError> {
        self.x(target)?.h(target)
    }

    /// Flips `lines`, runs `body`, then flips them back.
    ///
    /// The restoring flips are appended even if `body` fails; the body's
    /// error is returned afterwards.
    pub fn with_negated<F>(&mut self, lines: &[LineId], body: F) -> Result<&mut Self, CircuitError>
    where
        F: FnOnce(&mut CircuitBuilder) -> Result<(), CircuitError>,
    {
        for &line in lines {
            self.x(line)?;
        }
        let outcome = body(&mut *self);
        for &line in lines.iter().rev() {
            self.x(line)?;
        }
        outcome?;
        Ok(self)
    }

    /// XORs every source into `accumulator`, runs `body`, then undoes the
    /// XORs in reverse order so `accumulator` holds its entry value again.
    ///
    /// Inside the body, `accumulator` reads `entry ⊕ sources...`.
    pub fn with_xor_into<F>(&mut self, accumulator: LineId, sources: &[LineId], body: F) -> Result<&mut Self, CircuitError>
    where
        F: FnOnce(&mut CircuitBuilder) -> Result<(), CircuitError>,
    {
        for &source in sources {
            self.cx(source, accumulator)?;
        }
        let outcome = body(&mut *self);
        for &source in sources.iter().rev() {
            self.cx(source, accumulator)?;
        }
        outcome?;
        Ok(self)
    }

    /// Read access to the circuit under construction.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    pub fn build(self) -> Circuit {
        self.circuit
    }
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operations.is_empty() || self.num_lines == 0 {
            return writeln!(f, "Circuit[{} operations on {} lines]", self.operations.len(), self.num_lines);
        }

        let ops = &self.operations;
        let num_ops = ops.len();
        let num_lines = self.num_lines;

        let labels: Vec<String> = (0..num_lines).map(|i| self.label(LineId(i))).collect();
        let max_label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let label_padding = " ".repeat(max_label_width + 2); // Label + ": "

        const GATE_WIDTH: usize = 5; // e.g., "──H──"
        const WIRE: &str = "─────";
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        // op_grid[row][time] stores the gate/wire segment string
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_ops]; num_lines];
        // v_connect[row][time] stores the vertical connector char below this row at this time
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_ops]; num_lines];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!("{}{}{}", H_WIRE.to_string().repeat(pre_dashes), symbol, H_WIRE.to_string().repeat(post_dashes))
            }
        }

        fn connect(v_connect: &mut [Vec<char>], rows: &[usize], t: usize) {
            if let (Some(r_min), Some(r_max)) = (rows.iter().min(), rows.iter().max()) {
                for row_vec in v_connect.iter_mut().take(*r_max).skip(*r_min) {
                    row_vec[t] = V_WIRE;
                }
            }
        }

        for (t, op) in ops.iter().enumerate() {
            match op {
                Operation::Flip { target } => op_grid[target.0][t] = format_gate("X"),
                Operation::Superposition { target } => op_grid[target.0][t] = format_gate("H"),
                Operation::ControlledFlip { controls, target } => {
                    for control in controls {
                        op_grid[control.0][t] = format_gate("@");
                    }
                    op_grid[target.0][t] = format_gate("X");
                    let rows: Vec<usize> = op.involved_lines().iter().map(|l| l.0).collect();
                    connect(&mut v_connect, &rows, t);
                }
                Operation::Permutation { targets, .. } => {
                    for (i, target) in targets.iter().enumerate() {
                        op_grid[target.0][t] = format_gate(&format!("P{}", i));
                    }
                    let rows: Vec<usize> = targets.iter().map(|l| l.0).collect();
                    connect(&mut v_connect, &rows, t);
                }
                Operation::Barrier => {
                    for row in op_grid.iter_mut() {
                        row[t] = format_gate("░");
                    }
                }
                Operation::Measure { targets } => {
                    for target in targets {
                        op_grid[target.0][t] = format_gate("M");
                    }
                }
            }
        }

        writeln!(f, "Circuit[{} operations on {} lines]", num_ops, num_lines)?;
        for r in 0..num_lines {
            let label = format!("{}: ", labels[r]);
            write!(f, "{:<width$}", label, width = max_label_width + 2)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < num_lines - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_ops {
                    let connector = v_connect[r][t];
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), connector, " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_are_contiguous() -> Result<(), CircuitError> {
        let mut builder = CircuitBuilder::new();
        let v = builder.register("v", 3)?;
        let out = builder.register("out", 1)?;
        assert_eq!(v.lines(), &[LineId(0), LineId(1), LineId(2)]);
        assert_eq!(out[0], LineId(3));
        assert_eq!(builder.circuit().label(LineId(3)), "out[0]");
        Ok(())
    }

    #[test]
    fn test_register_offset_out_of_range() -> Result<(), CircuitError> {
        let mut builder = CircuitBuilder::new();
        builder.register("v", 2)?;
        let anc = builder.register("ancilla", 2)?;
        assert_eq!(anc.get(1)?, LineId(3));
        // Offset 2 is out of range even though line 2 exists.
        let err = anc.get(2).err();
        assert!(matches!(err, Some(CircuitError::InvalidOperation { .. })));
        Ok(())
    }

    #[test]
    fn test_duplicate_register_name_rejected() -> Result<(), CircuitError> {
        let mut builder = CircuitBuilder::new();
        builder.register("v", 2)?;
        assert!(builder.register("v", 1).is_err());
        Ok(())
    }

    #[test]
    fn test_unknown_line_rejected() -> Result<(), CircuitError> {
        let mut builder = CircuitBuilder::new();
        builder.register("v", 2)?;
        let err = builder.x(LineId(5)).err();
        assert!(matches!(err, Some(CircuitError::ReferenceViolation { line: LineId(5), .. })));
        Ok(())
    }

    #[test]
    fn test_gate_after_measure_rejected() -> Result<(), CircuitError> {
        let mut builder = CircuitBuilder::new();
        let v = builder.register("v", 2)?;
        builder.h(v[0])?.measure(&[v[0]])?;
        assert!(builder.x(v[1]).is_err());
        builder.measure(&[v[1]])?;
        assert_eq!(builder.circuit().measured_lines(), vec![v[0], v[1]]);
        Ok(())
    }

    #[test]
    fn test_with_negated_restores_lines() -> Result<(), CircuitError> {
        let mut builder = CircuitBuilder::new();
        let v = builder.register("v", 3)?;
        builder.with_negated(&[v[0], v[1]], |b| {
            b.ccx(v[0], v[1], v[2])?;
            Ok(())
        })?;
        let ops = builder.build().operations().to_vec();
        assert_eq!(ops.len(), 5);
        assert_eq!(ops[0], Operation::Flip { target: v[0] });
        assert_eq!(ops[3], Operation::Flip { target: v[1] });
        assert_eq!(ops[4], Operation::Flip { target: v[0] });
        Ok(())
    }

    #[test]
    fn test_with_xor_into_restores_after_failing_body() -> Result<(), CircuitError> {
        let mut builder = CircuitBuilder::new();
        let v = builder.register("v", 2)?;
        let result = builder.with_xor_into(v[1], &[v[0]], |b| {
            b.x(LineId(99))?;
            Ok(())
        });
        assert!(result.is_err());
        // Both the XOR and its undo were appended.
        assert_eq!(builder.circuit().len(), 2);
        Ok(())
    }

    #[test]
    fn test_display_lists_labels() -> Result<(), CircuitError> {
        let mut builder = CircuitBuilder::new();
        let v = builder.register("v", 2)?;
        builder.h(v[0])?.cx(v[0], v[1])?;
        let text = builder.build().to_string();
        assert!(text.starts_with("Circuit[2 operations on 2 lines]"));
        assert!(text.contains("v[0]: "));
        assert!(text.contains("──H──"));
        Ok(())
    }
}
