// src/sudoku/diffuser.rs

use crate::circuits::CircuitBuilder;
use crate::core::{CircuitError, LineId};

/// Appends the inversion about the mean over `lines`.
///
/// H⊗n maps |s> to |0...0>, X⊗n maps that to |1...1>, and a
/// multi-controlled Z (an H-conjugated multi-controlled X on the last
/// line) negates it; the basis changes are then undone. The result equals
/// `2|s><s| - I` up to a global sign and is its own inverse.
pub fn diffuser(builder: &mut CircuitBuilder, lines: &[LineId]) -> Result<(), CircuitError> {
    let Some((&last, controls)) = lines.split_last() else {
        return Err(CircuitError::InvalidOperation { message: "Diffuser needs at least one line".to_string() });
    };

    for &line in lines {
        builder.h(line)?;
    }
    builder.with_negated(lines, |scope| {
        scope.h(last)?;
        if controls.is_empty() {
            scope.x(last)?;
        } else {
            scope.mcx(controls, last)?;
        }
        scope.h(last)?;
        Ok(())
    })?;
    for &line in lines {
        builder.h(line)?;
    }
    Ok(())
}
