//! Exhaustive truth table enumeration.

use std::fmt;

use thiserror::Error;

use crate::circuit::Circuit;
use crate::coords::GateIdx;
use crate::diag::Diagnostics;
use crate::expr::input_symbol;

/// Upper bound on enumerable inputs; 2^20 rows keeps memory within reason.
pub const MAX_TRUTH_TABLE_INPUTS: usize = 20;

/// Exhaustive input/output listing of a circuit.
///
/// Rows are parallel input/output boolean vectors, appended in ascending
/// binary-counter order of the input assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    input_count: usize,
    output_count: usize,
    input_rows: Vec<Vec<bool>>,
    output_rows: Vec<Vec<bool>>,
}

/// Truth table construction failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TruthTableError {
    /// The circuit has more inputs than can be exhaustively enumerated.
    #[error("too many inputs to enumerate: {input_count} (max {})", MAX_TRUTH_TABLE_INPUTS)]
    TooManyInputs {
        /// How many inputs the circuit has.
        input_count: usize,
    },
}

impl TruthTable {
    /// An empty table with declared row widths.
    pub fn new(input_count: usize, output_count: usize) -> Self {
        Self {
            input_count,
            output_count,
            input_rows: Vec::new(),
            output_rows: Vec::new(),
        }
    }

    /// Appends one row.
    ///
    /// # Panics
    ///
    /// If either vector does not match the declared width.
    pub fn push_row(&mut self, inputs: Vec<bool>, outputs: Vec<bool>) {
        assert_eq!(inputs.len(), self.input_count, "truth table: input row width");
        assert_eq!(
            outputs.len(),
            self.output_count,
            "truth table: output row width"
        );
        self.input_rows.push(inputs);
        self.output_rows.push(outputs);
    }

    /// Declared input width.
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Declared output width.
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Number of rows appended so far.
    pub fn num_rows(&self) -> usize {
        self.input_rows.len()
    }

    /// The `i`-th (input vector, output vector) pair.
    pub fn row(&self, i: usize) -> (&[bool], &[bool]) {
        (&self.input_rows[i], &self.output_rows[i])
    }

    /// All input rows.
    pub fn input_rows(&self) -> &[Vec<bool>] {
        &self.input_rows
    }

    /// All output rows.
    pub fn output_rows(&self) -> &[Vec<bool>] {
        &self.output_rows
    }
}

/// Enumerates every assignment of the circuit's inputs and records the
/// outputs.
///
/// Row `i`'s input vector is the little-endian bit pattern of `i`: bit `j`
/// of the counter drives input `j`. Inputs are driven through `set_value`
/// (so only changed bits invalidate), but the interior cache is cleared
/// wholesale before each row is read, which makes the result independent of
/// evaluation order. Evaluation problems (under-connected gates) land in
/// `diagnostics`; the table itself is always complete.
pub fn build_truth_table(
    circuit: &mut Circuit,
    diagnostics: &mut Diagnostics,
) -> Result<TruthTable, TruthTableError> {
    let n = circuit.inputs().len();
    if n > MAX_TRUTH_TABLE_INPUTS {
        return Err(TruthTableError::TooManyInputs { input_count: n });
    }

    let inputs: Vec<GateIdx> = circuit.inputs().to_vec();
    let outputs: Vec<GateIdx> = circuit.outputs().to_vec();
    let mut table = TruthTable::new(n, outputs.len());

    for counter in 0u64..(1u64 << n) {
        let mut input_row = Vec::with_capacity(n);
        for (j, &input) in inputs.iter().enumerate() {
            let bit = (counter >> j) & 1 == 1;
            circuit.set_value(input, bit);
            input_row.push(bit);
        }

        circuit.clear_interior_state();
        let output_row = outputs
            .iter()
            .map(|&q| circuit.evaluate(q, diagnostics))
            .collect();
        table.push_row(input_row, output_row);
    }

    Ok(table)
}

/// Debug rendering: a fixed-width pipe table in row order. Not a stable
/// format.
impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let in_headers: Vec<String> = (0..self.input_count).map(input_symbol).collect();
        let out_headers: Vec<String> = (0..self.output_count).map(|i| format!("Q{i}")).collect();

        let cells = |row: &[bool], headers: &[String]| -> Vec<String> {
            row.iter()
                .zip(headers)
                .map(|(&b, h)| format!("{:>width$}", u8::from(b), width = h.len()))
                .collect()
        };

        writeln!(f, "{} || {}", in_headers.join(" | "), out_headers.join(" | "))?;
        for (inputs, outputs) in self.input_rows.iter().zip(&self.output_rows) {
            writeln!(
                f,
                "{} || {}",
                cells(inputs, &in_headers).join(" | "),
                cells(outputs, &out_headers).join(" | ")
            )?;
        }
        Ok(())
    }
}
