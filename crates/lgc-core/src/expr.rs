//! Boolean-algebra expression synthesis.

use std::collections::HashMap;

use crate::circuit::Circuit;
use crate::coords::GateIdx;
use crate::gate::GateKind;

/// Symbolic name for input position `i`.
///
/// `A`..`Z`, continuing spreadsheet-style (`AA`, `AB`, ...) past 26.
pub fn input_symbol(i: usize) -> String {
    let mut n = i + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}

/// Renders one boolean expression per output gate.
///
/// Rendering is memoized by gate identity (arena index), so a gate read by
/// several downstream consumers is rendered once and its substring reused.
/// Inputs render as their positional symbol, Not as `¬(inner)`, Wire passes
/// the inner expression through unchanged, and the two-input kinds render as
/// `(left OP right)` — always parenthesized. A missing connection renders a
/// sentinel token instead of failing, so a malformed circuit still yields a
/// complete expression set.
pub fn boolean_expressions(circuit: &Circuit) -> Vec<String> {
    let symbols: HashMap<GateIdx, String> = circuit
        .inputs()
        .iter()
        .enumerate()
        .map(|(i, &g)| (g, input_symbol(i)))
        .collect();

    let mut memo: HashMap<GateIdx, String> = HashMap::new();
    circuit
        .outputs()
        .iter()
        .map(|&q| render(circuit, q, &mut memo, &symbols))
        .collect()
}

fn render(
    circuit: &Circuit,
    idx: GateIdx,
    memo: &mut HashMap<GateIdx, String>,
    symbols: &HashMap<GateIdx, String>,
) -> String {
    if let Some(expression) = memo.get(&idx) {
        return expression.clone();
    }

    let expression = match circuit.kind(idx) {
        GateKind::Input => symbols
            .get(&idx)
            .cloned()
            .unwrap_or_else(|| circuit.position(idx).canonical_id()),
        GateKind::Not => match circuit.input_slots(idx)[0] {
            Some(source) => format!("¬({})", render(circuit, source, memo, symbols)),
            None => missing_token(circuit, idx),
        },
        GateKind::Wire => match circuit.input_slots(idx)[0] {
            Some(source) => render(circuit, source, memo, symbols),
            None => missing_token(circuit, idx),
        },
        GateKind::And => binary(circuit, idx, "∧", memo, symbols),
        GateKind::Or => binary(circuit, idx, "∨", memo, symbols),
        GateKind::Xor => binary(circuit, idx, "⊕", memo, symbols),
    };

    memo.insert(idx, expression.clone());
    expression
}

fn binary(
    circuit: &Circuit,
    idx: GateIdx,
    op: &str,
    memo: &mut HashMap<GateIdx, String>,
    symbols: &HashMap<GateIdx, String>,
) -> String {
    match (circuit.input_slots(idx)[0], circuit.input_slots(idx)[1]) {
        (Some(left), Some(right)) => {
            let left = render(circuit, left, memo, symbols);
            let right = render(circuit, right, memo, symbols);
            format!("({left} {op} {right})")
        }
        _ => missing_token(circuit, idx),
    }
}

fn missing_token(circuit: &Circuit, idx: GateIdx) -> String {
    format!("<unconnected:{}>", circuit.position(idx).canonical_id())
}
