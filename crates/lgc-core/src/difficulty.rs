//! Difficulty scoring.

use crate::circuit::Circuit;
use crate::gate::GateKind;

/// Sums per-gate complexity weights over the whole circuit.
///
/// Wire counts 0, Not/And/Or count 1, Xor counts 2; input gates are excluded
/// entirely. A commutative fold, so the score does not depend on how gates
/// are stored or iterated.
pub fn difficulty(circuit: &Circuit) -> u32 {
    circuit
        .all_gates()
        .iter()
        .map(|&g| circuit.kind(g))
        .filter(|kind| *kind != GateKind::Input)
        .map(GateKind::weight)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(kinds: &[GateKind]) -> Circuit {
        let mut circuit = Circuit::new();
        let mut prev = circuit.add_input();
        for &kind in kinds {
            circuit.begin_layer();
            let g = circuit.add_hidden(kind);
            circuit.connect(g, 0, prev).unwrap();
            if kind.arity() == 2 {
                circuit.connect(g, 1, prev).unwrap();
            }
            prev = g;
        }
        let q = circuit.add_output();
        circuit.connect(q, 0, prev).unwrap();
        circuit.seal();
        circuit
    }

    #[test]
    fn test_wires_are_free() {
        let circuit = chain(&[GateKind::Wire, GateKind::Wire, GateKind::Wire]);
        assert_eq!(difficulty(&circuit), 0);
    }

    #[test]
    fn test_single_xor_scores_two() {
        let circuit = chain(&[GateKind::Xor]);
        assert_eq!(difficulty(&circuit), 2);
    }

    #[test]
    fn test_single_and_scores_one() {
        let circuit = chain(&[GateKind::And]);
        assert_eq!(difficulty(&circuit), 1);
    }

    #[test]
    fn test_mixed_chain_sums_weights() {
        // 1 + 1 + 2 + 1 + 0, plus the free Wire output
        let circuit = chain(&[
            GateKind::And,
            GateKind::Or,
            GateKind::Xor,
            GateKind::Not,
            GateKind::Wire,
        ]);
        assert_eq!(difficulty(&circuit), 5);
    }

    #[test]
    fn test_score_is_iteration_order_independent() {
        let circuit = chain(&[GateKind::And, GateKind::Xor, GateKind::Not]);
        let total = difficulty(&circuit);

        // folding the groups separately, outputs first, reaches the same sum
        let by_groups: u32 = circuit
            .outputs()
            .iter()
            .chain(circuit.hidden_layers().iter().flatten().rev())
            .chain(circuit.inputs())
            .map(|&g| circuit.kind(g))
            .filter(|kind| *kind != GateKind::Input)
            .map(GateKind::weight)
            .sum();
        assert_eq!(total, by_groups);
    }
}
