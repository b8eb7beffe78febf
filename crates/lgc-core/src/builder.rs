//! Randomized layered circuit construction.

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::circuit::Circuit;
use crate::coords::GateIdx;
use crate::diag::{Diagnostic, Diagnostics};
use crate::gate::{FUNNEL_KIND_POOL, GateKind, HIDDEN_KIND_POOL};

/// Structural parameters for [`generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenParams {
    /// Number of input gates.
    pub input_count: u32,
    /// Number of output gates.
    pub output_count: u32,
    /// Number of fixed-width hidden layers.
    pub layer_count: u32,
    /// Gates per fixed-width hidden layer.
    pub layer_size: u32,
}

/// Rejected generation parameters.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParamError {
    /// Every count must be at least 1.
    #[error("{name} must be at least 1")]
    Zero {
        /// The offending parameter.
        name: &'static str,
    },
}

impl GenParams {
    /// Checks that every count is at least 1.
    pub fn validate(&self) -> Result<(), ParamError> {
        for (name, value) in [
            ("input_count", self.input_count),
            ("output_count", self.output_count),
            ("layer_count", self.layer_count),
            ("layer_size", self.layer_size),
        ] {
            if value == 0 {
                return Err(ParamError::Zero { name });
            }
        }
        Ok(())
    }
}

/// A generated circuit together with everything noteworthy that happened
/// while building it.
///
/// An empty [`Diagnostics`] means the circuit is sound and fully connected;
/// otherwise it is a best-effort result (e.g. a rank narrower than a gate's
/// fan-in forced source reuse).
#[derive(Debug)]
pub struct Generated {
    /// The built circuit, sealed.
    pub circuit: Circuit,
    /// What degraded during the build, if anything.
    pub diagnostics: Diagnostics,
}

/// Builds a random layered circuit.
///
/// The shape is: `input_count` inputs, `layer_count` hidden layers of
/// `layer_size` gates drawn uniformly from the full kind pool, then funnel
/// layers halving the rank width (never below `output_count`, Wire/Not
/// excluded so narrowing performs genuine fan-in) until the width matches,
/// and finally `output_count` Wire outputs.
///
/// Each layer wires only to the immediately preceding rank. One RNG instance
/// threads through the whole build, so a fixed seed reproduces the circuit
/// exactly.
pub fn generate<R: Rng + ?Sized>(
    params: &GenParams,
    rng: &mut R,
) -> Result<Generated, ParamError> {
    params.validate()?;

    let mut circuit = Circuit::new();
    let mut diagnostics = Diagnostics::new();

    let mut rank: Vec<GateIdx> = (0..params.input_count)
        .map(|_| circuit.add_input())
        .collect();

    for _ in 0..params.layer_count {
        let layer = fill_layer(&mut circuit, params.layer_size as usize, &HIDDEN_KIND_POOL, rng);
        connect_rank(&mut circuit, &layer, &rank, rng, &mut diagnostics);
        rank = layer;
    }

    // funnel: narrow until the rank width matches the requested output count
    while rank.len() > params.output_count as usize {
        let width = rank.len().div_ceil(2).max(params.output_count as usize);
        let layer = fill_layer(&mut circuit, width, &FUNNEL_KIND_POOL, rng);
        connect_rank(&mut circuit, &layer, &rank, rng, &mut diagnostics);
        rank = layer;
    }

    let outputs: Vec<GateIdx> = (0..params.output_count)
        .map(|_| circuit.add_output())
        .collect();
    connect_rank(&mut circuit, &outputs, &rank, rng, &mut diagnostics);

    circuit.seal();
    Ok(Generated {
        circuit,
        diagnostics,
    })
}

fn fill_layer<R: Rng + ?Sized>(
    circuit: &mut Circuit,
    size: usize,
    pool: &[GateKind],
    rng: &mut R,
) -> Vec<GateIdx> {
    circuit.begin_layer();
    (0..size)
        .map(|_| circuit.add_hidden(pool[rng.random_range(0..pool.len())]))
        .collect()
}

/// Wires every gate of `gates` to sources drawn from the preceding rank.
///
/// Per gate the rank is shuffled and the first `arity` entries taken, so no
/// gate reuses a source while the rank is wide enough; a rank narrower than
/// the fan-in repeats sources cyclically and records it. A rejected connect
/// is recorded and skipped, which may leave the gate under-connected.
fn connect_rank<R: Rng + ?Sized>(
    circuit: &mut Circuit,
    gates: &[GateIdx],
    sources: &[GateIdx],
    rng: &mut R,
    diagnostics: &mut Diagnostics,
) {
    debug_assert!(!sources.is_empty(), "builder: empty source rank");
    let mut pool = sources.to_vec();

    for &g in gates {
        let arity = circuit.kind(g).arity();
        if arity == 0 {
            continue;
        }

        pool.shuffle(rng);
        if arity > pool.len() {
            diagnostics.record(Diagnostic::SourcesReused {
                gate: circuit.position(g),
            });
        }

        for slot in 0..arity {
            let source = pool[slot % pool.len()];
            if let Err(error) = circuit.connect(g, slot, source) {
                diagnostics.record(Diagnostic::ConnectRejected {
                    target: circuit.position(g),
                    slot,
                    error,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn params(inputs: u32, outputs: u32, layers: u32, size: u32) -> GenParams {
        GenParams {
            input_count: inputs,
            output_count: outputs,
            layer_count: layers,
            layer_size: size,
        }
    }

    /// Kind and wiring of every gate, in arena order.
    fn fingerprint(circuit: &Circuit) -> Vec<(GateKind, Vec<Option<GateIdx>>)> {
        circuit
            .all_gates()
            .iter()
            .map(|&g| (circuit.kind(g), circuit.input_slots(g).to_vec()))
            .collect()
    }

    #[test]
    fn test_zero_params_rejected() {
        for bad in [
            params(0, 1, 1, 1),
            params(2, 0, 1, 1),
            params(2, 1, 0, 1),
            params(2, 1, 1, 0),
        ] {
            assert!(matches!(
                generate(&bad, &mut ChaCha20Rng::seed_from_u64(0)),
                Err(ParamError::Zero { .. })
            ));
        }
    }

    #[test]
    fn test_shape_and_connectivity() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let generated = generate(&params(4, 2, 3, 6), &mut rng).unwrap();
        let circuit = generated.circuit;

        assert!(generated.diagnostics.is_clean());
        assert!(circuit.is_fully_connected());
        assert_eq!(circuit.inputs().len(), 4);
        assert_eq!(circuit.outputs().len(), 2);

        // the fixed-width layers come first, then the funnel narrows to 2
        let widths: Vec<usize> = circuit.hidden_layers().iter().map(Vec::len).collect();
        assert_eq!(&widths[..3], &[6, 6, 6]);
        assert_eq!(widths[3..], [3, 2]);

        for &q in circuit.outputs() {
            assert_eq!(circuit.kind(q), GateKind::Wire);
        }
    }

    #[test]
    fn test_funnel_layers_exclude_pass_through_kinds() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let generated = generate(&params(2, 1, 2, 16), &mut rng).unwrap();
        let circuit = generated.circuit;

        for layer in &circuit.hidden_layers()[2..] {
            for &g in layer {
                assert!(
                    matches!(
                        circuit.kind(g),
                        GateKind::And | GateKind::Or | GateKind::Xor
                    ),
                    "funnel gate {} is {:?}",
                    circuit.position(g),
                    circuit.kind(g)
                );
            }
        }
    }

    #[test]
    fn test_no_funnel_when_width_matches() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let generated = generate(&params(3, 3, 2, 3), &mut rng).unwrap();
        assert_eq!(generated.circuit.hidden_layers().len(), 2);
    }

    #[test]
    fn test_strict_layering_holds() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let generated = generate(&params(5, 2, 4, 7), &mut rng).unwrap();
        let circuit = generated.circuit;

        for layer in circuit.hidden_layers() {
            for &g in layer {
                for source in circuit.input_slots(g).iter().flatten() {
                    let src = usize::from(*source);
                    let dst = usize::from(g);
                    assert!(src < dst, "source {src} does not precede gate {dst}");
                }
            }
        }
    }

    #[test]
    fn test_fixed_seed_reproduces_the_circuit() {
        let p = params(4, 2, 3, 5);
        let a = generate(&p, &mut ChaCha20Rng::seed_from_u64(123)).unwrap();
        let b = generate(&p, &mut ChaCha20Rng::seed_from_u64(123)).unwrap();
        assert_eq!(fingerprint(&a.circuit), fingerprint(&b.circuit));

        let c = generate(&p, &mut ChaCha20Rng::seed_from_u64(124)).unwrap();
        assert_ne!(
            fingerprint(&a.circuit),
            fingerprint(&c.circuit),
            "distinct seeds should not collide on this shape"
        );
    }

    #[test]
    fn test_narrow_rank_reuses_sources() {
        // one source feeding a two-input gate: reuse is unavoidable
        let mut circuit = Circuit::new();
        let a = circuit.add_input();
        circuit.begin_layer();
        let g = circuit.add_hidden(GateKind::And);

        let mut diagnostics = Diagnostics::new();
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        connect_rank(&mut circuit, &[g], &[a], &mut rng, &mut diagnostics);

        assert_eq!(circuit.input_slots(g), &[Some(a), Some(a)]);
        assert!(
            diagnostics
                .iter()
                .any(|d| matches!(d, Diagnostic::SourcesReused { .. })),
            "expected reuse diagnostics, got {diagnostics:?}"
        );
    }

    #[test]
    fn test_wide_rank_gives_distinct_sources() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let generated = generate(&params(6, 1, 1, 8), &mut rng).unwrap();
        let circuit = generated.circuit;

        for &g in &circuit.hidden_layers()[0] {
            let sources: Vec<_> = circuit.input_slots(g).iter().flatten().copied().collect();
            let mut deduped = sources.clone();
            deduped.sort_unstable();
            deduped.dedup();
            assert_eq!(sources.len(), deduped.len(), "gate {} reused a source", circuit.position(g));
        }
    }
}
