//! JSON / structural record → circuit.
//!
//! The reverse of [`encode`](crate::encode::encode): gates are re-created
//! group-by-group in record order, so re-encoding a decoded circuit
//! regenerates the identical positional ids and edge lists.

use indexmap::IndexMap;
use lgc_core::{Circuit, Diagnostic, Diagnostics, GateIdx, GateKind};
use thiserror::Error;

use crate::record::{CircuitRecord, GateRecord};

/// Decoding failures.
///
/// These are hard errors: the record itself is malformed. Rejected
/// connections on an otherwise well-formed record degrade to diagnostics
/// instead, mirroring construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A type name outside the known vocabulary.
    #[error("{id:?}: unknown gate type {ty:?}")]
    UnknownType {
        /// Offending gate id.
        id: String,
        /// The unrecognized type name.
        ty: String,
    },
    /// A type name that may not appear in its group (e.g. `INPUT` in a
    /// hidden layer).
    #[error("{id:?}: type {ty:?} is not allowed in the {group} group")]
    MisplacedType {
        /// Offending gate id.
        id: String,
        /// The type name.
        ty: String,
        /// The group it appeared in.
        group: &'static str,
    },
    /// Two records share an id.
    #[error("duplicate gate id {id:?}")]
    DuplicateId {
        /// The repeated id.
        id: String,
    },
    /// An `Inputs` entry references an id that no record declares.
    #[error("{id:?}: unknown source id {src:?}")]
    UnknownSource {
        /// Gate whose `Inputs` list is bad.
        id: String,
        /// The unresolvable id.
        src: String,
    },
    /// More `Inputs` entries than the gate's kind has slots. (Fewer is
    /// accepted: under-connected circuits encode with omissions.)
    #[error("{id:?}: {got} inputs listed but a {ty} takes {want}")]
    TooManyInputs {
        /// Offending gate id.
        id: String,
        /// The type name.
        ty: String,
        /// The kind's arity.
        want: usize,
        /// How many entries the record lists.
        got: usize,
    },
}

/// A decoded circuit plus the diagnostics recorded while reconnecting it.
#[derive(Debug, PartialEq)]
pub struct Decoded {
    /// The reconstructed circuit, sealed.
    pub circuit: Circuit,
    /// Connection rejections hit while rewiring (empty for sound records).
    pub diagnostics: Diagnostics,
}

/// Parses a JSON string into a structural record.
pub fn from_json(json: &str) -> serde_json::Result<CircuitRecord> {
    serde_json::from_str(json)
}

/// Reconstructs a circuit from a structural record.
pub fn decode(record: &CircuitRecord) -> Result<Decoded, DecodeError> {
    let mut circuit = Circuit::new();
    let mut diagnostics = Diagnostics::new();
    let mut by_id: IndexMap<&str, GateIdx> = IndexMap::new();

    // first pass: materialize every gate; edges resolve once all ids exist
    for rec in &record.input_gates {
        let kind = parse_kind(rec, "input")?;
        if kind != GateKind::Input {
            return Err(misplaced(rec, "input"));
        }
        let idx = circuit.add_input();
        insert_id(&mut by_id, rec, idx)?;
    }

    for layer in &record.hidden_layers {
        circuit.begin_layer();
        for rec in layer {
            let kind = parse_kind(rec, "hidden")?;
            if kind == GateKind::Input {
                return Err(misplaced(rec, "hidden"));
            }
            let idx = circuit.add_hidden(kind);
            insert_id(&mut by_id, rec, idx)?;
        }
    }

    for rec in &record.output_gates {
        // outputs are always wires; the contract's type vocabulary also
        // names them OUTPUT, accept both spellings
        if rec.ty != "WIRE" && rec.ty != "OUTPUT" {
            return Err(misplaced(rec, "output"));
        }
        let idx = circuit.add_output();
        insert_id(&mut by_id, rec, idx)?;
    }

    // second pass: edges
    for rec in record.iter() {
        let idx = *by_id
            .get(rec.id.as_str())
            .expect("decode: id registered in first pass");
        let arity = circuit.kind(idx).arity();
        if rec.inputs.len() > arity {
            return Err(DecodeError::TooManyInputs {
                id: rec.id.clone(),
                ty: rec.ty.clone(),
                want: arity,
                got: rec.inputs.len(),
            });
        }

        for (slot, source_id) in rec.inputs.iter().enumerate() {
            let source = *by_id
                .get(source_id.as_str())
                .ok_or_else(|| DecodeError::UnknownSource {
                    id: rec.id.clone(),
                    src: source_id.clone(),
                })?;
            if let Err(error) = circuit.connect(idx, slot, source) {
                diagnostics.record(Diagnostic::ConnectRejected {
                    target: circuit.position(idx),
                    slot,
                    error,
                });
            }
        }
    }

    circuit.seal();
    Ok(Decoded {
        circuit,
        diagnostics,
    })
}

fn parse_kind(rec: &GateRecord, group: &'static str) -> Result<GateKind, DecodeError> {
    if rec.ty == "OUTPUT" {
        // OUTPUT is only meaningful in the output group
        return Err(misplaced(rec, group));
    }
    GateKind::from_type_name(&rec.ty).ok_or_else(|| DecodeError::UnknownType {
        id: rec.id.clone(),
        ty: rec.ty.clone(),
    })
}

fn misplaced(rec: &GateRecord, group: &'static str) -> DecodeError {
    DecodeError::MisplacedType {
        id: rec.id.clone(),
        ty: rec.ty.clone(),
        group,
    }
}

fn insert_id<'r>(
    by_id: &mut IndexMap<&'r str, GateIdx>,
    rec: &'r GateRecord,
    idx: GateIdx,
) -> Result<(), DecodeError> {
    if by_id.insert(rec.id.as_str(), idx).is_some() {
        return Err(DecodeError::DuplicateId {
            id: rec.id.clone(),
        });
    }
    Ok(())
}
