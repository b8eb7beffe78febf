//! Circuit → structural record → JSON.

use std::fs;
use std::io;
use std::path::Path;

use lgc_core::{Circuit, GateIdx};

use crate::record::{CircuitRecord, GateRecord};

/// Builds the structural record for a circuit.
///
/// Ids are canonical and purely positional, so encoding the same topology
/// always yields the same record regardless of how it was built. A gate's
/// `Inputs` lists the ids of its connected sources in slot order; an
/// unconnected slot is omitted (with a warning), which keeps the record
/// well-formed for partially-connected circuits.
pub fn encode(circuit: &Circuit) -> CircuitRecord {
    CircuitRecord {
        input_gates: circuit
            .inputs()
            .iter()
            .map(|&g| gate_record(circuit, g))
            .collect(),
        hidden_layers: circuit
            .hidden_layers()
            .iter()
            .map(|layer| layer.iter().map(|&g| gate_record(circuit, g)).collect())
            .collect(),
        output_gates: circuit
            .outputs()
            .iter()
            .map(|&g| gate_record(circuit, g))
            .collect(),
    }
}

fn gate_record(circuit: &Circuit, idx: GateIdx) -> GateRecord {
    let id = circuit.position(idx).canonical_id();
    let mut inputs = Vec::new();
    for (slot, source) in circuit.input_slots(idx).iter().enumerate() {
        match source {
            Some(source) => inputs.push(circuit.position(*source).canonical_id()),
            None => tracing::warn!("{id}: slot {slot} is unconnected, omitted from record"),
        }
    }

    GateRecord {
        id,
        ty: circuit.kind(idx).type_name().to_owned(),
        inputs,
    }
}

/// Pretty-prints a record as JSON.
pub fn to_json(record: &CircuitRecord) -> serde_json::Result<String> {
    serde_json::to_string_pretty(record)
}

/// Outcome of [`export`]: the JSON string, plus the write failure if
/// persisting it was requested and failed.
#[derive(Debug)]
pub struct Export {
    /// The encoded record, always present.
    pub json: String,
    /// The filesystem error, when a save path was given and writing failed.
    pub write_error: Option<io::Error>,
}

impl Export {
    /// Whether a requested save succeeded (vacuously true without one).
    pub fn is_persisted(&self) -> bool {
        self.write_error.is_none()
    }
}

/// Encodes a circuit to JSON and optionally persists it.
///
/// A filesystem failure does not discard the result: the JSON string is
/// returned either way and the error is reported alongside it.
pub fn export(circuit: &Circuit, save_path: Option<&Path>) -> serde_json::Result<Export> {
    let json = to_json(&encode(circuit))?;

    let write_error = match save_path {
        Some(path) => fs::write(path, &json).err(),
        None => None,
    };
    if let Some(error) = &write_error {
        tracing::warn!("failed to persist circuit JSON: {error}");
    }

    Ok(Export { json, write_error })
}
