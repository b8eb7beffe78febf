//! Structural record types for the JSON circuit format.
//!
//! The JSON shape is the sole contract with external consumers (scene
//! visualizers, editor tooling):
//!
//! ```json
//! {
//!   "InputGates": [ { "Id": "input_0", "Type": "INPUT", "Inputs": [] } ],
//!   "HiddenLayers": [
//!     [ { "Id": "hidden_0_0", "Type": "AND", "Inputs": ["input_0", "input_1"] } ]
//!   ],
//!   "OutputGates": [ { "Id": "output_0", "Type": "WIRE", "Inputs": ["hidden_0_0"] } ]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// One gate in the structural record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateRecord {
    /// Canonical positional id: `input_{i}`, `hidden_{L}_{G}`, `output_{i}`.
    #[serde(rename = "Id")]
    pub id: String,
    /// Type name: `INPUT`, `AND`, `OR`, `NOT`, `XOR`, `WIRE` (decode also
    /// accepts `OUTPUT` in the output group).
    #[serde(rename = "Type")]
    pub ty: String,
    /// Ids of connected sources, in slot order.
    #[serde(rename = "Inputs", default)]
    pub inputs: Vec<String>,
}

/// The full structural record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitRecord {
    /// The input gates, in bit-position order.
    #[serde(rename = "InputGates")]
    pub input_gates: Vec<GateRecord>,
    /// The hidden layers, input side first.
    #[serde(rename = "HiddenLayers")]
    pub hidden_layers: Vec<Vec<GateRecord>>,
    /// The output gates, in output order.
    #[serde(rename = "OutputGates")]
    pub output_gates: Vec<GateRecord>,
}

impl CircuitRecord {
    /// Iterates every gate record: inputs, then each layer, then outputs.
    pub fn iter(&self) -> impl Iterator<Item = &GateRecord> {
        self.input_gates
            .iter()
            .chain(self.hidden_layers.iter().flatten())
            .chain(self.output_gates.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_match_the_contract() {
        let record = CircuitRecord {
            input_gates: vec![GateRecord {
                id: "input_0".into(),
                ty: "INPUT".into(),
                inputs: Vec::new(),
            }],
            hidden_layers: Vec::new(),
            output_gates: Vec::new(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["InputGates"][0]["Id"], "input_0");
        assert_eq!(value["InputGates"][0]["Type"], "INPUT");
        assert!(value["InputGates"][0]["Inputs"].as_array().unwrap().is_empty());
        assert!(value["HiddenLayers"].as_array().unwrap().is_empty());
        assert!(value["OutputGates"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_missing_inputs_field_defaults_to_empty() {
        let record: GateRecord =
            serde_json::from_str(r#"{"Id": "input_0", "Type": "INPUT"}"#).unwrap();
        assert!(record.inputs.is_empty());
    }
}
