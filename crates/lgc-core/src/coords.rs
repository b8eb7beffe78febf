//! Gate coordinates.

use std::fmt;

/// Inner typedef that's used for raw arena indexes.
pub type RawGateIdx = u32;

/// Index of a gate within a circuit's arena storage.
///
/// Gates reference each other by this index rather than by owning pointers;
/// the [`Circuit`](crate::circuit::Circuit) owns every gate.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct GateIdx(RawGateIdx);

impl From<RawGateIdx> for GateIdx {
    fn from(value: RawGateIdx) -> Self {
        Self(value)
    }
}

impl From<GateIdx> for RawGateIdx {
    fn from(value: GateIdx) -> Self {
        value.0
    }
}

impl From<usize> for GateIdx {
    fn from(value: usize) -> Self {
        Self(value as RawGateIdx)
    }
}

impl From<GateIdx> for usize {
    fn from(value: GateIdx) -> Self {
        value.0 as usize
    }
}

/// Where a gate sits within the circuit's groups.
///
/// Positions are assigned when a gate is created and never change; they are
/// the basis for the canonical serialization ids and for the layering check
/// that keeps the graph acyclic.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Position {
    /// The `i`-th input gate.
    Input(usize),
    /// Gate `slot` within hidden layer `layer`; layer 0 is nearest the inputs.
    Hidden {
        /// Hidden layer rank, 0-based from the input side.
        layer: usize,
        /// Index of the gate within its layer.
        slot: usize,
    },
    /// The `i`-th output gate.
    Output(usize),
}

impl Position {
    /// If the gate is an input gate.
    pub fn is_input(&self) -> bool {
        matches!(self, Position::Input(_))
    }

    /// The canonical, purely positional serialization id for this gate.
    ///
    /// Deterministic and independent of any in-memory identity: `input_{i}`,
    /// `hidden_{layer}_{slot}`, `output_{i}`.
    pub fn canonical_id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Input(i) => write!(f, "input_{i}"),
            Position::Hidden { layer, slot } => write!(f, "hidden_{layer}_{slot}"),
            Position::Output(i) => write!(f, "output_{i}"),
        }
    }
}
