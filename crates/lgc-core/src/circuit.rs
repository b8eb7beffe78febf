//! Circuit representation, evaluation and invalidation.

use thiserror::Error;

use crate::coords::{GateIdx, Position};
use crate::diag::{Diagnostic, Diagnostics};
use crate::gate::{Gate, GateKind};

/// Reasons a [`Circuit::connect`] call can be rejected.
///
/// Rejections are reported per call and never abort construction; the caller
/// decides whether to live with an under-connected gate.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConnectError {
    /// The slot index is at or beyond the target kind's arity.
    #[error("slot {slot} out of range (arity {arity})")]
    SlotOutOfRange {
        /// Requested slot.
        slot: usize,
        /// The target's arity.
        arity: usize,
    },
    /// Target or source index is outside the arena.
    #[error("gate index outside the circuit")]
    UnknownGate,
    /// Input gates take no connections.
    #[error("cannot connect into an input gate")]
    TargetIsInput,
    /// The source does not sit on an earlier rank than its reader, which
    /// would break the acyclic-layered invariant.
    #[error("source is not upstream of its reader")]
    NotUpstream,
}

/// A layered, acyclic boolean circuit owning its full gate population.
///
/// Gates live in a flat arena and reference each other by [`GateIdx`]. The
/// three groups (inputs, hidden layers, outputs) define positions and the
/// bit-order conventions used by every analysis; `all_gates` is a flattened
/// cache over them, populated by [`seal`](Self::seal).
///
/// Topology is immutable once built; only the per-gate tri-state value cache
/// mutates afterwards, through evaluation and invalidation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Circuit {
    /// The arena.
    gates: Vec<Gate>,
    /// Reverse edges: which gates read each gate's output. Maintained as a
    /// by-product of `connect`, used only for invalidation.
    readers: Vec<Vec<GateIdx>>,
    /// Tri-state value cache; `None` = unset.
    states: Vec<Option<bool>>,
    /// Group coordinates, parallel to `gates`.
    positions: Vec<Position>,

    inputs: Vec<GateIdx>,
    hidden_layers: Vec<Vec<GateIdx>>,
    outputs: Vec<GateIdx>,

    /// inputs ++ hidden layers in order ++ outputs; valid while `sealed`.
    all_gates: Vec<GateIdx>,
    sealed: bool,
}

impl Circuit {
    /// An empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    fn push_gate(&mut self, kind: GateKind, position: Position) -> GateIdx {
        let idx = GateIdx::from(self.gates.len());
        self.gates.push(Gate::new(kind));
        self.readers.push(Vec::new());
        self.states.push(None);
        self.positions.push(position);
        self.sealed = false;
        idx
    }

    /// Appends an input gate.
    pub fn add_input(&mut self) -> GateIdx {
        let position = Position::Input(self.inputs.len());
        let idx = self.push_gate(GateKind::Input, position);
        self.inputs.push(idx);
        idx
    }

    /// Opens a new hidden layer; subsequent [`add_hidden`](Self::add_hidden)
    /// calls land in it.
    pub fn begin_layer(&mut self) {
        self.hidden_layers.push(Vec::new());
        self.sealed = false;
    }

    /// Appends a gate to the current hidden layer.
    ///
    /// # Panics
    ///
    /// If no layer has been begun, or `kind` is `Input` (input gates are
    /// added with [`add_input`](Self::add_input)).
    pub fn add_hidden(&mut self, kind: GateKind) -> GateIdx {
        assert!(
            kind != GateKind::Input,
            "circuit: input gates are added with add_input"
        );
        let layer = self
            .hidden_layers
            .len()
            .checked_sub(1)
            .expect("circuit: add_hidden before begin_layer");
        let position = Position::Hidden {
            layer,
            slot: self.hidden_layers[layer].len(),
        };
        let idx = self.push_gate(kind, position);
        self.hidden_layers[layer].push(idx);
        idx
    }

    /// Appends an output gate (always a Wire).
    pub fn add_output(&mut self) -> GateIdx {
        let position = Position::Output(self.outputs.len());
        let idx = self.push_gate(GateKind::Wire, position);
        self.outputs.push(idx);
        idx
    }

    /// Populates the flattened `all_gates` view. Idempotent; must be called
    /// after the last gate is added and before [`all_gates`](Self::all_gates).
    pub fn seal(&mut self) {
        self.all_gates.clear();
        self.all_gates.extend(&self.inputs);
        for layer in &self.hidden_layers {
            self.all_gates.extend(layer);
        }
        self.all_gates.extend(&self.outputs);
        self.sealed = true;
    }

    fn contains(&self, idx: GateIdx) -> bool {
        usize::from(idx) < self.gates.len()
    }

    /// Whether `source` may legally feed `target` under strict layering:
    /// inputs precede everything, hidden layer L sources inputs and layers
    /// `< L`, outputs source the last hidden layer (or inputs when there are
    /// no hidden layers).
    fn is_upstream(&self, source: Position, target: Position) -> bool {
        match target {
            Position::Input(_) => false,
            Position::Hidden { layer, .. } => match source {
                Position::Input(_) => true,
                Position::Hidden { layer: src, .. } => src < layer,
                Position::Output(_) => false,
            },
            Position::Output(_) => match source {
                Position::Input(_) => self.hidden_layers.is_empty(),
                Position::Hidden { layer, .. } => layer + 1 == self.hidden_layers.len(),
                Position::Output(_) => false,
            },
        }
    }

    /// Connects `target`'s input `slot` to `source`, registering `target` as
    /// a reader of `source`.
    pub fn connect(
        &mut self,
        target: GateIdx,
        slot: usize,
        source: GateIdx,
    ) -> Result<(), ConnectError> {
        if !self.contains(target) || !self.contains(source) {
            return Err(ConnectError::UnknownGate);
        }
        let t = usize::from(target);
        let kind = self.gates[t].kind();
        if kind == GateKind::Input {
            return Err(ConnectError::TargetIsInput);
        }
        if slot >= kind.arity() {
            return Err(ConnectError::SlotOutOfRange {
                slot,
                arity: kind.arity(),
            });
        }
        if !self.is_upstream(self.positions[usize::from(source)], self.positions[t]) {
            return Err(ConnectError::NotUpstream);
        }

        self.gates[t].set_slot(slot, source);
        self.readers[usize::from(source)].push(target);
        Ok(())
    }

    /// Reads a gate's logical value, evaluating lazily with memoization.
    ///
    /// A cached value returns immediately; otherwise every connected source
    /// is resolved recursively (terminating because layering is strict), the
    /// kind's boolean function is applied, and the result is cached.
    ///
    /// Absence never panics: an unconnected slot makes the gate report
    /// `false` with a [`Diagnostic::MissingInput`], and an input gate read
    /// before [`set_value`](Self::set_value) reports `false` with a
    /// [`Diagnostic::UnsetInput`].
    pub fn evaluate(&mut self, idx: GateIdx, diagnostics: &mut Diagnostics) -> bool {
        let i = usize::from(idx);
        if let Some(value) = self.states[i] {
            return value;
        }

        let gate = self.gates[i];
        let value = match gate.kind() {
            GateKind::Input => {
                diagnostics.record(Diagnostic::UnsetInput {
                    gate: self.positions[i],
                });
                false
            }
            GateKind::Wire => self.resolve(gate, 0, i, diagnostics).unwrap_or(false),
            GateKind::Not => match self.resolve(gate, 0, i, diagnostics) {
                Some(value) => !value,
                None => false,
            },
            GateKind::And => match self.resolve_pair(gate, i, diagnostics) {
                Some((a, b)) => a && b,
                None => false,
            },
            GateKind::Or => match self.resolve_pair(gate, i, diagnostics) {
                Some((a, b)) => a || b,
                None => false,
            },
            GateKind::Xor => match self.resolve_pair(gate, i, diagnostics) {
                Some((a, b)) => a ^ b,
                None => false,
            },
        };

        self.states[i] = Some(value);
        value
    }

    fn resolve(
        &mut self,
        gate: Gate,
        slot: usize,
        at: usize,
        diagnostics: &mut Diagnostics,
    ) -> Option<bool> {
        match gate.slot(slot) {
            Some(source) => Some(self.evaluate(source, diagnostics)),
            None => {
                diagnostics.record(Diagnostic::MissingInput {
                    gate: self.positions[at],
                    slot,
                });
                None
            }
        }
    }

    /// Resolves both operands of a two-input gate, recording every hole.
    fn resolve_pair(
        &mut self,
        gate: Gate,
        at: usize,
        diagnostics: &mut Diagnostics,
    ) -> Option<(bool, bool)> {
        let a = self.resolve(gate, 0, at, diagnostics);
        let b = self.resolve(gate, 1, at, diagnostics);
        Some((a?, b?))
    }

    /// Drives an input gate, invalidating downstream caches when the value
    /// actually changes.
    ///
    /// # Panics
    ///
    /// If `input` is not an input gate.
    pub fn set_value(&mut self, input: GateIdx, value: bool) {
        let i = usize::from(input);
        assert!(
            self.gates[i].kind() == GateKind::Input,
            "circuit: set_value on non-input gate"
        );
        if self.states[i] == Some(value) {
            return;
        }
        self.states[i] = Some(value);
        self.invalidate_readers(input);
    }

    /// Unconditionally clears a gate's cached value and propagates the
    /// invalidation to its readers (forces recomputation on next read).
    pub fn reset_state(&mut self, idx: GateIdx) {
        self.states[usize::from(idx)] = None;
        self.invalidate_readers(idx);
    }

    fn invalidate_readers(&mut self, idx: GateIdx) {
        // recursion needs &mut self; walk a snapshot of the reader list
        let readers = self.readers[usize::from(idx)].clone();
        for reader in readers {
            self.invalidate(reader);
        }
    }

    /// Clears `idx` and recurses, stopping at gates that are already unset.
    /// The stop makes the walk idempotent and terminates diamonds.
    fn invalidate(&mut self, idx: GateIdx) {
        let i = usize::from(idx);
        if self.states[i].is_some() {
            self.states[i] = None;
            self.invalidate_readers(idx);
        }
    }

    /// Clears every hidden and output cache, leaving input values in place.
    /// Used to force a full interior recomputation, e.g. per truth-table row.
    pub fn clear_interior_state(&mut self) {
        for layer in &self.hidden_layers {
            for &g in layer {
                self.states[usize::from(g)] = None;
            }
        }
        for &g in &self.outputs {
            self.states[usize::from(g)] = None;
        }
    }

    /// The kind of a gate.
    pub fn kind(&self, idx: GateIdx) -> GateKind {
        self.gates[usize::from(idx)].kind()
    }

    /// The group coordinates of a gate.
    pub fn position(&self, idx: GateIdx) -> Position {
        self.positions[usize::from(idx)]
    }

    /// A gate's input slots in order (`arity` long, `None` = unconnected).
    pub fn input_slots(&self, idx: GateIdx) -> &[Option<GateIdx>] {
        self.gates[usize::from(idx)].input_slots()
    }

    /// Gates reading this gate's output.
    pub fn readers(&self, idx: GateIdx) -> &[GateIdx] {
        &self.readers[usize::from(idx)]
    }

    /// The cached tri-state value, without evaluating.
    pub fn cached(&self, idx: GateIdx) -> Option<bool> {
        self.states[usize::from(idx)]
    }

    /// The input gates, in bit-position order.
    pub fn inputs(&self) -> &[GateIdx] {
        &self.inputs
    }

    /// The hidden layers, layer 0 nearest the inputs.
    pub fn hidden_layers(&self) -> &[Vec<GateIdx>] {
        &self.hidden_layers
    }

    /// The output gates, in output order.
    pub fn outputs(&self) -> &[GateIdx] {
        &self.outputs
    }

    /// The flattened view: inputs, then each hidden layer, then outputs.
    ///
    /// # Panics
    ///
    /// If the circuit was modified since the last [`seal`](Self::seal).
    pub fn all_gates(&self) -> &[GateIdx] {
        assert!(self.sealed, "circuit: all_gates read before seal");
        &self.all_gates
    }

    /// Total number of gates.
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Whether every slot of every gate is connected.
    pub fn is_fully_connected(&self) -> bool {
        self.gates
            .iter()
            .all(|g| g.input_slots().iter().all(Option::is_some))
    }
}
