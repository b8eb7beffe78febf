//! Structured diagnostics for best-effort construction and evaluation.
//!
//! The engine favors returning a usable result over hard failure: a rejected
//! connection leaves a gate under-connected, an unresolvable value evaluates
//! to `false`. Every such degraded step is recorded here so callers can
//! distinguish a sound circuit from a best-effort one.

use std::fmt;

use crate::circuit::ConnectError;
use crate::coords::Position;

/// A single recoverable problem observed while building or evaluating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// `connect` rejected an edge during construction; the target gate may be
    /// left under-connected (it is not auto-repaired).
    ConnectRejected {
        /// Gate whose slot was being wired.
        target: Position,
        /// Slot that was being wired.
        slot: usize,
        /// Why the connection was refused.
        error: ConnectError,
    },
    /// A gate drew the same source more than once because the previous rank
    /// was narrower than its fan-in.
    SourcesReused {
        /// The gate whose sources repeat.
        gate: Position,
    },
    /// Evaluation found a slot unconnected and substituted `false`.
    MissingInput {
        /// Gate with the hole.
        gate: Position,
        /// The unconnected slot.
        slot: usize,
    },
    /// An input gate was read before any value was set; `false` substituted.
    UnsetInput {
        /// The input gate that was read.
        gate: Position,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ConnectRejected {
                target,
                slot,
                error,
            } => write!(f, "{target}: slot {slot} connection rejected: {error}"),
            Diagnostic::SourcesReused { gate } => {
                write!(f, "{gate}: previous rank too narrow, sources reused")
            }
            Diagnostic::MissingInput { gate, slot } => {
                write!(f, "{gate}: slot {slot} unconnected, substituted false")
            }
            Diagnostic::UnsetInput { gate } => {
                write!(f, "{gate}: read before a value was set, substituted false")
            }
        }
    }
}

/// Append-only collection of [`Diagnostic`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one diagnostic and emits it as a warning.
    pub fn record(&mut self, entry: Diagnostic) {
        tracing::warn!("{entry}");
        self.entries.push(entry);
    }

    /// Whether nothing degraded: no entries recorded.
    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection is empty (same as [`is_clean`](Self::is_clean)).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the entries in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Appends every entry of `other`.
    pub fn merge(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }
}
