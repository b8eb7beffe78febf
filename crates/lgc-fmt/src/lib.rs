//! lgc-fmt — structural (JSON) circuit serialization.
//!
//! Encodes a [`lgc_core::Circuit`] into a nested record of canonical
//! positional ids and decodes the same shape back, preserving ids and edge
//! lists across the round-trip. The JSON encoding itself is delegated to
//! serde.

pub mod decode;
pub mod encode;
pub mod record;

pub use decode::{DecodeError, Decoded, decode, from_json};
pub use encode::{Export, encode, export, to_json};
pub use record::{CircuitRecord, GateRecord};
