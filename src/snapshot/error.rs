//! Errors raised while encoding, decoding or restoring a snapshot.

use crate::core::MachineKey;
use crate::integrity::IntegrityViolation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("cannot encode snapshot: {0}")]
    Encode(String),

    #[error("cannot decode snapshot: {0}")]
    Decode(String),

    #[error("snapshot format {found} is not readable, expected {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Two machines claim the same key, so peer lookup would be ambiguous.
    #[error("machine key {key} appears more than once")]
    DuplicateMachineKey { key: MachineKey },

    /// The machines break an identifier or state reference rule.
    #[error("snapshot is inconsistent: {}", describe(.0))]
    Inconsistent(Vec<IntegrityViolation>),
}

fn describe(violations: &[IntegrityViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
