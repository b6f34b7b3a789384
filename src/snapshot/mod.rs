//! Snapshots of a communicating system.
//!
//! A snapshot is a serializable copy of every machine, state and transition
//! in a system, so a model can be stored and rebuilt later. Restoring checks
//! identifier density and state references before handing back a system.

use crate::core::{Machine, System};
use crate::integrity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use stillwater::validation::Validation;
use tracing::debug;
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable copy of a system.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: String,

    /// When snapshot was created
    pub timestamp: DateTime<Utc>,

    /// System comment
    pub comment: String,

    /// Machines in id order
    pub machines: Vec<Machine>,
}

impl Snapshot {
    /// Copy the current contents of `system`.
    pub fn capture(system: &System) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            comment: system.comment().to_string(),
            machines: system.machines().clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|e| SnapshotError::Decode(e.to_string()))
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, SnapshotError> {
        bincode::deserialize(bytes).map_err(|e| SnapshotError::Decode(e.to_string()))
    }

    /// Rebuild a system from this snapshot.
    ///
    /// Removed peers are kept as they were captured; see
    /// [`integrity::check_peers`].
    ///
    /// # Errors
    ///
    /// - [`SnapshotError::UnsupportedVersion`] for an unknown format version
    /// - [`SnapshotError::DuplicateMachineKey`] if two machines share a key
    /// - [`SnapshotError::Inconsistent`] if machine or state ids are not
    ///   dense, a transition has no next state, or a start or next state does
    ///   not exist
    pub fn restore(self) -> Result<System, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        let mut keys = HashSet::with_capacity(self.machines.len());
        if let Some(machine) = self.machines.iter().find(|machine| !keys.insert(machine.key())) {
            return Err(SnapshotError::DuplicateMachineKey { key: machine.key() });
        }

        if let Validation::Failure(violations) = integrity::check_structure(&self.machines) {
            return Err(SnapshotError::Inconsistent(violations.into_vec()));
        }

        debug!(id = %self.id, machines = self.machines.len(), "restored snapshot");
        Ok(System::from_machines(self.machines, self.comment))
    }
}

impl System {
    /// Capture a [`Snapshot`] of this system.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }
}
