//! Errors raised while building a communicating system.

use crate::core::{MachineKey, StateId};
use std::fmt;
use thiserror::Error;

/// Caller-contract violations detected at the point they happen.
///
/// None of the operations that return these mutate anything on failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CfsmError {
    /// The state is already attached to a machine.
    #[error("State {state} is already attached to a CFSM")]
    StateAlias { state: StateId },

    /// The transition has no destination state yet.
    #[error("Undefined state: transition '{label}' has no next state")]
    StateUndef { label: String },

    #[error("State {state} does not exist in machine #{machine}")]
    UnknownState { machine: usize, state: StateId },

    /// The peer machine was removed from the system.
    #[error("Peer machine {peer} is not part of the system")]
    DanglingPeer { peer: MachineKey },

    #[error("Machine {key} is not part of the system")]
    UnknownMachine { key: MachineKey },

    #[error("Rendering failed: {0}")]
    Format(#[from] fmt::Error),
}
