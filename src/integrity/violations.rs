//! Integrity violations found in a communicating system.

use crate::core::{MachineKey, StateId};
use thiserror::Error;

/// A broken reference or identifier rule inside a system.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntegrityViolation {
    #[error("Machine at position {position} has id {id}")]
    MachineIdMismatch { position: usize, id: usize },

    #[error("State at position {position} of machine #{machine} has id {id:?}")]
    StateIdMismatch {
        machine: usize,
        position: usize,
        id: Option<StateId>,
    },

    #[error("Start state {start} of machine #{machine} does not exist")]
    DanglingStart { machine: usize, start: StateId },

    #[error("Transition from q{machine}{state} leads to missing state {next}")]
    DanglingNextState {
        machine: usize,
        state: StateId,
        next: StateId,
    },

    #[error("Transition {transition} from q{machine}{state} has no next state")]
    MissingNextState {
        machine: usize,
        state: StateId,
        transition: String,
    },

    /// The peer was removed from the system after the transition was built.
    #[error("Transition from q{machine}{state} names removed peer machine {peer}")]
    DanglingPeer {
        machine: usize,
        state: StateId,
        peer: MachineKey,
    },
}
