//! A single communicating finite state machine.

use crate::core::error::CfsmError;
use crate::core::state::{State, StateId};
use crate::core::transition::Transition;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use tracing::{debug, warn};
use uuid::Uuid;

/// Stable identity of a machine.
///
/// Unlike the dense id, the key never changes when the system renumbers its
/// machines. Transitions name their peer machine by key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MachineKey(Uuid);

impl MachineKey {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for MachineKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A communicating finite state machine (CFSM).
///
/// Owns its states in creation order. Attached states carry the dense ids
/// `0..k-1`; the start state, when set, is always one of them.
///
/// Every transition leads to a state of the same machine. Attached states
/// are handed out immutably, so edges are added through
/// [`Machine::add_transition`], which checks both ends:
///
/// ```compile_fail
/// use cfsm::System;
///
/// let mut sys = System::new();
/// let key = sys.new_machine();
/// let machine = sys.machine_mut(key).unwrap();
/// let s0 = machine.new_state();
/// machine.state_mut(s0);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Machine {
    key: MachineKey,
    id: usize,
    start: Option<StateId>,
    comment: String,
    states: Vec<State>,
}

impl Machine {
    pub(crate) fn new(id: usize) -> Self {
        Self {
            key: MachineKey::new(),
            id,
            start: None,
            comment: String::new(),
            states: Vec::new(),
        }
    }

    /// Dense id of this machine inside its system.
    pub fn id(&self) -> usize {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: usize) {
        self.id = id;
    }

    /// Stable key of this machine.
    pub fn key(&self) -> MachineKey {
        self.key
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// Create a state owned by this machine with the next dense id.
    pub fn new_state(&mut self) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(State::attached(id));
        id
    }

    /// Create a free state, not yet owned by any machine.
    pub fn new_free_state(&self) -> State {
        State::free()
    }

    /// Attach a free state, assigning it the next dense id.
    ///
    /// Transitions already added to the free state may lead to any state of
    /// this machine, including the one being attached.
    ///
    /// # Errors
    ///
    /// - [`CfsmError::StateAlias`] if the state is already attached
    /// - [`CfsmError::UnknownState`] if one of its transitions leads outside
    ///   this machine
    ///
    /// The machine is left unchanged on error.
    pub fn add_state(&mut self, mut state: State) -> Result<StateId, CfsmError> {
        if let Some(existing) = state.id() {
            warn!(machine = self.id, state = %existing, "rejected attach of non-free state");
            return Err(CfsmError::StateAlias { state: existing });
        }

        let id = StateId(self.states.len());
        if let Some(next) = state.edges().filter_map(Transition::state).find(|next| next.0 > id.0) {
            warn!(machine = self.id, state = %next, "rejected attach of state with foreign edge");
            return Err(CfsmError::UnknownState {
                machine: self.id,
                state: next,
            });
        }

        state.attach(id);
        self.states.push(state);
        debug!(machine = self.id, state = %id, "attached free state");
        Ok(id)
    }

    /// Owned states, in attachment order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.0)
    }

    /// Set the free-text label of an owned state.
    ///
    /// # Errors
    ///
    /// Returns [`CfsmError::UnknownState`] if the state is not owned by this machine.
    pub fn set_state_label(&mut self, state: StateId, label: impl Into<String>) -> Result<(), CfsmError> {
        let machine = self.id;
        self.states
            .get_mut(state.0)
            .ok_or(CfsmError::UnknownState { machine, state })?
            .set_label(label);
        Ok(())
    }

    /// Add `transition` to the state `from`.
    ///
    /// # Errors
    ///
    /// - [`CfsmError::StateUndef`] if the transition has no next state
    /// - [`CfsmError::UnknownState`] if `from` or the next state is not owned
    ///   by this machine
    pub fn add_transition(&mut self, from: StateId, transition: Transition) -> Result<(), CfsmError> {
        if let Some(next) = transition.state() {
            self.check_owned(next)?;
        }

        let machine = self.id;
        self.states
            .get_mut(from.0)
            .ok_or(CfsmError::UnknownState {
                machine,
                state: from,
            })?
            .add_transition(transition)
    }

    /// Designate the start state.
    ///
    /// # Errors
    ///
    /// Returns [`CfsmError::UnknownState`] if the state is not owned by this machine.
    pub fn set_start(&mut self, state: StateId) -> Result<(), CfsmError> {
        self.check_owned(state)?;
        self.start = Some(state);
        Ok(())
    }

    pub fn start(&self) -> Option<StateId> {
        self.start
    }

    /// True when the machine has no states, or a single state without transitions.
    pub fn is_empty(&self) -> bool {
        match self.states.as_slice() {
            [] => true,
            [only] => only.is_empty(),
            _ => false,
        }
    }

    /// Total number of outgoing transitions over all states.
    pub fn transition_count(&self) -> usize {
        self.states.iter().map(State::len).sum()
    }

    fn check_owned(&self, state: StateId) -> Result<(), CfsmError> {
        if state.0 < self.states.len() {
            Ok(())
        } else {
            Err(CfsmError::UnknownState {
                machine: self.id,
                state,
            })
        }
    }
}
