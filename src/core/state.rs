//! States of a machine and their outgoing transitions.

use crate::core::error::CfsmError;
use crate::core::transition::Transition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

/// Dense index of a state inside its owning machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateId(pub(crate) usize);

impl StateId {
    /// Returns the numeric index of this state.
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node of a machine's state graph.
///
/// A state is either attached (owned by a machine, `id()` is `Some`) or free
/// (`id()` is `None`) until it is handed to [`Machine::add_state`].
///
/// Outgoing transitions are keyed by action, peer and message; adding an
/// equal transition again replaces the destination of the existing edge.
///
/// [`Machine::add_state`]: crate::core::Machine::add_state
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct State {
    id: Option<StateId>,
    label: String,
    edges: BTreeSet<Transition>,
}

impl State {
    /// Create a free state, not owned by any machine.
    pub fn free() -> Self {
        Self::default()
    }

    pub(crate) fn attached(id: StateId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub(crate) fn attach(&mut self, id: StateId) {
        self.id = Some(id);
    }

    /// Identifier of this state, `None` while free.
    pub fn id(&self) -> Option<StateId> {
        self.id
    }

    pub fn is_free(&self) -> bool {
        self.id.is_none()
    }

    /// Node name derived from the id, e.g. `q3`. Free states are named `q-1`.
    pub fn name(&self) -> String {
        match self.id {
            Some(id) => format!("q{id}"),
            None => "q-1".to_string(),
        }
    }

    /// Free-text label.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Add an outgoing transition, mapped to the transition's next state.
    ///
    /// Attached states are only reachable immutably from their machine; use
    /// [`Machine::add_transition`] for them. The destinations of a free
    /// state's edges are checked when it is attached.
    ///
    /// [`Machine::add_transition`]: crate::core::Machine::add_transition
    ///
    /// # Errors
    ///
    /// Returns [`CfsmError::StateUndef`] if the transition has no next state.
    pub fn add_transition(&mut self, transition: Transition) -> Result<(), CfsmError> {
        if transition.state().is_none() {
            return Err(CfsmError::StateUndef {
                label: format!("{} {}", transition.action(), transition.message()),
            });
        }
        self.edges.replace(transition);
        Ok(())
    }

    /// Every stored edge, including any without a destination.
    pub(crate) fn edges(&self) -> impl Iterator<Item = &Transition> {
        self.edges.iter()
    }

    /// Outgoing transitions with their destination states.
    pub fn transitions(&self) -> impl Iterator<Item = (&Transition, StateId)> {
        self.edges
            .iter()
            .filter_map(|transition| transition.state().map(|next| (transition, next)))
    }

    /// Number of distinct outgoing transitions.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
