//! Send and receive transitions.

use crate::core::error::CfsmError;
use crate::core::{MachineKey, StateId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

/// Communication action performed by a machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Sending a message (`!`)
    Send,
    /// Receiving a message (`?`)
    Recv,
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send => write!(f, "!"),
            Self::Recv => write!(f, "?"),
        }
    }
}

/// Lookup from a stable machine key to the machine's current dense id.
pub trait PeerIds {
    fn peer_id(&self, key: MachineKey) -> Option<usize>;
}

/// A directed edge of a machine: output to, or input from, a peer machine.
///
/// The peer is named by key and resolved to its current id when the label is
/// produced, so renumbering the system is reflected in every label.
///
/// Equality, ordering and hashing ignore the destination state: two
/// transitions with the same action, peer and message are the same edge key.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Transition {
    Send {
        to: MachineKey,
        message: String,
        next: Option<StateId>,
    },
    Recv {
        from: MachineKey,
        message: String,
        next: Option<StateId>,
    },
}

impl Transition {
    /// Output of `message` to the machine `to`.
    pub fn send(to: MachineKey, message: impl Into<String>) -> Self {
        Self::Send {
            to,
            message: message.into(),
            next: None,
        }
    }

    /// Input of `message` from the machine `from`.
    pub fn recv(from: MachineKey, message: impl Into<String>) -> Self {
        Self::Recv {
            from,
            message: message.into(),
            next: None,
        }
    }

    pub fn action(&self) -> Action {
        match self {
            Self::Send { .. } => Action::Send,
            Self::Recv { .. } => Action::Recv,
        }
    }

    /// The peer machine this transition communicates with.
    pub fn peer(&self) -> MachineKey {
        match self {
            Self::Send { to, .. } => *to,
            Self::Recv { from, .. } => *from,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Send { message, .. } | Self::Recv { message, .. } => message,
        }
    }

    /// Assign the state reached after this transition fires.
    pub fn set_next(&mut self, state: StateId) {
        match self {
            Self::Send { next, .. } | Self::Recv { next, .. } => *next = Some(state),
        }
    }

    /// Builder-style [`Transition::set_next`].
    #[must_use]
    pub fn with_next(mut self, state: StateId) -> Self {
        self.set_next(state);
        self
    }

    /// The state reached after this transition, if assigned.
    pub fn state(&self) -> Option<StateId> {
        match self {
            Self::Send { next, .. } | Self::Recv { next, .. } => *next,
        }
    }

    /// Label as `"<peer id> ! <message>"` or `"<peer id> ? <message>"`.
    ///
    /// # Errors
    ///
    /// - [`CfsmError::StateUndef`] if no next state has been assigned
    /// - [`CfsmError::DanglingPeer`] if the peer no longer resolves to an id
    pub fn label(&self, peers: &(impl PeerIds + ?Sized)) -> Result<String, CfsmError> {
        if self.state().is_none() {
            return Err(CfsmError::StateUndef {
                label: format!("{} {}", self.action(), self.message()),
            });
        }

        let peer = self.peer();
        let id = peers
            .peer_id(peer)
            .ok_or(CfsmError::DanglingPeer { peer })?;
        Ok(format!("{} {} {}", id, self.action(), self.message()))
    }

    fn key(&self) -> (Action, MachineKey, &str) {
        (self.action(), self.peer(), self.message())
    }
}

impl PartialEq for Transition {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Transition {}

impl Hash for Transition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Transition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Transition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}
