//! The communicating system: an ordered collection of machines.

use crate::core::error::CfsmError;
use crate::core::machine::{Machine, MachineKey};
use crate::core::transition::PeerIds;
use crate::petrify;
use parking_lot::{RwLock, RwLockReadGuard};
use tracing::debug;

/// A set of CFSMs exchanging point-to-point messages.
///
/// Machines always carry the dense ids `0..n-1` in list order. Creating and
/// removing machines takes the write lock, so id assignment and renumbering
/// are atomic with respect to other callers sharing the system.
///
/// # Example
///
/// ```rust
/// use cfsm::{System, Transition};
///
/// let mut sys = System::new();
/// let alice = sys.new_machine();
/// let bob = sys.new_machine();
///
/// let machine = sys.machine_mut(alice).unwrap();
/// machine.set_comment("Alice");
/// let a0 = machine.new_state();
/// let a1 = machine.new_state();
/// machine
///     .add_transition(a0, Transition::send(bob, "int").with_next(a1))
///     .unwrap();
/// machine.set_start(a0).unwrap();
///
/// let out = sys.render().unwrap();
/// assert!(out.contains("q00 1 ! int q01"));
/// ```
#[derive(Debug, Default)]
pub struct System {
    machines: RwLock<Vec<Machine>>,
    comment: String,
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comment(comment: impl Into<String>) -> Self {
        Self {
            machines: RwLock::new(Vec::new()),
            comment: comment.into(),
        }
    }

    pub(crate) fn from_machines(machines: Vec<Machine>, comment: String) -> Self {
        Self {
            machines: RwLock::new(machines),
            comment,
        }
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// Create a machine with id equal to the current machine count.
    pub fn new_machine(&self) -> MachineKey {
        let mut machines = self.machines.write();
        let machine = Machine::new(machines.len());
        let key = machine.key();
        debug!(id = machine.id(), %key, "created machine");
        machines.push(machine);
        key
    }

    /// Remove every machine with the given id and renumber the rest to
    /// `0..n-1`, preserving order. Returns the number of machines removed.
    ///
    /// Transitions in surviving machines that name a removed machine are left
    /// untouched; see [`crate::integrity::check`].
    pub fn remove_machine(&self, id: usize) -> usize {
        let mut machines = self.machines.write();
        let before = machines.len();
        machines.retain(|machine| machine.id() != id);
        let removed = before - machines.len();

        for (index, machine) in machines.iter_mut().enumerate() {
            machine.set_id(index);
        }

        debug!(id, removed, remaining = machines.len(), "removed machine");
        removed
    }

    pub fn len(&self) -> usize {
        self.machines.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.read().is_empty()
    }

    /// Ids of all machines in list order.
    pub fn ids(&self) -> Vec<usize> {
        self.machines.read().iter().map(Machine::id).collect()
    }

    /// Current dense id of the machine with this key.
    pub fn resolve(&self, key: MachineKey) -> Option<usize> {
        self.machines.read().peer_id(key)
    }

    /// Read access to the machine list.
    ///
    /// The guard holds the read lock until dropped. Calling a method that
    /// takes the write lock, such as [`System::new_machine`] or
    /// [`System::remove_machine`], on the same thread while it is alive
    /// deadlocks.
    pub fn machines(&self) -> RwLockReadGuard<'_, Vec<Machine>> {
        self.machines.read()
    }

    /// Exclusive access to the machine list, without locking.
    pub fn machines_mut(&mut self) -> &mut [Machine] {
        self.machines.get_mut()
    }

    /// Exclusive access to one machine, without locking.
    pub fn machine_mut(&mut self, key: MachineKey) -> Option<&mut Machine> {
        self.machines
            .get_mut()
            .iter_mut()
            .find(|machine| machine.key() == key)
    }

    /// Run `f` on the machine with this key under the read lock.
    ///
    /// `f` must not create or remove machines of this system; the write
    /// lock cannot be taken while the read lock is held.
    ///
    /// # Errors
    ///
    /// Returns [`CfsmError::UnknownMachine`] if no machine has this key.
    pub fn with_machine<T>(
        &self,
        key: MachineKey,
        f: impl FnOnce(&Machine) -> T,
    ) -> Result<T, CfsmError> {
        let machines = self.machines.read();
        machines
            .iter()
            .find(|machine| machine.key() == key)
            .map(f)
            .ok_or(CfsmError::UnknownMachine { key })
    }

    /// Run `f` on the machine with this key under the write lock.
    ///
    /// The lock is held while `f` runs and is not reentrant: `f` must not
    /// call back into this system, not even [`System::resolve`] or
    /// [`System::render`], or the calling thread deadlocks.
    ///
    /// # Errors
    ///
    /// Returns [`CfsmError::UnknownMachine`] if no machine has this key.
    pub fn with_machine_mut<T>(
        &self,
        key: MachineKey,
        f: impl FnOnce(&mut Machine) -> T,
    ) -> Result<T, CfsmError> {
        let mut machines = self.machines.write();
        machines
            .iter_mut()
            .find(|machine| machine.key() == key)
            .map(f)
            .ok_or(CfsmError::UnknownMachine { key })
    }

    /// Petrify export of every machine, in machine order.
    ///
    /// # Errors
    ///
    /// Fails if any transition names a peer that is no longer in the system.
    pub fn render(&self) -> Result<String, CfsmError> {
        petrify::render_all(&self.machines.read())
    }

    /// Petrify export of a single machine.
    ///
    /// # Errors
    ///
    /// - [`CfsmError::UnknownMachine`] if no machine has this key
    /// - [`CfsmError::DanglingPeer`] if a transition names a removed peer
    pub fn render_machine(&self, key: MachineKey) -> Result<String, CfsmError> {
        let machines = self.machines.read();
        let machine = machines
            .iter()
            .find(|machine| machine.key() == key)
            .ok_or(CfsmError::UnknownMachine { key })?;
        petrify::Petrify::new(machine, machines.as_slice()).render()
    }
}

impl PeerIds for [Machine] {
    fn peer_id(&self, key: MachineKey) -> Option<usize> {
        self.iter()
            .find(|machine| machine.key() == key)
            .map(Machine::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transition;
    use crate::integrity;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn new_machine_assigns_dense_ids() {
        let sys = System::new();
        let m0 = sys.new_machine();
        let m1 = sys.new_machine();
        let m2 = sys.new_machine();

        assert_eq!(sys.resolve(m0), Some(0));
        assert_eq!(sys.resolve(m1), Some(1));
        assert_eq!(sys.resolve(m2), Some(2));
        assert_eq!(sys.len(), 3);

        let mut ids: HashMap<usize, usize> = HashMap::new();
        for id in sys.ids() {
            *ids.entry(id).or_default() += 1;
        }
        assert!(ids.values().all(|count| *count == 1));
    }

    #[test]
    fn remove_last_machine() {
        let sys = System::new();
        sys.new_machine();
        sys.new_machine();
        let m2 = sys.new_machine();

        let removed = sys.remove_machine(2);

        assert_eq!(removed, 1);
        assert_eq!(sys.ids(), vec![0, 1]);
        assert_eq!(sys.resolve(m2), None);
    }

    #[test]
    fn remove_middle_machine_renumbers() {
        let sys = System::new();
        let m0 = sys.new_machine();
        let m1 = sys.new_machine();
        let m2 = sys.new_machine();

        sys.remove_machine(1);

        assert_eq!(sys.ids(), vec![0, 1]);
        assert_eq!(sys.resolve(m0), Some(0));
        assert_eq!(sys.resolve(m1), None);
        assert_eq!(sys.resolve(m2), Some(1));
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let sys = System::new();
        sys.new_machine();

        assert_eq!(sys.remove_machine(7), 0);
        assert_eq!(sys.ids(), vec![0]);
    }

    #[test]
    fn remove_drops_every_machine_with_the_id() {
        let mut sys = System::new();
        sys.new_machine();
        sys.new_machine();
        sys.new_machine();
        sys.machines_mut()[2].set_id(1);

        assert_eq!(sys.remove_machine(1), 2);
        assert_eq!(sys.ids(), vec![0]);
    }

    #[test]
    fn concurrent_creation_keeps_ids_dense() {
        let sys = Arc::new(System::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let sys = Arc::clone(&sys);
                thread::spawn(move || (0..25).map(|_| sys.new_machine()).count())
            })
            .collect();

        let created: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(created, 200);
        assert_eq!(sys.ids(), (0..200).collect::<Vec<_>>());
    }

    #[test]
    fn concurrent_creation_and_removal_keep_ids_dense() {
        let sys = Arc::new(System::new());
        for _ in 0..16 {
            sys.new_machine();
        }

        let creators: Vec<_> = (0..4)
            .map(|_| {
                let sys = Arc::clone(&sys);
                thread::spawn(move || {
                    for _ in 0..50 {
                        sys.new_machine();
                    }
                })
            })
            .collect();
        let removers: Vec<_> = (0..4)
            .map(|worker| {
                let sys = Arc::clone(&sys);
                thread::spawn(move || (0..25).map(|round| sys.remove_machine((worker + round) % 8)).sum::<usize>())
            })
            .collect();

        for handle in creators {
            handle.join().unwrap();
        }
        let removed: usize = removers.into_iter().map(|h| h.join().unwrap()).sum();

        // Ids are unique, so each successful removal drops exactly one machine.
        assert!(removed <= 100);
        assert_eq!(sys.len(), 16 + 200 - removed);
        assert_eq!(sys.ids(), (0..sys.len()).collect::<Vec<_>>());
        assert!(integrity::check_structure(&sys.machines()).is_success());
    }

    #[test]
    fn with_machine_reports_unknown_key() {
        let sys = System::new();
        let key = sys.new_machine();
        sys.remove_machine(0);

        let result = sys.with_machine(key, |m| m.id());
        assert_eq!(result, Err(CfsmError::UnknownMachine { key }));
    }

    #[test]
    fn with_machine_mut_builds_through_shared_reference() {
        let sys = System::new();
        let alice = sys.new_machine();
        let bob = sys.new_machine();

        sys.with_machine_mut(alice, |m| {
            let a0 = m.new_state();
            let a1 = m.new_state();
            m.add_transition(a0, Transition::send(bob, "int").with_next(a1))
        })
        .unwrap()
        .unwrap();

        assert_eq!(sys.with_machine(alice, Machine::transition_count), Ok(1));
    }

    #[test]
    fn comment_is_kept() {
        let mut sys = System::with_comment("two-party");
        assert_eq!(sys.comment(), "two-party");
        sys.set_comment("updated");
        assert_eq!(sys.comment(), "updated");
    }
}
