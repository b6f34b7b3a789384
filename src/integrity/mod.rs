//! Whole-system integrity checks.
//!
//! The core rejects contract violations as they happen, but some references
//! can go stale afterwards: removing a machine leaves transitions in other
//! machines naming it as a peer. These checks find every such problem in one
//! pass, using Stillwater's `Validation` to accumulate all violations instead
//! of stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use cfsm::{integrity, System, Transition};
//!
//! let mut sys = System::new();
//! let client = sys.new_machine();
//! let server = sys.new_machine();
//! let m = sys.machine_mut(client).unwrap();
//! let s0 = m.new_state();
//! m.add_transition(s0, Transition::send(server, "req").with_next(s0)).unwrap();
//!
//! assert!(integrity::check(&sys).is_success());
//!
//! sys.remove_machine(1);
//! assert!(integrity::check(&sys).is_failure());
//! ```

mod violations;

pub use violations::IntegrityViolation;

use crate::core::{Machine, PeerIds, System};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Result of an integrity check: success, or every violation found.
pub type IntegrityReport = Validation<(), NonEmptyVec<IntegrityViolation>>;

/// Check identifiers, start states, next states and peers of every machine.
pub fn check(system: &System) -> IntegrityReport {
    let machines = system.machines();
    Validation::all_vec(vec![check_structure(&machines), check_peers(&machines)]).map(|_| ())
}

/// Check identifier density, start states and next states.
///
/// Systems built through the public API always pass; this matters for
/// machines that came from elsewhere, such as a restored snapshot.
///
/// Peer references are not inspected; a removed peer is a legal, if
/// incomplete, system.
pub fn check_structure(machines: &[Machine]) -> IntegrityReport {
    let mut checks: Vec<IntegrityReport> = Vec::new();

    for (position, machine) in machines.iter().enumerate() {
        if machine.id() != position {
            checks.push(Validation::fail(IntegrityViolation::MachineIdMismatch {
                position,
                id: machine.id(),
            }));
        }

        let states = machine.states();
        for (position, state) in states.iter().enumerate() {
            let id = state.id();
            if id.map(|id| id.index()) != Some(position) {
                checks.push(Validation::fail(IntegrityViolation::StateIdMismatch {
                    machine: machine.id(),
                    position,
                    id,
                }));
            }
        }

        if let Some(start) = machine.start() {
            if start.index() >= states.len() {
                checks.push(Validation::fail(IntegrityViolation::DanglingStart {
                    machine: machine.id(),
                    start,
                }));
            }
        }

        for state in states {
            let Some(from) = state.id() else { continue };
            for transition in state.edges() {
                match transition.state() {
                    None => checks.push(Validation::fail(IntegrityViolation::MissingNextState {
                        machine: machine.id(),
                        state: from,
                        transition: format!("{} {}", transition.action(), transition.message()),
                    })),
                    Some(next) if next.index() >= states.len() => {
                        checks.push(Validation::fail(IntegrityViolation::DanglingNextState {
                            machine: machine.id(),
                            state: from,
                            next,
                        }))
                    }
                    Some(_) => {}
                }
            }
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Check that every transition names a peer still present in `machines`.
pub fn check_peers(machines: &[Machine]) -> IntegrityReport {
    let mut checks: Vec<IntegrityReport> = Vec::new();

    for machine in machines {
        for state in machine.states() {
            let Some(from) = state.id() else { continue };
            for (transition, _) in state.transitions() {
                let peer = transition.peer();
                if machines.peer_id(peer).is_none() {
                    checks.push(Validation::fail(IntegrityViolation::DanglingPeer {
                        machine: machine.id(),
                        state: from,
                        peer,
                    }));
                }
            }
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transition;

    fn three_party() -> System {
        let mut sys = System::new();
        let m0 = sys.new_machine();
        let m1 = sys.new_machine();
        let m2 = sys.new_machine();

        let a = sys.machine_mut(m0).unwrap();
        let a0 = a.new_state();
        let a1 = a.new_state();
        a.add_transition(a0, Transition::send(m1, "Msg").with_next(a1))
            .unwrap();
        a.add_transition(a1, Transition::send(m2, "Done").with_next(a0))
            .unwrap();
        a.set_start(a0).unwrap();

        let b = sys.machine_mut(m1).unwrap();
        let b0 = b.new_state();
        let b1 = b.new_state();
        b.add_transition(b0, Transition::recv(m0, "Msg").with_next(b1))
            .unwrap();
        b.set_start(b0).unwrap();

        sys
    }

    #[test]
    fn well_formed_system_passes() {
        let sys = three_party();
        assert!(check(&sys).is_success());
    }

    #[test]
    fn removed_peer_is_reported_not_repaired() {
        let sys = three_party();
        sys.remove_machine(2);

        match check(&sys) {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.iter().all(|e| matches!(
                    e,
                    IntegrityViolation::DanglingPeer { machine: 0, .. }
                )));
            }
            Validation::Success(_) => panic!("Expected dangling peer, got success"),
        }

        // The transition is still there.
        assert_eq!(sys.machines()[0].transition_count(), 2);
    }

    #[test]
    fn every_dangling_peer_is_accumulated() {
        let sys = three_party();
        sys.remove_machine(0);

        // Machine 0 held both sends; removing it leaves machine 1's receive dangling.
        let report = check_peers(&sys.machines());
        match report {
            Validation::Failure(errors) => assert_eq!(errors.len(), 1),
            Validation::Success(_) => panic!("Expected failures, got success"),
        }

        let sys = three_party();
        sys.remove_machine(1);
        sys.remove_machine(1);
        match check_peers(&sys.machines()) {
            Validation::Failure(errors) => assert_eq!(errors.len(), 2),
            Validation::Success(_) => panic!("Expected failures, got success"),
        };
    }

    #[test]
    fn structure_check_reports_id_mismatches() {
        let mut sys = three_party();
        sys.machines_mut()[1].set_id(5);
        sys.machines_mut()[2].set_id(5);

        match check_structure(&sys.machines()) {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors
                    .iter()
                    .all(|e| matches!(e, IntegrityViolation::MachineIdMismatch { id: 5, .. })));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        };
    }

    #[test]
    fn structure_check_ignores_peers() {
        let sys = three_party();
        sys.remove_machine(1);
        assert!(check_structure(&sys.machines()).is_success());
        assert!(check_peers(&sys.machines()).is_failure());
    }
}
