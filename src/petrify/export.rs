//! Rendering of machines in Petrify state graph notation.

use super::encoding::encode;
use crate::core::{CfsmError, Machine, PeerIds};
use std::fmt::Write;

/// Exporter for a single machine in Petrify format.
///
/// Peer machine ids in transition labels are resolved through `peers`,
/// normally the machine list of the owning system.
///
/// ```text
///
/// -- Machine #0
/// -- Alice
/// .outputs
/// .state graph
/// q00 1 ! int q01
/// .marking q00
/// .end
/// ```
pub struct Petrify<'a, P: ?Sized> {
    machine: &'a Machine,
    peers: &'a P,
}

impl<'a, P: PeerIds + ?Sized> Petrify<'a, P> {
    pub fn new(machine: &'a Machine, peers: &'a P) -> Self {
        Self { machine, peers }
    }

    /// Write the machine block to `out`.
    ///
    /// # Errors
    ///
    /// Fails if a transition label cannot be produced, e.g. because its peer
    /// machine has been removed from the system.
    pub fn write_to(&self, out: &mut impl Write) -> Result<(), CfsmError> {
        let id = self.machine.id();
        writeln!(out)?;
        writeln!(out, "-- Machine #{id}")?;
        writeln!(out, "-- {}", self.machine.comment().replace('\n', "\n--"))?;
        writeln!(out, ".outputs")?;
        writeln!(out, ".state graph")?;

        for (from, state) in self.machine.states().iter().enumerate() {
            for (transition, to) in state.transitions() {
                let label = encode(&transition.label(self.peers)?);
                writeln!(out, "q{id}{from} {label} q{id}{to}")?;
            }
        }

        match self.machine.start() {
            Some(start) => writeln!(out, ".marking q{id}{start}")?,
            None => writeln!(out, "-- Start state not set")?,
        }
        writeln!(out, ".end")?;
        Ok(())
    }

    /// Render the machine block as a string.
    ///
    /// # Errors
    ///
    /// See [`Petrify::write_to`].
    pub fn render(&self) -> Result<String, CfsmError> {
        let mut out = String::new();
        self.write_to(&mut out)?;
        Ok(out)
    }
}

/// Concatenated blocks of every machine, in order, with no system header.
///
/// # Errors
///
/// See [`Petrify::write_to`].
pub fn render_all(machines: &[Machine]) -> Result<String, CfsmError> {
    let mut out = String::new();
    for machine in machines {
        Petrify::new(machine, machines).write_to(&mut out)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{System, Transition};

    fn alice_and_bob() -> System {
        let mut sys = System::new();
        let alice = sys.new_machine();
        let bob = sys.new_machine();

        let a = sys.machine_mut(alice).unwrap();
        a.set_comment("Alice");
        let a0 = a.new_state();
        let a1 = a.new_state();
        a.add_transition(a0, Transition::send(bob, "int").with_next(a1))
            .unwrap();
        a.set_start(a0).unwrap();

        let b = sys.machine_mut(bob).unwrap();
        b.set_comment("Bob");
        let b0 = b.new_state();
        b.new_state();
        b.set_start(b0).unwrap();

        sys
    }

    #[test]
    fn renders_machine_block() {
        let sys = alice_and_bob();
        let machines = sys.machines();

        let out = Petrify::new(&machines[0], machines.as_slice()).render().unwrap();

        assert_eq!(
            out,
            "\n-- Machine #0\n-- Alice\n.outputs\n.state graph\nq00 1 ! int q01\n.marking q00\n.end\n"
        );
    }

    #[test]
    fn machine_without_transitions_renders_header_and_marking() {
        let sys = alice_and_bob();
        let machines = sys.machines();

        let out = Petrify::new(&machines[1], machines.as_slice()).render().unwrap();

        assert_eq!(
            out,
            "\n-- Machine #1\n-- Bob\n.outputs\n.state graph\n.marking q10\n.end\n"
        );
    }

    #[test]
    fn missing_start_state_is_marked() {
        let sys = System::new();
        sys.new_machine();
        let machines = sys.machines();

        let out = Petrify::new(&machines[0], machines.as_slice()).render().unwrap();

        assert!(out.contains("-- Start state not set\n"));
        assert!(!out.contains(".marking"));
    }

    #[test]
    fn multiline_comment_is_prefixed() {
        let mut sys = System::new();
        let key = sys.new_machine();
        sys.machine_mut(key).unwrap().set_comment("first\nsecond");

        let out = sys.render().unwrap();

        assert!(out.contains("-- first\n--second\n"));
    }

    #[test]
    fn labels_are_encoded() {
        let mut sys = System::new();
        let client = sys.new_machine();
        let server = sys.new_machine();
        let m = sys.machine_mut(client).unwrap();
        let s0 = m.new_state();
        m.add_transition(s0, Transition::send(server, "get(a.b)").with_next(s0))
            .unwrap();

        let out = sys.render().unwrap();

        assert!(out.contains("q00 1 ! getLPARENaDOTbRPAREN q00\n"));
    }

    #[test]
    fn system_render_concatenates_in_order() {
        let sys = alice_and_bob();
        let out = sys.render().unwrap();

        let first = out.find("-- Machine #0").unwrap();
        let second = out.find("-- Machine #1").unwrap();
        assert!(first < second);
        assert!(out.starts_with('\n'));
        assert_eq!(out.matches(".end\n").count(), 2);
    }
}
