//! Alice and Bob
//!
//! Builds a two-party system where Alice sends an integer to Bob and
//! prints the Petrify export of both machines.

use cfsm::{integrity, System, Transition};

fn main() -> Result<(), cfsm::CfsmError> {
    let mut sys = System::with_comment("Alice and Bob");
    let alice = sys.new_machine();
    let bob = sys.new_machine();

    let a = sys.machine_mut(alice).expect("alice was just created");
    a.set_comment("Alice");
    let a0 = a.new_state();
    let a1 = a.new_state();
    a.add_transition(a0, Transition::send(bob, "int").with_next(a1))?;
    a.set_start(a0)?;

    let b = sys.machine_mut(bob).expect("bob was just created");
    b.set_comment("Bob");
    let b0 = b.new_state();
    let b1 = b.new_state();
    b.add_transition(b0, Transition::recv(alice, "int").with_next(b1))?;
    b.set_start(b0)?;

    println!("=== {} ===", sys.comment());
    print!("{}", sys.render()?);

    println!("\nIntegrity check passed: {}", integrity::check(&sys).is_success());
    Ok(())
}
