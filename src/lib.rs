//! CFSM: communicating finite state machines
//!
//! A communicating system is a fixed collection of finite state machines
//! exchanging asynchronous point-to-point messages. This crate models such
//! systems in memory and exports each machine's state graph in the notation
//! read by the Petrify Petri net synthesis tool.
//!
//! # Core Concepts
//!
//! - **System**: ordered machines with dense ids, safe to share between callers
//! - **Machine**: ordered states with dense ids and an optional start state
//! - **Transition**: a send to, or receive from, a peer machine
//! - **Petrify**: text export of machines and systems
//!
//! # Example
//!
//! ```rust
//! use cfsm::{System, Transition};
//!
//! let mut sys = System::new();
//! let alice = sys.new_machine();
//! let bob = sys.new_machine();
//!
//! let a = sys.machine_mut(alice).unwrap();
//! a.set_comment("Alice");
//! let a0 = a.new_state();
//! let a1 = a.new_state();
//! a.add_transition(a0, Transition::send(bob, "int").with_next(a1)).unwrap();
//! a.set_start(a0).unwrap();
//!
//! let b = sys.machine_mut(bob).unwrap();
//! b.set_comment("Bob");
//! let b0 = b.new_state();
//! let b1 = b.new_state();
//! b.add_transition(b0, Transition::recv(alice, "int").with_next(b1)).unwrap();
//! b.set_start(b0).unwrap();
//!
//! let out = sys.render().unwrap();
//! assert!(out.contains("q00 1 ! int q01"));
//! assert!(out.contains("q10 0 ? int q11"));
//! ```

pub mod core;
pub mod integrity;
pub mod petrify;
pub mod snapshot;

// Re-export commonly used types
pub use crate::core::{Action, CfsmError, Machine, MachineKey, State, StateId, System, Transition};
pub use integrity::IntegrityViolation;
pub use snapshot::{Snapshot, SnapshotError};
