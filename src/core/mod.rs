//! Core data model of a communicating system.
//!
//! This module contains the in-memory model and its consistency rules:
//! - Machines owned by a [`System`], numbered densely `0..n-1`
//! - States owned by a [`Machine`], numbered densely `0..k-1`
//! - Send and receive [`Transition`]s naming a peer machine and a next state
//!
//! Nothing here executes the machines; the model only describes them.

mod error;
mod machine;
mod state;
mod system;
mod transition;

pub use error::CfsmError;
pub use machine::{Machine, MachineKey};
pub use state::{State, StateId};
pub use system::System;
pub use transition::{Action, PeerIds, Transition};
