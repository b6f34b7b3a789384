//! Petrify export.
//!
//! Petrify is a Petri net synthesis tool reading a restricted state graph
//! notation. This module renders machines into that notation and provides
//! the character encoding message labels go through on the way.

mod encoding;
mod export;

pub use encoding::{decode, encode};
pub use export::{render_all, Petrify};
