//! # Game Host
//!
//! The "Stage" crate - the host application's boundary as seen by the
//! extension layer: live actors, the generational arena that owns them, and
//! the session load phases that frame every content reload. This crate
//! contains no extension logic of its own.

pub mod actors;
pub mod session;

pub use actors::*;
pub use session::*;
