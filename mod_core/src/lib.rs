//! # Mod Core
//!
//! The "Workshop" crate - a runtime extension framework for the host game.
//! External declarative content (characters, scenes, narrative timelines)
//! is loaded from data files, validated, composed through inheritance, and
//! exposed to the host without modifying host code.
//!
//! ## Core Components
//!
//! - **data**: read-only typed views over parsed files with field paths
//! - **ident**: uniquely-claimed, identity-comparable content identifiers
//! - **features**: named, typed attribute descriptors and per-entry lists
//! - **registry**: keyed content stores with hot reload and atomic rollback
//! - **content**: the character / scene / timeline entry types
//! - **resolver**: ancestor flattening and the composed timeline order
//! - **cache**: per-actor lazy state, gated by feature presence
//!
//! ## Design Philosophy
//!
//! - **Data-Driven**: content is declared in files; code only interprets it
//! - **Fail-Local**: one broken file never takes down a load phase
//! - **Explicit**: registries are plain values passed where needed, with no
//!   process-global registration side effects

pub mod cache;
pub mod config;
pub mod content;
pub mod data;
pub mod features;
pub mod ident;
pub mod registry;
pub mod resolver;
pub mod state;

pub use cache::*;
pub use config::*;
pub use content::*;
pub use data::*;
pub use features::*;
pub use ident::*;
pub use registry::*;
pub use resolver::*;
pub use state::*;
