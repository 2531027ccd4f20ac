//! Session state driven by the host's main loop.

use serde::{Deserialize, Serialize};

use crate::actors::ActorArena;

/// Phases of the host main loop that matter to the extension layer.
///
/// All content mutation (scans, reloads, registry edits) happens inside
/// `Loading`; `Running` only ever reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionPhase {
    #[default]
    Loading,
    Running,
}

/// The running host session: live actors plus the current load phase.
///
/// The host transitions to `Loading` before firing a content reload and back
/// to `Running` once every registry has settled.
#[derive(Debug, Default)]
pub struct HostSession {
    pub actors: ActorArena,
    phase: SessionPhase,
}

impl HostSession {
    /// Create a new session in the `Loading` phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Enter the `Loading` phase. Content mutation is only legal until
    /// [`finish_loading`](Self::finish_loading) is called.
    pub fn begin_loading(&mut self) {
        self.phase = SessionPhase::Loading;
    }

    /// Leave the `Loading` phase.
    pub fn finish_loading(&mut self) {
        self.phase = SessionPhase::Running;
    }

    /// Check whether content mutation is currently allowed.
    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Loading
    }
}
