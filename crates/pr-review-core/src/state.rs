//! Popup session state
//!
//! Lives only as long as the popup; nothing here is persisted.

use crate::error::ErrorKind;
use crate::event::FetchTag;
use crate::pr_identity::PrIdentity;

/// Orchestrator state machine phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    /// No usable credential; the settings view should be shown
    AwaitingCredential,
    Loading,
    Ready(Vec<String>),
    Error(ErrorKind),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub phase: Phase,
    /// PR of the active tab, `None` on any other page
    pub current_pr: Option<PrIdentity>,
    pub credential_present: bool,
    pub last_error: Option<ErrorKind>,
    /// Whether the settings view should be visible
    pub show_settings: bool,
    /// Newest fetch still awaited for the current PR
    pub(crate) pending: Option<FetchTag>,
    /// Results of fetches at or below this generation are ignored
    pub(crate) generation_floor: u64,
    pub(crate) last_generation: u64,
}

impl SessionState {
    /// A fetch for the current PR is in flight
    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_fetch(&self) -> Option<&FetchTag> {
        self.pending.as_ref()
    }

    /// Suggestions currently on display (empty unless `Ready`)
    pub fn suggestions(&self) -> &[String] {
        match &self.phase {
            Phase::Ready(suggestions) => suggestions,
            _ => &[],
        }
    }

    pub(crate) fn next_generation(&mut self) -> u64 {
        self.last_generation += 1;
        self.last_generation
    }

    /// Soft-cancel everything issued so far
    pub(crate) fn invalidate_in_flight(&mut self) {
        self.pending = None;
        self.generation_floor = self.last_generation;
    }
}
