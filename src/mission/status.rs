//! Where the mission stands

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MissionStatus {
    Ongoing,
    /// No agents left in the field: dead or exfiltrated
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObjectiveProgress {
    pub captured: usize,
    pub total: usize,
}

impl ObjectiveProgress {
    pub fn is_complete(&self) -> bool {
        self.captured == self.total
    }
}

/// Result of one call to `process_turn`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A turn was resolved; `agents` acted in it
    Played { turn: u32, agents: usize },
    MissionOver,
}
