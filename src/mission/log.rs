//! Narrated mission history
//!
//! Two views over the same lines: the full history (for briefings) and a
//! display queue that a renderer drains.

use std::collections::VecDeque;

use crate::entity::CAPTURED_SUFFIX;

/// Speaker used for operator directives and engine announcements
pub const MISSION_CONTROL: &str = "Mission Control";

#[derive(Debug, Clone, Default)]
pub struct MissionLog {
    entries: Vec<String>,
    display_queue: VecDeque<String>,
    last_directive: Option<String>,
}

impl MissionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a line. The captured marker is stripped so narration uses plain names.
    pub fn append(&mut self, line: impl Into<String>) {
        let line = line.into().replace(CAPTURED_SUFFIX, "");
        tracing::info!(target: "black_site::mission", "{}", line);
        self.display_queue.push_back(line.clone());
        self.entries.push(line);
    }

    /// Store an operator directive and narrate it
    pub fn inject_directive(&mut self, directive: impl Into<String>) {
        let directive = directive.into();
        self.append(format!("{}: {}", MISSION_CONTROL, directive));
        self.last_directive = Some(directive);
    }

    pub fn last_directive(&self) -> Option<&str> {
        self.last_directive.as_deref()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// The last `n` lines, oldest first
    pub fn recent(&self, n: usize) -> &[String] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Lines appended since the previous drain
    pub fn drain(&mut self) -> Vec<String> {
        self.display_queue.drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.display_queue.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_strips_captured_marker() {
        let mut log = MissionLog::new();
        log.append("Vega: Ledger (Captured) captured!");
        assert_eq!(log.entries(), ["Vega: Ledger captured!"]);
    }

    #[test]
    fn test_drain_empties_queue_but_keeps_history() {
        let mut log = MissionLog::new();
        log.append("one");
        log.append("two");
        assert_eq!(log.drain(), vec!["one", "two"]);
        assert_eq!(log.pending(), 0);
        assert_eq!(log.len(), 2);

        log.append("three");
        assert_eq!(log.drain(), vec!["three"]);
        assert_eq!(log.recent(2), ["two", "three"]);
        assert_eq!(log.recent(10).len(), 3);
    }

    #[test]
    fn test_directive_is_remembered_and_narrated() {
        let mut log = MissionLog::new();
        assert_eq!(log.last_directive(), None);
        log.inject_directive("Go loud");
        log.inject_directive("Stay quiet");
        assert_eq!(log.last_directive(), Some("Stay quiet"));
        assert_eq!(log.entries().last().map(String::as_str), Some("Mission Control: Stay quiet"));
    }
}
