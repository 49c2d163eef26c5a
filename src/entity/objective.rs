//! Mission objectives and the obstacles standing in front of them

use serde::{Deserialize, Serialize};

use crate::core::types::{unit, Skill};

/// Marker appended to an objective's name once captured
pub const CAPTURED_SUFFIX: &str = " (Captured)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// Anyone can take it; only the difficulty matters
    Simple,
    Computer,
    Person,
    Other,
}

impl ObjectiveKind {
    pub fn required_skill(self) -> Option<Skill> {
        match self {
            ObjectiveKind::Simple => None,
            ObjectiveKind::Computer => Some(Skill::Hacking),
            ObjectiveKind::Person => Some(Skill::HandToHand),
            ObjectiveKind::Other => Some(Skill::Observation),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Objective {
    pub kind: ObjectiveKind,
    difficulty: f32,
    pub required_skill: Option<Skill>,
    captured: bool,
}

impl Objective {
    pub fn new(kind: ObjectiveKind, difficulty: f32) -> Self {
        Self {
            kind,
            difficulty: unit(difficulty),
            required_skill: kind.required_skill(),
            captured: false,
        }
    }

    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Terminal: returns false if it was already captured
    pub(crate) fn mark_captured(&mut self) -> bool {
        !std::mem::replace(&mut self.captured, true)
    }
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    /// Free-form tag such as "fence" or "keypad"
    pub obstacle_type: String,
    difficulty: f32,
}

impl Obstacle {
    pub fn new(obstacle_type: impl Into<String>, difficulty: f32) -> Self {
        Self {
            obstacle_type: obstacle_type.into(),
            difficulty: unit(difficulty),
        }
    }

    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }
}
