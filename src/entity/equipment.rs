//! Carried gear. Modifiers are recorded but not yet applied to checks.

use serde::{Deserialize, Serialize};

use crate::core::types::Skill;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub name: String,
    pub modifiers: Vec<(Skill, f32)>,
}

impl Equipment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, skill: Skill, value: f32) -> Self {
        self.modifiers.push((skill, value));
        self
    }

    /// Modifier for a skill, 0 when the item does not touch it
    pub fn modifier(&self, skill: Skill) -> f32 {
        self.modifiers
            .iter()
            .filter(|(s, _)| *s == skill)
            .map(|(_, v)| *v)
            .sum()
    }

    pub fn submachine_gun() -> Self {
        Self::new("Submachine Gun")
            .with_modifier(Skill::Firearms, 0.2)
            .with_modifier(Skill::Acrobatics, -0.2)
            .with_modifier(Skill::Stealth, -0.2)
    }

    pub fn sniper_rifle() -> Self {
        Self::new("Sniper Rifle")
            .with_modifier(Skill::Acrobatics, -0.3)
            .with_modifier(Skill::Stealth, -0.4)
    }
}
