//! Shared identity, location and exploration state

use crate::core::types::{unit, AreaId, EntityId, Exploration};

/// State every world object carries regardless of what it is
#[derive(Debug, Clone)]
pub struct EntityBase {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub(crate) area: Option<AreaId>,
    pub(crate) explored: Exploration,
    /// Difficulty of noticing this entity while looking around or peeking
    pub spot_difficulty: f32,
    /// Difficulty of noticing this entity while investigating
    pub investigate_difficulty: f32,
    /// Seen through a peek this turn
    pub is_peeked: bool,
}

impl EntityBase {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            description: description.into(),
            area: None,
            explored: Exploration::Unknown,
            spot_difficulty: 0.0,
            investigate_difficulty: 0.0,
            is_peeked: false,
        }
    }

    pub fn with_spot_difficulty(mut self, difficulty: f32) -> Self {
        self.spot_difficulty = unit(difficulty);
        self
    }

    pub fn with_investigate_difficulty(mut self, difficulty: f32) -> Self {
        self.investigate_difficulty = unit(difficulty);
        self
    }

    pub fn with_explored(mut self, level: Exploration) -> Self {
        self.explored = level;
        self
    }

    pub fn area(&self) -> Option<AreaId> {
        self.area
    }

    pub fn explored(&self) -> Exploration {
        self.explored
    }

    /// How the entity reads to someone with the current level of knowledge
    ///
    /// Unknown entities get their full description, glimpsed ones a short
    /// reference, fully known ones nothing at all.
    pub fn display_description(&self) -> String {
        match self.explored {
            Exploration::Unknown => {
                let desc = self.description.trim().trim_end_matches('.');
                if desc.is_empty() {
                    self.name.clone()
                } else {
                    format!("{} ({})", self.name, desc)
                }
            }
            Exploration::Glimpsed => format!("the {}", self.name),
            Exploration::Known => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_description_by_level() {
        let base = EntityBase::new("Server Rack", "A humming rack of blades.");
        assert_eq!(base.display_description(), "Server Rack (A humming rack of blades)");

        let glimpsed = base.clone().with_explored(Exploration::Glimpsed);
        assert_eq!(glimpsed.display_description(), "the Server Rack");

        let known = base.with_explored(Exploration::Known);
        assert!(known.display_description().is_empty());
    }

    #[test]
    fn test_difficulties_clamped() {
        let base = EntityBase::new("Crate", "")
            .with_spot_difficulty(1.4)
            .with_investigate_difficulty(-0.2);
        assert_eq!(base.spot_difficulty, 1.0);
        assert_eq!(base.investigate_difficulty, 0.0);
    }
}
