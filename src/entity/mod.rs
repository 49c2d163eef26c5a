//! World objects: a shared base plus a closed set of kinds

pub mod base;
pub mod character;
pub mod equipment;
pub mod objective;

pub use base::EntityBase;
pub use character::{Agent, Character, Hostile};
pub use equipment::Equipment;
pub use objective::{Objective, ObjectiveKind, Obstacle, CAPTURED_SUFFIX};

use crate::core::types::{AreaId, EntityId, Exploration};

#[derive(Debug, Clone)]
pub enum EntityKind {
    Agent(Agent),
    Hostile(Hostile),
    Objective(Objective),
    Obstacle(Obstacle),
}

/// Anything that lives inside an area
#[derive(Debug, Clone)]
pub struct Entity {
    pub base: EntityBase,
    pub kind: EntityKind,
}

impl Entity {
    /// Agents start fully known to their own team
    pub fn agent(name: impl Into<String>, description: impl Into<String>, area: AreaId, agent: Agent) -> Self {
        let mut base = EntityBase::new(name, description).with_explored(Exploration::Known);
        base.area = Some(area);
        Self {
            base,
            kind: EntityKind::Agent(agent),
        }
    }

    /// Hostiles start at the first stop of their patrol route
    pub fn hostile(name: impl Into<String>, description: impl Into<String>, hostile: Hostile) -> Self {
        let mut base = EntityBase::new(name, description);
        base.area = hostile.patrol.start();
        Self {
            base,
            kind: EntityKind::Hostile(hostile),
        }
    }

    pub fn objective(
        name: impl Into<String>,
        description: impl Into<String>,
        area: AreaId,
        objective: Objective,
    ) -> Self {
        let mut base = EntityBase::new(name, description).with_explored(Exploration::Glimpsed);
        base.area = Some(area);
        Self {
            base,
            kind: EntityKind::Objective(objective),
        }
    }

    pub fn obstacle(
        name: impl Into<String>,
        description: impl Into<String>,
        area: AreaId,
        obstacle: Obstacle,
    ) -> Self {
        let mut base = EntityBase::new(name, description);
        base.area = Some(area);
        Self {
            base,
            kind: EntityKind::Obstacle(obstacle),
        }
    }

    pub fn with_base(mut self, f: impl FnOnce(EntityBase) -> EntityBase) -> Self {
        let area = self.base.area;
        self.base = f(self.base);
        self.base.area = area;
        self
    }

    pub fn id(&self) -> EntityId {
        self.base.id
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    pub fn area(&self) -> Option<AreaId> {
        self.base.area
    }

    pub fn explored(&self) -> Exploration {
        self.base.explored
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            EntityKind::Agent(_) => "agent",
            EntityKind::Hostile(_) => "hostile",
            EntityKind::Objective(_) => "objective",
            EntityKind::Obstacle(_) => "obstacle",
        }
    }

    pub fn is_agent(&self) -> bool {
        matches!(self.kind, EntityKind::Agent(_))
    }

    pub fn is_hostile(&self) -> bool {
        matches!(self.kind, EntityKind::Hostile(_))
    }

    pub fn is_objective(&self) -> bool {
        matches!(self.kind, EntityKind::Objective(_))
    }

    pub fn character(&self) -> Option<&Character> {
        match &self.kind {
            EntityKind::Agent(agent) => Some(&agent.character),
            EntityKind::Hostile(hostile) => Some(&hostile.character),
            _ => None,
        }
    }

    pub fn character_mut(&mut self) -> Option<&mut Character> {
        match &mut self.kind {
            EntityKind::Agent(agent) => Some(&mut agent.character),
            EntityKind::Hostile(hostile) => Some(&mut hostile.character),
            _ => None,
        }
    }

    pub fn as_agent(&self) -> Option<&Agent> {
        match &self.kind {
            EntityKind::Agent(agent) => Some(agent),
            _ => None,
        }
    }

    pub fn as_agent_mut(&mut self) -> Option<&mut Agent> {
        match &mut self.kind {
            EntityKind::Agent(agent) => Some(agent),
            _ => None,
        }
    }

    pub fn as_hostile(&self) -> Option<&Hostile> {
        match &self.kind {
            EntityKind::Hostile(hostile) => Some(hostile),
            _ => None,
        }
    }

    pub fn as_hostile_mut(&mut self) -> Option<&mut Hostile> {
        match &mut self.kind {
            EntityKind::Hostile(hostile) => Some(hostile),
            _ => None,
        }
    }

    pub fn as_objective(&self) -> Option<&Objective> {
        match &self.kind {
            EntityKind::Objective(objective) => Some(objective),
            _ => None,
        }
    }

    pub fn as_obstacle(&self) -> Option<&Obstacle> {
        match &self.kind {
            EntityKind::Obstacle(obstacle) => Some(obstacle),
            _ => None,
        }
    }

    /// Mark an objective captured and tag its display name.
    ///
    /// Returns false for non-objectives and already-captured objectives.
    pub fn capture(&mut self) -> bool {
        let EntityKind::Objective(objective) = &mut self.kind else {
            return false;
        };
        if !objective.mark_captured() {
            return false;
        }
        self.base.name.push_str(CAPTURED_SUFFIX);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Skill, Skills};

    #[test]
    fn test_hostile_starts_on_route() {
        let hostile = Hostile::new(Skills::new(), &[AreaId(3), AreaId(4)]);
        let entity = Entity::hostile("Guard", "", hostile);
        assert_eq!(entity.area(), Some(AreaId(3)));
        assert_eq!(entity.explored(), Exploration::Unknown);
    }

    #[test]
    fn test_capture_renames_once() {
        let mut entity = Entity::objective(
            "Ledger",
            "",
            AreaId(0),
            Objective::new(ObjectiveKind::Simple, 0.1),
        );
        assert!(entity.capture());
        assert_eq!(entity.name(), "Ledger (Captured)");
        assert!(!entity.capture());
        assert_eq!(entity.name(), "Ledger (Captured)");
    }

    #[test]
    fn test_character_accessors() {
        let agent = Agent::new(Character::new(Skills::new().with(Skill::Stealth, 0.7)));
        let entity = Entity::agent("Vega", "", AreaId(0), agent);
        assert!(entity.is_agent());
        assert_eq!(entity.character().map(|c| c.skill(Skill::Stealth)), Some(0.7));
        assert!(entity.as_hostile().is_none());
    }
}
