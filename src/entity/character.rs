//! Characters: field agents and the hostiles guarding the site

use crate::core::types::{unit, AreaId, Skill, Skills};
use crate::entity::equipment::Equipment;
use crate::patrol::route::PatrolRoute;
use crate::skills::tables::AlarmSkillSteps;

/// Body, skills and gear shared by agents and hostiles
#[derive(Debug, Clone)]
pub struct Character {
    pub(crate) health: f32,
    max_health: f32,
    pub resilience: f32,
    pub stress_level: f32,
    pub(crate) skills: Skills,
    pub is_hidden: bool,
    pub inventory: Vec<Equipment>,
}

impl Character {
    pub fn new(skills: Skills) -> Self {
        Self {
            health: 1.0,
            max_health: 1.0,
            resilience: 0.5,
            stress_level: 0.0,
            skills,
            is_hidden: false,
            inventory: Vec::new(),
        }
    }

    /// Sets both current health and the max-health snapshot
    pub fn with_health(mut self, health: f32) -> Self {
        self.health = unit(health);
        self.max_health = self.health;
        self
    }

    pub fn with_resilience(mut self, resilience: f32) -> Self {
        self.resilience = unit(resilience);
        self
    }

    pub fn with_item(mut self, item: Equipment) -> Self {
        self.inventory.push(item);
        self
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Health as a fraction of the health the character started with
    pub fn health_ratio(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Returns true when the damage was lethal
    pub fn take_damage(&mut self, damage: f32) -> bool {
        self.health = (self.health - damage.max(0.0)).max(0.0);
        !self.is_alive()
    }

    pub fn skill(&self, skill: Skill) -> f32 {
        self.skills.get(skill)
    }

    pub fn skills(&self) -> &Skills {
        &self.skills
    }

    pub fn set_skill(&mut self, skill: Skill, value: f32) {
        self.skills.set(skill, value);
    }
}

/// A field agent steered by the external decision source
#[derive(Debug, Clone)]
pub struct Agent {
    pub character: Character,
    /// Personality text forwarded to the decision source
    pub behavior: String,
    /// Briefing assembled at the start of each turn
    pub knowledge_base: String,
}

impl Agent {
    pub fn new(character: Character) -> Self {
        Self {
            character,
            behavior: String::new(),
            knowledge_base: String::new(),
        }
    }

    pub fn with_behavior(mut self, behavior: impl Into<String>) -> Self {
        self.behavior = behavior.into();
        self
    }
}

/// A guard whose perception sharpens as its alarm rises
#[derive(Debug, Clone)]
pub struct Hostile {
    pub character: Character,
    alarm_level: f32,
    init_observation: f32,
    init_hand_to_hand: f32,
    max_observation: f32,
    max_hand_to_hand: f32,
    pub patrol: PatrolRoute,
    pub is_patrolling: bool,
    pub alarm_increased_this_turn: bool,
}

impl Hostile {
    /// Guards start at 0.6 health and cap observation / hand-to-hand at 0.4
    pub fn new(skills: Skills, waypoints: &[AreaId]) -> Self {
        Self {
            character: Character::new(skills).with_health(0.6),
            alarm_level: 0.0,
            init_observation: skills.get(Skill::Observation),
            init_hand_to_hand: skills.get(Skill::HandToHand),
            max_observation: 0.4,
            max_hand_to_hand: 0.4,
            patrol: PatrolRoute::pendulum(waypoints),
            is_patrolling: true,
            alarm_increased_this_turn: false,
        }
    }

    pub fn with_health(mut self, health: f32) -> Self {
        self.character = self.character.with_health(health);
        self
    }

    pub fn with_skill_caps(mut self, max_observation: f32, max_hand_to_hand: f32) -> Self {
        self.max_observation = unit(max_observation);
        self.max_hand_to_hand = unit(max_hand_to_hand);
        self
    }

    pub fn alarm_level(&self) -> f32 {
        self.alarm_level
    }

    /// Alarm maxed out: the guard is fighting and no longer calms down
    pub fn in_fight_mode(&self) -> bool {
        self.alarm_level >= 1.0
    }

    /// Shift the alarm level, clamped to [0, 1]. Frozen once it reaches 1.
    ///
    /// Returns false when the change was ignored.
    pub fn adjust_alarm(&mut self, delta: f32) -> bool {
        if self.in_fight_mode() {
            return false;
        }
        if delta > 0.0 {
            self.alarm_increased_this_turn = true;
        }
        self.alarm_level = unit(self.alarm_level + delta);
        tracing::debug!(alarm = self.alarm_level, delta, "hostile alarm adjusted");
        true
    }

    /// Recompute observation and hand-to-hand from the baselines plus the alarm bonus
    pub fn refresh_skills(&mut self, steps: &AlarmSkillSteps) {
        let bonus = steps.bonus_for(self.alarm_level);
        let observation = (self.init_observation + bonus).min(self.max_observation);
        let hand_to_hand = (self.init_hand_to_hand + bonus).min(self.max_hand_to_hand);
        self.character.set_skill(Skill::Observation, observation);
        self.character.set_skill(Skill::HandToHand, hand_to_hand);
    }

    pub fn clear_turn_flags(&mut self) {
        self.alarm_increased_this_turn = false;
    }
}
