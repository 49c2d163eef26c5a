//! Engine tuning with documented constants
//!
//! All magic numbers are collected here. The engine receives a `TuningConfig`
//! at construction; nothing reads a global.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::error::{Result, SimError};
use crate::skills::tables::{ActionSkillTable, AlarmSkillSteps, AlarmTable};

/// Tuning values for skill checks, alarm propagation and hostile behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    // === SKILL CHECKS ===
    /// Added to every peek check (negative: peeking is harder than looking)
    pub peek_modifier: f32,

    /// Added to every investigate check
    pub investigate_modifier: f32,

    /// Standard deviation of the normal draws used for shot damage
    pub skill_sigma: f32,

    /// Maximum damage a single hit can deal
    pub max_shot_damage: f32,

    /// Skill value used for captures of objectives that need no particular skill
    pub unskilled_capture_value: f32,

    // === ALARM ===
    /// Extra alarm for peeking through a door (open archways and windows are exempt)
    pub door_peek_alarm_penalty: f32,

    /// Alarm shed by a hostile that heard nothing during a turn
    pub relax_decay: f32,

    /// Alarm dumped into an area whenever a hostile opens fire there
    pub hostile_fire_alarm: f32,

    // === HOSTILES ===
    /// Above this alarm level a hostile stops patrolling and chases noise
    pub alarmed_threshold: f32,

    /// Chance a patrolling guard lingers in place for a turn
    pub guard_stay_probability: f32,

    // === DECISIONS ===
    /// How many times a decision batch may be requested before the turn fails
    pub max_decision_attempts: u32,

    /// Pause before the first retry, in milliseconds
    pub retry_backoff_ms: u64,

    /// Multiplier applied to the pause after each failed attempt
    pub retry_backoff_factor: f32,

    /// Mission-log lines included in an agent's briefing
    pub briefing_log_lines: usize,

    // === TABLES ===
    pub action_skills: ActionSkillTable,
    pub alarm_table: AlarmTable,
    pub alarm_skill_steps: AlarmSkillSteps,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            peek_modifier: -0.2,
            investigate_modifier: 0.2,
            skill_sigma: 0.2,
            max_shot_damage: 0.1,
            unskilled_capture_value: 1.0,

            door_peek_alarm_penalty: 0.2,
            relax_decay: 0.1,
            hostile_fire_alarm: 2.0,

            alarmed_threshold: 0.5,
            guard_stay_probability: 0.25,

            max_decision_attempts: 5,
            retry_backoff_ms: 0,
            retry_backoff_factor: 2.0,
            briefing_log_lines: 100,

            action_skills: ActionSkillTable::default(),
            alarm_table: AlarmTable::default(),
            alarm_skill_steps: AlarmSkillSteps::default(),
        }
    }
}

impl TuningConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML; omitted fields keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: TuningConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.guard_stay_probability) {
            return Err(SimError::Config(format!(
                "guard_stay_probability ({}) must be within [0, 1]",
                self.guard_stay_probability
            )));
        }

        if !(0.0..=1.0).contains(&self.alarmed_threshold) {
            return Err(SimError::Config(format!(
                "alarmed_threshold ({}) must be within [0, 1]",
                self.alarmed_threshold
            )));
        }

        if self.skill_sigma < 0.0 || !self.skill_sigma.is_finite() {
            return Err(SimError::Config("skill_sigma must be finite and >= 0".into()));
        }

        if self.max_shot_damage < 0.0 || self.relax_decay < 0.0 {
            return Err(SimError::Config(
                "max_shot_damage and relax_decay must be >= 0".into(),
            ));
        }

        if self.max_decision_attempts == 0 {
            return Err(SimError::Config("max_decision_attempts must be >= 1".into()));
        }

        for action in crate::skills::action::ActionKind::ALL {
            if self.action_skills.skill_for(action).is_none() {
                return Err(SimError::Config(format!(
                    "no primary skill configured for action '{}'",
                    action
                )));
            }
        }

        Ok(())
    }
}

/// Switches that change how the mission is run rather than how checks resolve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Agents are forced hidden every turn
    pub agents_always_hidden: bool,

    /// Hostiles are reported visible to the renderer even when unobserved
    pub hostiles_always_visible: bool,

    /// Offer move, peek and investigate to the decision source
    pub extended_actions: bool,

    /// Seed for the mission RNG; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            agents_always_hidden: false,
            hostiles_always_visible: false,
            extended_actions: true,
            seed: None,
        }
    }
}
