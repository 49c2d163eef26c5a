//! Tuning tables: action -> primary skill, action -> alarm increase, alarm -> skill bonus
//!
//! These are plain data passed into the engine, so tests can swap them out.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::Skill;
use crate::skills::action::ActionKind;

/// Quantized skill level used by the alarm table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillTier {
    Expert,
    Intermediate,
    Novice,
}

impl SkillTier {
    /// Map a raw skill value onto a tier.
    ///
    /// 1.0 is expert, 0.7 or 0.8 intermediate, 0.0 novice. Anything else has no tier.
    pub fn from_value(value: f32, tolerance: f32) -> Option<SkillTier> {
        let near = |anchor: f32| (value - anchor).abs() <= tolerance;
        if near(1.0) {
            Some(SkillTier::Expert)
        } else if near(0.7) || near(0.8) {
            Some(SkillTier::Intermediate)
        } else if near(0.0) {
            Some(SkillTier::Novice)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionSkill {
    pub action: ActionKind,
    pub skill: Skill,
}

/// Which skill an action is rolled against (and which skill tiers its alarm cost)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSkillTable {
    pub entries: Vec<ActionSkill>,
}

impl ActionSkillTable {
    pub fn skill_for(&self, action: ActionKind) -> Option<Skill> {
        self.entries
            .iter()
            .find(|entry| entry.action == action)
            .map(|entry| entry.skill)
    }
}

impl Default for ActionSkillTable {
    fn default() -> Self {
        use ActionKind as A;
        let pairs = [
            // Wait never rolls; stealth is only used to pick an alarm tier
            (A::Wait, Skill::Stealth),
            (A::LookAround, Skill::Observation),
            (A::Move, Skill::Stealth),
            (A::Peek, Skill::Observation),
            (A::Investigate, Skill::Observation),
            (A::Hide, Skill::Stealth),
            (A::TakeOut, Skill::HandToHand),
            (A::Shoot, Skill::Firearms),
            (A::Bypass, Skill::Acrobatics),
            // Overridden by the objective's required skill when rolling
            (A::Capture, Skill::Stealth),
            (A::Sneak, Skill::Stealth),
            (A::Charge, Skill::Firearms),
            (A::Exfiltrate, Skill::Stealth),
        ];
        Self {
            entries: pairs
                .into_iter()
                .map(|(action, skill)| ActionSkill { action, skill })
                .collect(),
        }
    }
}

/// Alarm contribution of one action.
///
/// Either a flat value regardless of skill, or one value per skill tier.
/// A missing tier is a table gap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AlarmRule {
    pub action: Option<ActionKind>,
    pub flat: Option<f32>,
    pub expert: Option<f32>,
    pub intermediate: Option<f32>,
    pub novice: Option<f32>,
}

impl AlarmRule {
    fn flat(action: ActionKind, value: f32) -> Self {
        Self {
            action: Some(action),
            flat: Some(value),
            ..Self::default()
        }
    }

    fn tiered(action: ActionKind, expert: f32, intermediate: f32, novice: Option<f32>) -> Self {
        Self {
            action: Some(action),
            flat: None,
            expert: Some(expert),
            intermediate: Some(intermediate),
            novice,
        }
    }

    fn for_tier(&self, tier: SkillTier) -> Option<f32> {
        match tier {
            SkillTier::Expert => self.expert,
            SkillTier::Intermediate => self.intermediate,
            SkillTier::Novice => self.novice,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmTable {
    pub rules: Vec<AlarmRule>,
    /// How far a skill value may sit from a tier anchor and still count as that tier
    pub tier_tolerance: f32,
}

impl AlarmTable {
    /// Alarm magnitude caused by `action` performed with the given primary skill value
    pub fn lookup(&self, action: ActionKind, skill_value: f32) -> Result<f32> {
        let gap = || SimError::UnknownSkillTier {
            action: action.to_string(),
            skill: skill_value,
        };

        let rule = self
            .rules
            .iter()
            .find(|rule| rule.action == Some(action))
            .ok_or_else(gap)?;

        if let Some(flat) = rule.flat {
            return Ok(flat);
        }

        let tier = SkillTier::from_value(skill_value, self.tier_tolerance).ok_or_else(gap)?;
        rule.for_tier(tier).ok_or_else(gap)
    }
}

impl Default for AlarmTable {
    fn default() -> Self {
        use ActionKind as A;
        Self {
            rules: vec![
                AlarmRule::flat(A::Wait, 0.0),
                AlarmRule::tiered(A::LookAround, 0.0, 0.0, None),
                // Walking through a passage is silent; a passage that needs
                // climbing or picking charges a bypass on top
                AlarmRule::flat(A::Move, 0.0),
                AlarmRule::tiered(A::Peek, 0.02, 0.05, None),
                AlarmRule::tiered(A::Investigate, 0.0, 0.1, None),
                AlarmRule::tiered(A::Hide, 0.15, 0.2, Some(0.5)),
                AlarmRule::tiered(A::TakeOut, 0.3, 0.6, None),
                AlarmRule::flat(A::Shoot, 2.0),
                AlarmRule::tiered(A::Bypass, 0.2, 0.5, None),
                AlarmRule::tiered(A::Capture, 0.4, 0.7, None),
                AlarmRule::tiered(A::Sneak, 0.15, 0.2, Some(0.5)),
                AlarmRule::flat(A::Charge, 1.0),
                AlarmRule::tiered(A::Exfiltrate, 0.15, 0.2, Some(0.5)),
            ],
            tier_tolerance: 1e-3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlarmSkillStep {
    pub alarm: f32,
    pub bonus: f32,
}

/// Step function from a hostile's alarm level to its observation / hand-to-hand bonus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmSkillSteps {
    pub steps: Vec<AlarmSkillStep>,
}

impl AlarmSkillSteps {
    /// Bonus of the largest threshold not above `alarm`
    pub fn bonus_for(&self, alarm: f32) -> f32 {
        self.steps
            .iter()
            .filter(|step| alarm >= step.alarm)
            .max_by(|a, b| a.alarm.total_cmp(&b.alarm))
            .map(|step| step.bonus)
            .unwrap_or(0.0)
    }
}

impl Default for AlarmSkillSteps {
    fn default() -> Self {
        Self {
            steps: vec![
                AlarmSkillStep { alarm: 0.0, bonus: 0.0 },
                AlarmSkillStep { alarm: 0.5, bonus: 0.2 },
                AlarmSkillStep { alarm: 1.0, bonus: 0.4 },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_quantization() {
        assert_eq!(SkillTier::from_value(1.0, 1e-3), Some(SkillTier::Expert));
        assert_eq!(SkillTier::from_value(0.7, 1e-3), Some(SkillTier::Intermediate));
        assert_eq!(SkillTier::from_value(0.8, 1e-3), Some(SkillTier::Intermediate));
        assert_eq!(SkillTier::from_value(0.0, 1e-3), Some(SkillTier::Novice));
        assert_eq!(SkillTier::from_value(0.45, 1e-3), None);
    }

    #[test]
    fn test_alarm_lookup_tiered() {
        let table = AlarmTable::default();
        assert_eq!(table.lookup(ActionKind::Hide, 1.0).unwrap(), 0.15);
        assert_eq!(table.lookup(ActionKind::Hide, 0.7).unwrap(), 0.2);
        assert_eq!(table.lookup(ActionKind::Hide, 0.0).unwrap(), 0.5);
    }

    #[test]
    fn test_alarm_lookup_flat_ignores_skill() {
        let table = AlarmTable::default();
        assert_eq!(table.lookup(ActionKind::Shoot, 0.33).unwrap(), 2.0);
        assert_eq!(table.lookup(ActionKind::Charge, 0.9).unwrap(), 1.0);
        assert_eq!(table.lookup(ActionKind::Move, 0.0).unwrap(), 0.0);
        assert_eq!(table.lookup(ActionKind::Move, 0.45).unwrap(), 0.0);
    }

    #[test]
    fn test_alarm_lookup_gaps_are_errors() {
        let table = AlarmTable::default();
        // Off-tier skill value
        assert!(matches!(
            table.lookup(ActionKind::Capture, 0.5),
            Err(SimError::UnknownSkillTier { .. })
        ));
        // Tier exists but the action has no novice entry
        assert!(table.lookup(ActionKind::TakeOut, 0.0).is_err());
    }

    #[test]
    fn test_alarm_skill_steps() {
        let steps = AlarmSkillSteps::default();
        assert_eq!(steps.bonus_for(0.0), 0.0);
        assert_eq!(steps.bonus_for(0.49), 0.0);
        assert_eq!(steps.bonus_for(0.5), 0.2);
        assert_eq!(steps.bonus_for(0.99), 0.2);
        assert_eq!(steps.bonus_for(1.0), 0.4);
    }

    #[test]
    fn test_capture_rolls_stealth_by_default() {
        let table = ActionSkillTable::default();
        assert_eq!(table.skill_for(ActionKind::Capture), Some(Skill::Stealth));
        assert_eq!(table.skill_for(ActionKind::Shoot), Some(Skill::Firearms));
    }
}
