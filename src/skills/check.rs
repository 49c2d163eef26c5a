//! Single-roll skill checks
//!
//! Every action resolves the same way: pick the action's primary skill, work
//! out a difficulty and a modifier from what the action targets, clamp
//! `skill - difficulty + modifier` into a probability and roll once against
//! it. Each [`Check`] variant carries exactly the numbers its category needs,
//! so the rules for one category can be tested without building a world.

use rand::Rng;

use crate::core::config::TuningConfig;
use crate::core::types::{unit, Skill};
use crate::entity::{Character, EntityBase, Objective};
use crate::skills::action::ActionKind;
use crate::skills::tables::ActionSkillTable;
use crate::world::{Area, ConnectionView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserveMode {
    LookAround,
    Peek,
    Investigate,
}

impl ObserveMode {
    pub fn action(self) -> ActionKind {
        match self {
            ObserveMode::LookAround => ActionKind::LookAround,
            ObserveMode::Peek => ActionKind::Peek,
            ObserveMode::Investigate => ActionKind::Investigate,
        }
    }
}

/// What an observation is aimed at
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObserveTarget {
    /// A passage, with the difficulties of the observer's side
    Connection { spot: f32, peek: f32, investigate: f32 },
    /// Anything standing in an area
    Entity { spot: f32 },
}

/// One resolvable check, tagged by action category
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Check {
    Wait,
    Observe { mode: ObserveMode, target: ObserveTarget },
    /// Counter skill is the observer's observation
    Hide { counter_skill: f32, hiding_modifier: f32 },
    /// Counter skill is the target's hand-to-hand
    TakeOut { counter_skill: f32 },
    /// Counter skill is the target's cover; the area's cover shields the target
    Shoot { counter_skill: f32, cover_modifier: f32 },
    Bypass { access_difficulty: f32 },
    /// `None` skill: anyone may take it
    Capture { required_skill: Option<Skill>, difficulty: f32 },
}

impl Check {
    pub fn observe_connection(mode: ObserveMode, view: &ConnectionView<'_>) -> Self {
        Check::Observe {
            mode,
            target: ObserveTarget::Connection {
                spot: view.spot_difficulty(),
                peek: view.peek_difficulty(),
                investigate: view.investigate_difficulty(),
            },
        }
    }

    pub fn observe_entity(mode: ObserveMode, base: &EntityBase) -> Self {
        Check::Observe {
            mode,
            target: ObserveTarget::Entity {
                spot: base.spot_difficulty,
            },
        }
    }

    pub fn hide_from(observer: &Character, area: &Area) -> Self {
        Check::Hide {
            counter_skill: observer.skill(Skill::Observation),
            hiding_modifier: area.hiding_modifier(),
        }
    }

    pub fn take_out(target: &Character) -> Self {
        Check::TakeOut {
            counter_skill: target.skill(Skill::HandToHand),
        }
    }

    pub fn shoot_at(target: &Character, area: &Area) -> Self {
        Check::Shoot {
            counter_skill: target.skill(Skill::Cover),
            cover_modifier: area.cover_modifier(),
        }
    }

    pub fn capture(objective: &Objective) -> Self {
        Check::Capture {
            required_skill: objective.required_skill,
            difficulty: objective.difficulty(),
        }
    }

    pub fn action(&self) -> ActionKind {
        match self {
            Check::Wait => ActionKind::Wait,
            Check::Observe { mode, .. } => mode.action(),
            Check::Hide { .. } => ActionKind::Hide,
            Check::TakeOut { .. } => ActionKind::TakeOut,
            Check::Shoot { .. } => ActionKind::Shoot,
            Check::Bypass { .. } => ActionKind::Bypass,
            Check::Capture { .. } => ActionKind::Capture,
        }
    }
}

/// Every intermediate value of a resolved (or prepared) check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckTrace {
    pub action: ActionKind,
    pub skill: Option<Skill>,
    pub skill_value: f32,
    pub difficulty: f32,
    pub modifier: f32,
    pub raw_probability: f32,
    pub probability: f32,
    pub roll: f32,
    pub success: bool,
}

/// Resolves checks against the tuning it was built with
#[derive(Debug, Clone)]
pub struct SkillCheckEngine {
    action_skills: ActionSkillTable,
    peek_modifier: f32,
    investigate_modifier: f32,
    unskilled_capture_value: f32,
}

impl SkillCheckEngine {
    pub fn new(config: &TuningConfig) -> Self {
        Self {
            action_skills: config.action_skills.clone(),
            peek_modifier: config.peek_modifier,
            investigate_modifier: config.investigate_modifier,
            unskilled_capture_value: config.unskilled_capture_value,
        }
    }

    pub fn primary_skill(&self, action: ActionKind) -> Option<Skill> {
        self.action_skills.skill_for(action)
    }

    /// Success probability before rolling; `roll` is left at 0 and `success` false
    pub fn prepare(&self, actor: &Character, check: &Check, extra_modifier: f32) -> CheckTrace {
        let action = check.action();
        let mut skill = self.primary_skill(action);
        let mut modifier = extra_modifier;

        let difficulty = match *check {
            Check::Wait => {
                return CheckTrace {
                    action,
                    skill: None,
                    skill_value: 1.0,
                    difficulty: 0.0,
                    modifier: 0.0,
                    raw_probability: 1.0,
                    probability: 1.0,
                    roll: 0.0,
                    success: false,
                };
            }
            Check::Observe { mode, target } => {
                match mode {
                    ObserveMode::Peek => modifier += self.peek_modifier,
                    ObserveMode::Investigate => modifier += self.investigate_modifier,
                    ObserveMode::LookAround => {}
                }
                match target {
                    ObserveTarget::Connection { spot, peek, investigate } => match mode {
                        ObserveMode::LookAround => spot,
                        ObserveMode::Peek => peek,
                        ObserveMode::Investigate => investigate,
                    },
                    ObserveTarget::Entity { spot } => spot,
                }
            }
            Check::Hide { counter_skill, hiding_modifier } => {
                modifier += hiding_modifier;
                counter_skill
            }
            Check::TakeOut { counter_skill } => counter_skill,
            Check::Shoot { counter_skill, cover_modifier } => {
                modifier -= cover_modifier;
                counter_skill
            }
            Check::Bypass { access_difficulty } => {
                modifier -= access_difficulty;
                0.0
            }
            Check::Capture { required_skill, difficulty } => {
                skill = required_skill;
                difficulty
            }
        };

        let skill_value = match skill {
            Some(skill) => actor.skill(skill),
            None => self.unskilled_capture_value,
        };
        let raw_probability = skill_value - difficulty + modifier;

        CheckTrace {
            action,
            skill,
            skill_value,
            difficulty,
            modifier,
            raw_probability,
            probability: unit(raw_probability),
            roll: 0.0,
            success: false,
        }
    }

    /// Resolve against an explicit uniform roll in [0, 1)
    pub fn resolve_with_roll(
        &self,
        actor: &Character,
        check: &Check,
        extra_modifier: f32,
        roll: f32,
    ) -> CheckTrace {
        let mut trace = self.prepare(actor, check, extra_modifier);
        trace.roll = roll;
        trace.success = roll < trace.probability;

        tracing::debug!(
            action = %trace.action,
            skill = ?trace.skill,
            skill_value = trace.skill_value,
            difficulty = trace.difficulty,
            modifier = trace.modifier,
            raw = trace.raw_probability,
            probability = trace.probability,
            roll = trace.roll,
            success = trace.success,
            "skill check"
        );
        trace
    }

    pub fn resolve<R: Rng + ?Sized>(
        &self,
        actor: &Character,
        check: &Check,
        extra_modifier: f32,
        rng: &mut R,
    ) -> CheckTrace {
        let roll: f32 = rng.gen();
        self.resolve_with_roll(actor, check, extra_modifier, roll)
    }
}
