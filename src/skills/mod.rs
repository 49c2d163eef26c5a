//! Action vocabulary, tuning tables and skill-check resolution
//!
//! A check is one roll: primary skill minus difficulty plus modifiers,
//! clamped to a probability. The alarm an action raises is looked up
//! separately from the actor's skill tier.

pub mod action;
pub mod check;
pub mod tables;

pub use action::ActionKind;
pub use check::{Check, CheckTrace, ObserveMode, ObserveTarget, SkillCheckEngine};
pub use tables::{
    ActionSkill, ActionSkillTable, AlarmRule, AlarmSkillStep, AlarmSkillSteps, AlarmTable, SkillTier,
};
