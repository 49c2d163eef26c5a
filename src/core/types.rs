//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of an area in the world's area arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AreaId(pub u32);

impl AreaId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a connection in the world's connection arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub u32);

impl ConnectionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How much the field team knows about an entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Exploration {
    /// Nothing known
    #[default]
    Unknown = 0,
    /// Seen in passing
    Glimpsed = 1,
    /// Fully known
    Known = 2,
}

impl Exploration {
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Out-of-range levels saturate at `Known`
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Exploration::Unknown,
            1 => Exploration::Glimpsed,
            _ => Exploration::Known,
        }
    }

    pub fn is_explored(self) -> bool {
        self > Exploration::Unknown
    }
}

/// Fixed skill vocabulary shared by every character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Stealth,
    Firearms,
    Cover,
    HandToHand,
    Hacking,
    Observation,
    Acrobatics,
}

impl Skill {
    pub const ALL: [Skill; 7] = [
        Skill::Stealth,
        Skill::Firearms,
        Skill::Cover,
        Skill::HandToHand,
        Skill::Hacking,
        Skill::Observation,
        Skill::Acrobatics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Skill::Stealth => "stealth",
            Skill::Firearms => "firearms",
            Skill::Cover => "cover",
            Skill::HandToHand => "hand_to_hand",
            Skill::Hacking => "hacking",
            Skill::Observation => "observation",
            Skill::Acrobatics => "acrobatics",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Skill {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Skill::ALL
            .into_iter()
            .find(|skill| skill.as_str() == s)
            .ok_or_else(|| format!("Unknown skill: {}", s))
    }
}

/// Skill values, each held in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills([f32; 7]);

impl Skills {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, skill: Skill, value: f32) -> Self {
        self.set(skill, value);
        self
    }

    pub fn get(&self, skill: Skill) -> f32 {
        self.0[skill.slot()]
    }

    pub fn set(&mut self, skill: Skill, value: f32) {
        self.0[skill.slot()] = unit(value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Skill, f32)> + '_ {
        Skill::ALL.into_iter().map(move |skill| (skill, self.get(skill)))
    }
}

/// Clamp to [0, 1]; NaN maps to 0
pub fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Clamp to [-1, 1] for signed area modifiers
pub fn signed_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}
