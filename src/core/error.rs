use thiserror::Error;

use crate::core::types::{AreaId, EntityId};

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Entity not found: {0:?}")]
    EntityNotFound(EntityId),

    #[error("Area not found: {0:?}")]
    AreaNotFound(AreaId),

    #[error("Entity {entity:?} is not a {expected}")]
    WrongEntityKind {
        entity: EntityId,
        expected: &'static str,
    },

    #[error("Areas {from:?} and {to:?} are not connected")]
    NotConnected { from: AreaId, to: AreaId },

    #[error("{actor} and {target} must share an area")]
    NotColocated { actor: String, target: String },

    #[error("Invalid decision: {0}")]
    InvalidDecision(String),

    #[error("Decision source error: {0}")]
    DecisionSource(String),

    #[error("No valid decision for {pending} agent(s) after {attempts} attempts")]
    RetriesExhausted { attempts: u32, pending: usize },

    #[error("No alarm entry for action '{action}' at skill value {skill}")]
    UnknownSkillTier { action: String, skill: f32 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
