pub mod config;
pub mod error;
pub mod types;

pub use config::{EngineOptions, TuningConfig};
pub use error::{Result, SimError};
pub use types::{AreaId, ConnectionId, EntityId, Exploration, Skill};
