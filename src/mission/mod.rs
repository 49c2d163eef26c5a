//! The running mission: turn orchestration, action handlers and the log

pub mod actions;
pub mod combat;
pub mod controller;
pub mod log;
pub mod status;

pub use combat::{shot_damage, ShotOutcome};
pub use controller::GameController;
pub use log::{MissionLog, MISSION_CONTROL};
pub use status::{MissionStatus, ObjectiveProgress, TurnOutcome};
