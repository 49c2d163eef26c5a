//! Black Site - turn-based tactical infiltration simulation
//!
//! Field agents and guards act on a graph of connected areas. Every action is
//! a single skill roll; noise from actions alarms nearby guards, and alarmed
//! guards hunt instead of patrolling. Agents' choices come from an external
//! decision source, constrained to the actions that are legal each turn.

pub mod alarm;
pub mod core;
pub mod decision;
pub mod entity;
pub mod mission;
pub mod patrol;
pub mod skills;
pub mod world;
