//! Hostile patrol routes and pursuit

pub mod controller;
pub mod route;

pub use controller::{PatrolController, PatrolDecision, PursuitMode};
pub use route::PatrolRoute;
