//! Passages between two areas
//!
//! A connection is undirected for traversal but every observation/traversal
//! attribute is stored once per side. Callers always ask "viewed from which
//! area" and get back that side's attributes.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::{unit, AreaId, ConnectionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    Open,
    Door,
    Window,
}

/// Attributes of a connection as seen from one of its two areas
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionSide {
    pub description: String,
    pub spot_difficulty: f32,
    pub investigate_difficulty: f32,
    pub access_difficulty: f32,
    pub locked: bool,
}

/// Everything needed to create a connection; per-kind defaults come from the constructors
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSpec {
    pub kind: ConnectionKind,
    /// Side seen from the first area passed to `World::connect`
    pub first: ConnectionSide,
    /// Side seen from the second area
    pub second: ConnectionSide,
    pub sight_only: bool,
    pub noise_factor: f32,
}

impl ConnectionSpec {
    fn with_kind(kind: ConnectionKind, noise_factor: f32) -> Self {
        Self {
            kind,
            first: ConnectionSide::default(),
            second: ConnectionSide::default(),
            sight_only: false,
            noise_factor,
        }
    }

    /// Archways and open-plan boundaries carry noise well
    pub fn open() -> Self {
        Self::with_kind(ConnectionKind::Open, 0.75)
    }

    pub fn door() -> Self {
        Self::with_kind(ConnectionKind::Door, 0.5)
    }

    /// Windows take a little climbing from either side
    pub fn window() -> Self {
        let mut spec = Self::with_kind(ConnectionKind::Window, 0.5);
        spec.first.access_difficulty = 0.1;
        spec.second.access_difficulty = 0.1;
        spec
    }

    pub fn with_descriptions(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.first.description = first.into();
        self.second.description = second.into();
        self
    }

    pub fn with_spot_difficulty(mut self, first: f32, second: f32) -> Self {
        self.first.spot_difficulty = first;
        self.second.spot_difficulty = second;
        self
    }

    pub fn with_investigate_difficulty(mut self, first: f32, second: f32) -> Self {
        self.first.investigate_difficulty = first;
        self.second.investigate_difficulty = second;
        self
    }

    pub fn with_access_difficulty(mut self, first: f32, second: f32) -> Self {
        self.first.access_difficulty = first;
        self.second.access_difficulty = second;
        self
    }

    pub fn locked(mut self, from_first: bool, from_second: bool) -> Self {
        self.first.locked = from_first;
        self.second.locked = from_second;
        self
    }

    pub fn sight_only(mut self) -> Self {
        self.sight_only = true;
        self
    }

    pub fn with_noise_factor(mut self, noise_factor: f32) -> Self {
        self.noise_factor = noise_factor;
        self
    }
}

fn clamp_side(mut side: ConnectionSide) -> ConnectionSide {
    side.spot_difficulty = unit(side.spot_difficulty);
    side.investigate_difficulty = unit(side.investigate_difficulty);
    side.access_difficulty = unit(side.access_difficulty);
    side
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    endpoints: [AreaId; 2],
    sides: [ConnectionSide; 2],
    pub kind: ConnectionKind,
    pub sight_only: bool,
    noise_factor: f32,
}

impl Connection {
    pub(crate) fn new(id: ConnectionId, first: AreaId, second: AreaId, spec: ConnectionSpec) -> Self {
        Self {
            id,
            endpoints: [first, second],
            sides: [clamp_side(spec.first), clamp_side(spec.second)],
            kind: spec.kind,
            sight_only: spec.sight_only,
            noise_factor: unit(spec.noise_factor),
        }
    }

    pub fn endpoints(&self) -> [AreaId; 2] {
        self.endpoints
    }

    pub fn noise_factor(&self) -> f32 {
        self.noise_factor
    }

    pub fn involves(&self, area: AreaId) -> bool {
        self.endpoints.contains(&area)
    }

    pub fn links(&self, a: AreaId, b: AreaId) -> bool {
        self.endpoints == [a, b] || self.endpoints == [b, a]
    }

    pub fn other(&self, area: AreaId) -> Option<AreaId> {
        self.side_index(area).map(|i| self.endpoints[1 - i])
    }

    fn side_index(&self, area: AreaId) -> Option<usize> {
        self.endpoints.iter().position(|&endpoint| endpoint == area)
    }

    /// This connection's attributes from `area`'s side
    pub fn viewed_from(&self, area: AreaId) -> Result<ConnectionView<'_>> {
        let side = self.side_index(area).ok_or(SimError::NotConnected {
            from: area,
            to: self.endpoints[0],
        })?;
        Ok(ConnectionView {
            connection: self,
            side,
        })
    }

    /// Traversing a connection opens it for good, in both directions
    pub fn unlock(&mut self) {
        for side in &mut self.sides {
            side.locked = false;
        }
    }
}

/// A connection resolved against the observer's area
#[derive(Debug, Clone, Copy)]
pub struct ConnectionView<'a> {
    connection: &'a Connection,
    side: usize,
}

impl<'a> ConnectionView<'a> {
    fn attrs(&self) -> &'a ConnectionSide {
        &self.connection.sides[self.side]
    }

    pub fn connection(&self) -> &'a Connection {
        self.connection
    }

    pub fn observer_area(&self) -> AreaId {
        self.connection.endpoints[self.side]
    }

    pub fn other_area(&self) -> AreaId {
        self.connection.endpoints[1 - self.side]
    }

    pub fn description(&self) -> &'a str {
        &self.attrs().description
    }

    pub fn spot_difficulty(&self) -> f32 {
        self.attrs().spot_difficulty
    }

    /// Peeking through a passage is as hard as spotting it
    pub fn peek_difficulty(&self) -> f32 {
        self.attrs().spot_difficulty
    }

    pub fn investigate_difficulty(&self) -> f32 {
        self.attrs().investigate_difficulty
    }

    pub fn access_difficulty(&self) -> f32 {
        self.attrs().access_difficulty
    }

    pub fn is_locked(&self) -> bool {
        self.attrs().locked
    }
}
