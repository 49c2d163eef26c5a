//! Areas: rooms, corridors and yards that hold entities

use crate::core::types::{signed_unit, AreaId, ConnectionId, EntityId, Exploration};
use crate::entity::EntityBase;

/// Floor-plan rectangle; only the renderer reads it
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

#[derive(Debug, Clone)]
pub struct Area {
    pub base: EntityBase,
    pub(crate) index: AreaId,
    pub geometry: Rect,
    pub color: String,
    hiding_modifier: f32,
    cover_modifier: f32,
    noise_baseline: f32,
    noise_level: f32,
    pub(crate) connections: Vec<ConnectionId>,
    pub(crate) occupants: Vec<EntityId>,
    pub is_extraction_point: bool,
    /// Where the last visible agent went after leaving a guarded room this turn
    pub(crate) chase_pointer: Option<AreaId>,
}

impl Area {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            base: EntityBase::new(name, description),
            index: AreaId(0),
            geometry: Rect::default(),
            color: String::from("gray"),
            hiding_modifier: 0.0,
            cover_modifier: 0.0,
            noise_baseline: 0.0,
            noise_level: 0.0,
            connections: Vec::new(),
            occupants: Vec::new(),
            is_extraction_point: false,
            chase_pointer: None,
        }
    }

    pub fn with_geometry(mut self, geometry: Rect) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_modifiers(mut self, hiding: f32, cover: f32) -> Self {
        self.hiding_modifier = signed_unit(hiding);
        self.cover_modifier = signed_unit(cover);
        self
    }

    pub fn with_noise_baseline(mut self, baseline: f32) -> Self {
        self.noise_baseline = baseline.max(0.0);
        self.noise_level = self.noise_baseline;
        self
    }

    pub fn with_explored(mut self, level: Exploration) -> Self {
        self.base.explored = level;
        self
    }

    pub fn extraction_point(mut self) -> Self {
        self.is_extraction_point = true;
        self
    }

    pub fn id(&self) -> AreaId {
        self.index
    }

    pub fn entity_id(&self) -> EntityId {
        self.base.id
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    pub fn explored(&self) -> Exploration {
        self.base.explored
    }

    pub fn hiding_modifier(&self) -> f32 {
        self.hiding_modifier
    }

    pub fn cover_modifier(&self) -> f32 {
        self.cover_modifier
    }

    pub fn noise_baseline(&self) -> f32 {
        self.noise_baseline
    }

    pub fn noise_level(&self) -> f32 {
        self.noise_level
    }

    pub fn add_noise(&mut self, amount: f32) {
        self.noise_level += amount;
    }

    pub fn chase_pointer(&self) -> Option<AreaId> {
        self.chase_pointer
    }

    pub fn connections(&self) -> &[ConnectionId] {
        &self.connections
    }

    pub fn occupants(&self) -> &[EntityId] {
        &self.occupants
    }

    /// Drop this turn's noise and chase hint
    pub fn reset_transients(&mut self) {
        self.noise_level = self.noise_baseline;
        self.chase_pointer = None;
    }
}
