//! The mission world: area arena, connection arena and the entity registry
//!
//! Areas and connections are index-addressed and never removed. Entities live
//! in a map keyed by id; `registry` keeps their spawn order, which is the
//! order hostiles act in.

use ahash::AHashMap;

use crate::core::error::{Result, SimError};
use crate::core::types::{AreaId, ConnectionId, EntityId, Exploration};
use crate::entity::{Character, Entity, Hostile};
use crate::world::area::Area;
use crate::world::connection::{Connection, ConnectionSpec};
use crate::world::graph::AreaGraph;

#[derive(Debug, Clone, Default)]
pub struct World {
    areas: Vec<Area>,
    connections: Vec<Connection>,
    graph: AreaGraph,
    entities: AHashMap<EntityId, Entity>,
    registry: Vec<EntityId>,
    /// Areas are addressable by entity id too, so decisions can name them
    area_lookup: AHashMap<EntityId, AreaId>,
    /// Flat id -> level index for external queries; engine logic reads the entities
    exploration: AHashMap<EntityId, Exploration>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    // === CONSTRUCTION ===

    pub fn add_area(&mut self, mut area: Area) -> AreaId {
        let id = self.graph.add_node();
        area.index = id;
        area.connections.clear();
        area.occupants.clear();
        self.area_lookup.insert(area.entity_id(), id);
        self.exploration.insert(area.entity_id(), area.explored());
        self.areas.push(area);
        id
    }

    /// Link two areas. A second connection between the same pair is refused with `Ok(None)`.
    pub fn connect(&mut self, first: AreaId, second: AreaId, spec: ConnectionSpec) -> Result<Option<ConnectionId>> {
        self.area(first)?;
        self.area(second)?;
        if first == second {
            return Err(SimError::Config(format!(
                "cannot connect area {:?} to itself",
                first
            )));
        }
        if self.connection_between(first, second).is_some() {
            tracing::debug!(?first, ?second, "duplicate connection refused");
            return Ok(None);
        }

        let id = ConnectionId(self.connections.len() as u32);
        self.connections.push(Connection::new(id, first, second, spec));
        self.areas[first.index()].connections.push(id);
        self.areas[second.index()].connections.push(id);
        self.graph.add_edge(first, second)?;
        Ok(Some(id))
    }

    pub fn connect_open(&mut self, first: AreaId, second: AreaId) -> Result<Option<ConnectionId>> {
        self.connect(first, second, ConnectionSpec::open())
    }

    pub fn connect_door(&mut self, first: AreaId, second: AreaId) -> Result<Option<ConnectionId>> {
        self.connect(first, second, ConnectionSpec::door())
    }

    pub fn connect_window(&mut self, first: AreaId, second: AreaId) -> Result<Option<ConnectionId>> {
        self.connect(first, second, ConnectionSpec::window())
    }

    /// Register an entity in its area
    pub fn spawn(&mut self, entity: Entity) -> Result<EntityId> {
        let area = entity.area().ok_or_else(|| {
            SimError::Config(format!("{} '{}' has no starting area", entity.kind_name(), entity.name()))
        })?;
        self.area(area)?;

        let id = entity.id();
        self.areas[area.index()].occupants.push(id);
        self.exploration.insert(id, entity.explored());
        self.registry.push(id);
        self.entities.insert(id, entity);
        Ok(id)
    }

    // === AREAS AND CONNECTIONS ===

    pub fn area(&self, id: AreaId) -> Result<&Area> {
        self.areas.get(id.index()).ok_or(SimError::AreaNotFound(id))
    }

    pub fn area_mut(&mut self, id: AreaId) -> Result<&mut Area> {
        self.areas.get_mut(id.index()).ok_or(SimError::AreaNotFound(id))
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn areas_mut(&mut self) -> impl Iterator<Item = &mut Area> {
        self.areas.iter_mut()
    }

    /// Resolve an area named by its entity id
    pub fn area_by_entity(&self, id: EntityId) -> Option<AreaId> {
        self.area_lookup.get(&id).copied()
    }

    pub fn connection(&self, id: ConnectionId) -> Result<&Connection> {
        self.connections
            .get(id.index())
            .ok_or_else(|| SimError::Config(format!("unknown connection {:?}", id)))
    }

    pub fn connection_between(&self, a: AreaId, b: AreaId) -> Option<&Connection> {
        let area = self.areas.get(a.index())?;
        area.connections
            .iter()
            .filter_map(|id| self.connections.get(id.index()))
            .find(|conn| conn.links(a, b))
    }

    /// Connection lookup for a pair the caller expects to be linked
    pub fn require_connection(&self, a: AreaId, b: AreaId) -> Result<&Connection> {
        self.connection_between(a, b)
            .ok_or(SimError::NotConnected { from: a, to: b })
    }

    pub fn unlock_connection(&mut self, a: AreaId, b: AreaId) -> Result<()> {
        let id = self.require_connection(a, b)?.id;
        self.connections[id.index()].unlock();
        Ok(())
    }

    /// Every connection touching `area`, in construction order
    pub fn connections_of(&self, area: AreaId) -> impl Iterator<Item = &Connection> + '_ {
        self.areas
            .get(area.index())
            .map(|a| a.connections.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |id| self.connections.get(id.index()))
    }

    pub fn neighbors(&self, area: AreaId) -> &[AreaId] {
        self.graph.neighbors(area)
    }

    pub fn is_adjacent(&self, a: AreaId, b: AreaId) -> bool {
        self.graph.is_adjacent(a, b)
    }

    pub fn graph(&self) -> &AreaGraph {
        &self.graph
    }

    pub fn shortest_path(&self, start: AreaId, goal: AreaId) -> Result<Option<Vec<AreaId>>> {
        self.graph.shortest_path(start, goal)
    }

    // === ENTITIES ===

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn get(&self, id: EntityId) -> Result<&Entity> {
        self.entities.get(&id).ok_or(SimError::EntityNotFound(id))
    }

    pub fn get_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.entities.get_mut(&id).ok_or(SimError::EntityNotFound(id))
    }

    /// Whether `id` names a live entity or an area
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id) || self.area_lookup.contains_key(&id)
    }

    /// Display name of an entity or an area
    pub fn name_of(&self, id: EntityId) -> Option<&str> {
        if let Some(entity) = self.entities.get(&id) {
            return Some(entity.name());
        }
        let area = self.area_by_entity(id)?;
        self.areas.get(area.index()).map(Area::name)
    }

    /// Entity ids in spawn order
    pub fn registry(&self) -> &[EntityId] {
        &self.registry
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.registry.iter().filter_map(|id| self.entities.get(id))
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn character(&self, id: EntityId) -> Result<&Character> {
        self.get(id)?.character().ok_or(SimError::WrongEntityKind {
            entity: id,
            expected: "character",
        })
    }

    pub fn character_mut(&mut self, id: EntityId) -> Result<&mut Character> {
        self.get_mut(id)?.character_mut().ok_or(SimError::WrongEntityKind {
            entity: id,
            expected: "character",
        })
    }

    pub fn hostile_mut(&mut self, id: EntityId) -> Result<&mut Hostile> {
        self.get_mut(id)?.as_hostile_mut().ok_or(SimError::WrongEntityKind {
            entity: id,
            expected: "hostile",
        })
    }

    /// Area an entity currently stands in
    pub fn location(&self, id: EntityId) -> Result<AreaId> {
        self.get(id)?.area().ok_or(SimError::EntityNotFound(id))
    }

    fn ids_where(&self, pred: impl Fn(&Entity) -> bool) -> Vec<EntityId> {
        self.entities()
            .filter(|entity| pred(entity))
            .map(Entity::id)
            .collect()
    }

    pub fn agents(&self) -> Vec<EntityId> {
        self.ids_where(Entity::is_agent)
    }

    pub fn living_agents(&self) -> Vec<EntityId> {
        self.ids_where(|e| e.as_agent().is_some_and(|a| a.character.is_alive()))
    }

    pub fn hostiles(&self) -> Vec<EntityId> {
        self.ids_where(Entity::is_hostile)
    }

    pub fn objectives(&self) -> Vec<EntityId> {
        self.ids_where(Entity::is_objective)
    }

    fn occupants_where(&self, area: AreaId, pred: impl Fn(&Entity) -> bool) -> Vec<EntityId> {
        self.areas
            .get(area.index())
            .map(|a| a.occupants.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| self.entities.get(id))
            .filter(|entity| pred(entity))
            .map(Entity::id)
            .collect()
    }

    pub fn occupants(&self, area: AreaId) -> Vec<EntityId> {
        self.occupants_where(area, |_| true)
    }

    pub fn agents_in(&self, area: AreaId) -> Vec<EntityId> {
        self.occupants_where(area, Entity::is_agent)
    }

    pub fn hostiles_in(&self, area: AreaId) -> Vec<EntityId> {
        self.occupants_where(area, Entity::is_hostile)
    }

    /// Agents in `area` that a guard standing there can see
    pub fn visible_agents_in(&self, area: AreaId) -> Vec<EntityId> {
        self.occupants_where(area, |e| {
            e.as_agent().is_some_and(|a| !a.character.is_hidden)
        })
    }

    /// Everything in `area` that is not an agent
    pub fn non_agents_in(&self, area: AreaId) -> Vec<EntityId> {
        self.occupants_where(area, |e| !e.is_agent())
    }

    // === LIFECYCLE ===

    /// Detach an entity from its area and the registry. Removing twice is a no-op.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        self.registry.retain(|other| *other != id);
        self.exploration.remove(&id);
        if let Some(area) = entity.area().and_then(|a| self.areas.get_mut(a.index())) {
            area.occupants.retain(|other| *other != id);
        }
        tracing::debug!(name = entity.name(), "entity removed");
        Some(entity)
    }

    /// Relocate an entity to an adjacent area, keeping area membership consistent.
    ///
    /// Returns `Ok(false)` when it already stands there. When a visible agent is
    /// the last one to leave a room with guards in it, the room remembers where
    /// it went.
    pub fn change_area(&mut self, id: EntityId, to: AreaId) -> Result<bool> {
        let entity = self.get(id)?;
        let from = entity.area().ok_or(SimError::EntityNotFound(id))?;
        if from == to {
            return Ok(false);
        }
        if !self.is_adjacent(from, to) {
            return Err(SimError::NotConnected { from, to });
        }
        let visible_agent = entity
            .as_agent()
            .is_some_and(|agent| !agent.character.is_hidden);

        tracing::debug!(name = entity.name(), ?from, ?to, "moving entity");

        self.areas[from.index()].occupants.retain(|other| *other != id);
        self.areas[to.index()].occupants.push(id);
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.base.area = Some(to);
        }

        if visible_agent
            && !self.hostiles_in(from).is_empty()
            && self.visible_agents_in(from).is_empty()
        {
            self.areas[from.index()].chase_pointer = Some(to);
        }
        Ok(true)
    }

    // === EXPLORATION ===

    pub fn explored_level(&self, id: EntityId) -> Option<Exploration> {
        if let Some(entity) = self.entities.get(&id) {
            return Some(entity.explored());
        }
        let area = self.area_by_entity(id)?;
        self.areas.get(area.index()).map(Area::explored)
    }

    /// Set an entity's or area's exploration level. Returns false when nothing changed.
    pub fn set_explored(&mut self, id: EntityId, level: Exploration) -> bool {
        let slot = if let Some(entity) = self.entities.get_mut(&id) {
            &mut entity.base.explored
        } else if let Some(area) = self.area_lookup.get(&id).copied() {
            match self.areas.get_mut(area.index()) {
                Some(area) => &mut area.base.explored,
                None => return false,
            }
        } else {
            return false;
        };

        if *slot == level {
            return false;
        }
        *slot = level;
        self.exploration.insert(id, level);
        true
    }

    /// Raise exploration to at least `level`; never lowers it
    pub fn reveal(&mut self, id: EntityId, level: Exploration) -> bool {
        match self.explored_level(id) {
            Some(current) if current < level => self.set_explored(id, level),
            _ => false,
        }
    }

    pub fn reveal_area(&mut self, area: AreaId, level: Exploration) -> bool {
        match self.areas.get(area.index()).map(Area::entity_id) {
            Some(id) => self.reveal(id, level),
            None => false,
        }
    }

    /// Ids with any exploration at all, areas first
    pub fn explored_entities(&self) -> Vec<EntityId> {
        self.entities_above_exploration(Exploration::Unknown)
    }

    /// Ids whose exploration level is strictly above `level`, areas first
    pub fn entities_above_exploration(&self, level: Exploration) -> Vec<EntityId> {
        self.areas
            .iter()
            .map(Area::entity_id)
            .chain(self.registry.iter().copied())
            .filter(|id| self.exploration.get(id).is_some_and(|found| *found > level))
            .collect()
    }

    // === TURN BOOKKEEPING ===

    /// Noise back to baseline and chase pointers cleared, for every area
    pub fn reset_area_transients(&mut self) {
        for area in &mut self.areas {
            area.reset_transients();
        }
    }

    pub fn clear_peeked(&mut self) {
        for entity in self.entities.values_mut() {
            entity.base.is_peeked = false;
        }
    }
}
