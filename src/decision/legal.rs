//! What an agent may do this turn, and with which targets
//!
//! Recomputed from scratch every turn: the options depend on the agent's
//! area, what it has explored, and whether it is hidden.

use std::fmt::Write as _;

use serde::Serialize;

use crate::core::error::{Result, SimError};
use crate::core::types::EntityId;
use crate::decision::parse::Decision;
use crate::entity::Entity;
use crate::skills::ActionKind;
use crate::world::World;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentOption {
    pub id: EntityId,
    pub name: String,
}

/// Ordered action -> valid-argument mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegalActions {
    entries: Vec<(ActionKind, Vec<ArgumentOption>)>,
}

impl LegalActions {
    pub fn for_agent(world: &World, agent: EntityId, extended: bool) -> Result<Self> {
        let hidden = world.character(agent)?.is_hidden;
        let here = world.location(agent)?;
        let area = world.area(here)?;

        let mut legal = Self::default();
        legal.insert(ActionKind::Wait, Vec::new());

        let mut reachable = Vec::new();
        for &neighbor in world.neighbors(here) {
            let other = world.area(neighbor)?;
            if other.explored().is_explored() {
                reachable.push(ArgumentOption {
                    id: other.entity_id(),
                    name: other.name().to_string(),
                });
            }
        }
        if !reachable.is_empty() {
            legal.insert(ActionKind::Sneak, reachable.clone());
            legal.insert(ActionKind::Charge, reachable.clone());
            if extended {
                legal.insert(ActionKind::Move, reachable.clone());
                legal.insert(ActionKind::Peek, reachable);
            }
        }

        let options_where = |pred: fn(&Entity) -> bool| -> Vec<ArgumentOption> {
            world
                .occupants(here)
                .into_iter()
                .filter_map(|id| world.entity(id))
                .filter(|entity| pred(entity))
                .map(|entity| ArgumentOption {
                    id: entity.id(),
                    name: entity.name().to_string(),
                })
                .collect()
        };

        let hostiles = options_where(Entity::is_hostile);
        if !hostiles.is_empty() {
            legal.insert(ActionKind::Shoot, hostiles.clone());
            if hidden {
                legal.insert(ActionKind::TakeOut, hostiles.clone());
            }
        }

        if !hidden && hostiles.is_empty() {
            legal.insert(ActionKind::Hide, Vec::new());
        }

        let obstacles = options_where(|e| e.as_obstacle().is_some());
        if !obstacles.is_empty() {
            legal.insert(ActionKind::Bypass, obstacles);
        }

        let objectives = options_where(|e| e.as_objective().is_some_and(|o| !o.is_captured()));
        if !objectives.is_empty() {
            legal.insert(ActionKind::Capture, objectives);
        }

        if area.is_extraction_point {
            legal.insert(ActionKind::Exfiltrate, Vec::new());
        }

        if extended {
            legal.insert(ActionKind::Investigate, Vec::new());
        }

        Ok(legal)
    }

    pub fn insert(&mut self, action: ActionKind, options: Vec<ArgumentOption>) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == action) {
            Some((_, existing)) => *existing = options,
            None => self.entries.push((action, options)),
        }
    }

    pub fn contains(&self, action: ActionKind) -> bool {
        self.entries.iter().any(|(existing, _)| *existing == action)
    }

    pub fn options(&self, action: ActionKind) -> Option<&[ArgumentOption]> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == action)
            .map(|(_, options)| options.as_slice())
    }

    pub fn actions(&self) -> impl Iterator<Item = ActionKind> + '_ {
        self.entries.iter().map(|(action, _)| *action)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionKind, &[ArgumentOption])> + '_ {
        self.entries
            .iter()
            .map(|(action, options)| (*action, options.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reject decisions outside this turn's options
    pub fn validate(&self, decision: &Decision) -> Result<()> {
        let options = self.options(decision.action).ok_or_else(|| {
            let valid: Vec<&str> = self.actions().map(ActionKind::as_str).collect();
            SimError::InvalidDecision(format!(
                "'{}' is not available; valid actions: {}",
                decision.action,
                valid.join(", ")
            ))
        })?;

        let arity = decision.action.arity();
        if decision.arguments.len() != arity {
            return Err(SimError::InvalidDecision(format!(
                "'{}' takes {} argument(s), got {}",
                decision.action,
                arity,
                decision.arguments.len()
            )));
        }

        if let Some(bad) = decision
            .arguments
            .iter()
            .find(|arg| !options.iter().any(|option| option.id == **arg))
        {
            return Err(SimError::InvalidDecision(format!(
                "{} is not a valid target for '{}'",
                bad, decision.action
            )));
        }
        Ok(())
    }

    /// Parse operator input of the form `action [index ...]`.
    ///
    /// Indices count from 0 within the action's options. With no index, a
    /// single option is picked automatically.
    pub fn resolve_manual(&self, input: &str) -> Result<Decision> {
        let mut tokens = input.split_whitespace();
        let action: ActionKind = tokens
            .next()
            .ok_or_else(|| SimError::InvalidDecision("empty input".into()))?
            .parse()
            .map_err(SimError::InvalidDecision)?;
        let options = self.options(action).ok_or_else(|| {
            SimError::InvalidDecision(format!("'{}' is not available this turn", action))
        })?;

        let mut arguments = Vec::new();
        for token in tokens {
            let index: usize = token
                .parse()
                .map_err(|_| SimError::InvalidDecision(format!("'{}' is not an index", token)))?;
            let option = options.get(index).ok_or_else(|| {
                SimError::InvalidDecision(format!(
                    "index {} out of range for '{}' (0..{})",
                    index,
                    action,
                    options.len()
                ))
            })?;
            arguments.push(option.id);
        }

        if arguments.is_empty() && action.arity() > 0 {
            match options {
                [only] => arguments.push(only.id),
                _ => {
                    return Err(SimError::InvalidDecision(format!(
                        "'{}' needs an argument index (0..{})",
                        action,
                        options.len()
                    )))
                }
            }
        }

        let decision = Decision::new(action, arguments);
        self.validate(&decision)?;
        Ok(decision)
    }

    /// Option list for an oracle, naming the exact ids to use
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (action, options) in self.iter() {
            if options.is_empty() {
                let _ = writeln!(out, "- {}: takes no argument", action);
            } else {
                let ids: Vec<String> = options
                    .iter()
                    .map(|option| format!("ID {} ({})", option.id, option.name))
                    .collect();
                let _ = writeln!(out, "- {}: one of exactly these IDs - {}", action, ids.join(", "));
            }
        }
        out
    }

    /// Option list for a human operator, using small indices instead of ids
    pub fn describe_manual(&self) -> String {
        let mut out = String::new();
        for (action, options) in self.iter() {
            if options.is_empty() {
                let _ = writeln!(out, "- {}", action);
            } else {
                let indexed: Vec<String> = options
                    .iter()
                    .enumerate()
                    .map(|(i, option)| format!("{} ({})", i, option.name))
                    .collect();
                let _ = writeln!(out, "- {}: {}", action, indexed.join(", "));
            }
        }
        out
    }
}
