//! Situational text handed to the decision source
//!
//! Three layers: the agent's own status, the team's shared briefing (what has
//! been explored plus the recent mission log), and the option list with the
//! exact ids the source has to answer with.

use std::fmt::Write as _;

use crate::core::error::{Result, SimError};
use crate::core::types::{EntityId, Exploration, Skill};
use crate::decision::legal::LegalActions;
use crate::entity::{Entity, EntityKind};
use crate::world::World;

const RULE: &str = "-----------------";

/// Everything the team has found out so far, plus the recent log.
///
/// Entities are listed once glimpsed; their location only once both they and
/// their area are fully known.
pub fn knowledge_base(world: &World, log_lines: &[String], directive: Option<&str>) -> Result<String> {
    let mut out = String::new();

    let explored_areas: Vec<_> = world
        .areas()
        .iter()
        .filter(|area| area.explored().is_explored())
        .collect();
    if !explored_areas.is_empty() {
        out.push_str("Areas:\n");
        for area in explored_areas {
            let _ = write!(
                out,
                "  - ID: {}\n    Name: {}\n    Description: {}\n",
                area.entity_id(),
                area.name(),
                area.base.description
            );
            let mut known_links = Vec::new();
            for &other in world.neighbors(area.id()) {
                let other = world.area(other)?;
                if other.explored().is_explored() {
                    known_links.push(other.name());
                }
            }
            if !known_links.is_empty() {
                let _ = writeln!(out, "    Connections: {}", known_links.join(", "));
            }
        }
    }

    let sections: [(&str, fn(&Entity) -> bool); 4] = [
        ("Agents", |e| matches!(e.kind, EntityKind::Agent(_))),
        ("Hostiles", |e| matches!(e.kind, EntityKind::Hostile(_))),
        ("Objectives", |e| matches!(e.kind, EntityKind::Objective(_))),
        ("Obstacles", |e| matches!(e.kind, EntityKind::Obstacle(_))),
    ];
    for (title, belongs) in sections {
        let entries: Vec<&Entity> = world
            .entities()
            .filter(|entity| belongs(entity) && entity.explored().is_explored())
            .collect();
        if entries.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{}:", title);
        for entity in entries {
            let _ = write!(
                out,
                "  - ID: {}\n    Name: {}\n    Description: {}\n",
                entity.id(),
                entity.name(),
                entity.base.description
            );
            if let Some(area) = known_location(world, entity)? {
                let _ = writeln!(out, "    Location: {} (ID: {})", area.0, area.1);
            }
        }
    }

    let _ = write!(out, "\n{}\n\nMission Log:\n", RULE);
    for line in log_lines {
        let _ = writeln!(out, "{}", line);
    }
    let _ = write!(out, "\n{}", RULE);

    if let Some(directive) = directive {
        let _ = write!(
            out,
            "\nGive this instruction priority when deciding:\n\n Control: {}\n\n{}",
            directive, RULE
        );
    }
    Ok(out)
}

fn known_location<'w>(world: &'w World, entity: &Entity) -> Result<Option<(&'w str, EntityId)>> {
    if entity.explored() < Exploration::Known {
        return Ok(None);
    }
    let Some(area) = entity.area() else {
        return Ok(None);
    };
    let area = world.area(area)?;
    if !area.explored().is_explored() {
        return Ok(None);
    }
    Ok(Some((area.name(), area.entity_id())))
}

/// First-person status for one agent: who it is, how it is doing, where it stands
pub fn status_description(world: &World, agent: EntityId) -> Result<String> {
    let entity = world.get(agent)?;
    let profile = entity.as_agent().ok_or(SimError::WrongEntityKind {
        entity: agent,
        expected: "agent",
    })?;
    let here = world.area(world.location(agent)?)?;

    let contents: Vec<String> = world
        .occupants(here.id())
        .into_iter()
        .filter_map(|id| world.entity(id))
        .map(|e| format!("{}: {}", e.name(), e.base.description))
        .collect();

    let mut links = Vec::new();
    for &other in world.neighbors(here.id()) {
        let other = world.area(other)?;
        links.push(format!("{} (ID: {})", other.name(), other.entity_id()));
    }

    let mut out = String::from("Mission intel:\n\n");
    out.push_str(&profile.knowledge_base);
    let _ = write!(
        out,
        "\n\nYou are {}, a field agent.\n{}\n\
         Capture every objective in the facility, stay out of sight of the hostiles \
         or neutralize them when you must, then reach an extraction point and exfiltrate.\n\
         How much you notice depends on your health and observation. \
         Health {:.2}/1, observation {:.2}/1.\n\n\
         You are in {}: {}.\n\
         Here you find: {}.\n\
         Passages lead to: {}\n",
        entity.name(),
        profile.behavior,
        profile.character.health_ratio(),
        profile.character.skill(Skill::Observation),
        here.name(),
        here.base.description,
        contents.join("\n"),
        links.join(", ")
    );
    Ok(out)
}

/// Full decision prompt: status, options and the answer format
pub fn decision_prompt(status: &str, legal: &LegalActions) -> String {
    format!(
        "{status}\n\n================\n\
         Actions available to you, with the exact arguments each accepts:\n\
         {options}\n\
         Choose your next move from the status, Mission Control's orders and the options above.\n\
         Follow the latest Mission Control order as closely as the options allow.\n\
         Only the listed actions are physically possible; anything else will be rejected.\n\
         Answer with a single JSON object and nothing else, with three fields:\n\
         - \"action\": the action name\n\
         - \"arguments\": a list holding the one chosen ID, or an empty list when the action takes none\n\
         - \"reasoning\": one or two sentences on why\n\
         Arguments must be copied from the IDs listed above; no other ID will work.",
        status = status,
        options = legal.describe(),
    )
}
