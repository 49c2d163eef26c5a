//! Turn orchestration
//!
//! One call to [`GameController::process_turn`] runs a full turn:
//!
//! 1. Brief every living agent and apply the always-hidden override
//! 2. Clear the hostiles' per-turn flags
//! 3. Collect one legal decision per agent (bounded retries)
//! 4. Apply decisions in agent order, charging each action's alarm
//! 5. Hostiles fire on visible agents or move, then relax and refresh skills
//! 6. Reset per-turn area state
//!
//! The controller owns the world and the only RNG, so a seeded controller
//! replays identically given the same decisions.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::alarm::{self, action_alarm, apply_alarm_event};
use crate::core::config::{EngineOptions, TuningConfig};
use crate::core::error::{Result, SimError};
use crate::core::types::{AreaId, EntityId, Exploration};
use crate::decision::{
    collect_decisions, decision_prompt, knowledge_base, status_description, Decision, DecisionRequest,
    DecisionSource, LegalActions, RetryPolicy,
};
use crate::entity::Entity;
use crate::mission::log::MissionLog;
use crate::mission::status::{MissionStatus, ObjectiveProgress, TurnOutcome};
use crate::patrol::PatrolController;
use crate::skills::{ActionKind, Check, CheckTrace, ObserveMode, SkillCheckEngine};
use crate::world::{ConnectionKind, World};

pub struct GameController {
    pub(super) world: World,
    pub(super) tuning: TuningConfig,
    pub(super) options: EngineOptions,
    pub(super) engine: SkillCheckEngine,
    pub(super) patrol: PatrolController,
    pub(super) retry: RetryPolicy,
    pub(super) rng: ChaCha8Rng,
    pub(super) log: MissionLog,
    pub(super) turn: u32,
}

impl GameController {
    /// Take ownership of a built world and run the opening reconnaissance
    pub fn new(world: World, tuning: TuningConfig, options: EngineOptions) -> Result<Self> {
        tuning.validate()?;
        let rng = match options.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut controller = Self {
            engine: SkillCheckEngine::new(&tuning),
            patrol: PatrolController::new(&tuning),
            retry: RetryPolicy::new(&tuning),
            world,
            tuning,
            options,
            rng,
            log: MissionLog::new(),
            turn: 0,
        };
        controller.reconnaissance()?;
        Ok(controller)
    }

    /// Agents size up their starting area before the first turn
    fn reconnaissance(&mut self) -> Result<()> {
        for agent in self.world.agents() {
            let here = self.world.location(agent)?;
            self.observe_connections(agent, here, ObserveMode::LookAround)?;
            for id in self.world.occupants(here) {
                self.reveal_found(id)?;
            }
        }

        for agent in self.world.living_agents() {
            let here = self.world.location(agent)?;
            for neighbor in self.world.neighbors(here).to_vec() {
                self.world.reveal_area(neighbor, Exploration::Glimpsed);
            }
        }
        tracing::info!(
            areas = self.world.areas().len(),
            entities = self.world.entity_count(),
            "mission ready"
        );
        Ok(())
    }

    // === ACCESSORS ===

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access for scenario setup; not for use mid-turn
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn tuning(&self) -> &TuningConfig {
        &self.tuning
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn log(&self) -> &MissionLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut MissionLog {
        &mut self.log
    }

    /// Turns completed so far
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn status(&self) -> MissionStatus {
        if self.world.living_agents().is_empty() {
            MissionStatus::Ended
        } else {
            MissionStatus::Ongoing
        }
    }

    pub fn objective_progress(&self) -> ObjectiveProgress {
        let objectives: Vec<_> = self
            .world
            .entities()
            .filter_map(Entity::as_objective)
            .collect();
        ObjectiveProgress {
            captured: objectives.iter().filter(|o| o.is_captured()).count(),
            total: objectives.len(),
        }
    }

    /// Forward an operator instruction to the next briefings
    pub fn inject_directive(&mut self, directive: impl Into<String>) {
        self.log.inject_directive(directive);
    }

    pub fn legal_actions(&self, agent: EntityId) -> Result<LegalActions> {
        LegalActions::for_agent(&self.world, agent, self.options.extended_actions)
    }

    /// Whether the renderer should draw this hostile
    pub fn hostile_visible(&self, hostile: EntityId) -> Result<bool> {
        let entity = self.world.get(hostile)?;
        if !entity.is_hostile() {
            return Err(SimError::WrongEntityKind {
                entity: hostile,
                expected: "hostile",
            });
        }
        if self.options.hostiles_always_visible || entity.base.is_peeked {
            return Ok(true);
        }
        let here = self.world.location(hostile)?;
        Ok(!self.world.agents_in(here).is_empty())
    }

    // === TURN ===

    pub fn process_turn(&mut self, source: &mut dyn DecisionSource) -> Result<TurnOutcome> {
        let agents = self.world.living_agents();

        let briefing = knowledge_base(
            &self.world,
            self.log.recent(self.tuning.briefing_log_lines),
            self.log.last_directive(),
        )?;
        for &agent in &agents {
            if let Some(profile) = self.world.get_mut(agent)?.as_agent_mut() {
                profile.knowledge_base = briefing.clone();
                if self.options.agents_always_hidden {
                    profile.character.is_hidden = true;
                }
            }
        }

        for hostile in self.world.hostiles() {
            self.world.hostile_mut(hostile)?.clear_turn_flags();
        }
        self.world.clear_peeked();

        if agents.is_empty() {
            tracing::info!(turn = self.turn, "no agents left in the field");
            return Ok(TurnOutcome::MissionOver);
        }

        let turn = self.turn;
        tracing::info!(turn, agents = agents.len(), "turn started");

        let requests = agents
            .iter()
            .map(|&agent| self.decision_request(agent))
            .collect::<Result<Vec<_>>>()?;
        let decisions = collect_decisions(source, &requests, &self.retry)?;

        for (&agent, decision) in agents.iter().zip(&decisions) {
            self.apply_decision(agent, decision)?;
        }

        self.hostile_phase()?;

        alarm::reset_area_transients(&mut self.world);
        self.turn += 1;
        tracing::info!(turn, "turn finished");

        Ok(TurnOutcome::Played {
            turn,
            agents: agents.len(),
        })
    }

    fn decision_request(&self, agent: EntityId) -> Result<DecisionRequest> {
        let legal = self.legal_actions(agent)?;
        let status = status_description(&self.world, agent)?;
        Ok(DecisionRequest {
            agent,
            agent_name: self.world.get(agent)?.name().to_string(),
            prompt: decision_prompt(&status, &legal),
            legal,
        })
    }

    /// Run one validated decision and charge its alarm.
    ///
    /// A decision naming something removed earlier this turn is skipped entirely.
    pub fn apply_decision(&mut self, agent: EntityId, decision: &Decision) -> Result<()> {
        if !self.world.contains(agent) {
            return Ok(());
        }
        if let Some(stale) = decision.arguments.iter().find(|id| !self.world.contains(**id)) {
            tracing::debug!(agent = %agent, target = %stale, action = %decision.action, "stale target, skipping");
            return Ok(());
        }

        let origin = self.world.location(agent)?;
        let magnitude = self.alarm_for(agent, origin, decision)?;

        self.perform(agent, decision)?;

        apply_alarm_event(&mut self.world, origin, magnitude)?;
        let now = self.world.entity(agent).and_then(Entity::area);
        if let Some(now) = now.filter(|now| *now != origin) {
            apply_alarm_event(&mut self.world, now, magnitude)?;
        }
        Ok(())
    }

    fn alarm_for(&self, agent: EntityId, origin: AreaId, decision: &Decision) -> Result<f32> {
        let skill = self.engine.primary_skill(decision.action).ok_or_else(|| {
            SimError::Config(format!("no primary skill for '{}'", decision.action))
        })?;
        let skill_value = self.world.character(agent)?.skill(skill);

        let through: Option<ConnectionKind> = match decision.action {
            ActionKind::Peek => decision
                .arguments
                .first()
                .and_then(|id| self.world.area_by_entity(*id))
                .and_then(|target| self.world.connection_between(origin, target))
                .map(|conn| conn.kind),
            _ => None,
        };
        action_alarm(&self.tuning, decision.action, skill_value, through)
    }

    fn hostile_phase(&mut self) -> Result<()> {
        for hostile in self.world.hostiles() {
            let here = self.world.location(hostile)?;
            let targets = self.world.visible_agents_in(here);

            if let Some(&target) = targets.choose(&mut self.rng) {
                self.shoot(hostile, target)?;
                apply_alarm_event(&mut self.world, here, self.tuning.hostile_fire_alarm)?;
            } else {
                self.patrol.step(&mut self.world, hostile, &mut self.rng)?;
                alarm::relax(self.world.hostile_mut(hostile)?, self.tuning.relax_decay);
            }

            let guard = self.world.hostile_mut(hostile)?;
            guard.refresh_skills(&self.tuning.alarm_skill_steps);
            tracing::debug!(
                alarm = guard.alarm_level(),
                patrolling = guard.is_patrolling,
                "hostile turn done"
            );
        }
        Ok(())
    }

    // === SHARED HELPERS FOR HANDLERS ===

    pub(super) fn roll_check(&mut self, actor: EntityId, check: Check, extra_modifier: f32) -> Result<CheckTrace> {
        let character = self.world.character(actor)?;
        Ok(self.engine.resolve(character, &check, extra_modifier, &mut self.rng))
    }

    pub(super) fn name(&self, id: EntityId) -> Result<String> {
        self.world
            .name_of(id)
            .map(str::to_string)
            .ok_or(SimError::EntityNotFound(id))
    }

    /// Objectives stay put, so finding one means knowing where it is
    pub(super) fn reveal_found(&mut self, id: EntityId) -> Result<()> {
        let level = if self.world.get(id)?.is_objective() {
            Exploration::Known
        } else {
            Exploration::Glimpsed
        };
        self.world.reveal(id, level);
        Ok(())
    }

    /// Roll against every passage out of `area`; each success glimpses the far side
    pub(super) fn observe_connections(&mut self, observer: EntityId, area: AreaId, mode: ObserveMode) -> Result<()> {
        let checks = self
            .world
            .connections_of(area)
            .map(|conn| {
                let view = conn.viewed_from(area)?;
                Ok((view.other_area(), Check::observe_connection(mode, &view)))
            })
            .collect::<Result<Vec<_>>>()?;

        for (other, check) in checks {
            if self.roll_check(observer, check, 0.0)?.success {
                self.world.reveal_area(other, Exploration::Glimpsed);
            }
        }
        Ok(())
    }

    /// Roll against everything but agents in `area`; returns what was found
    pub(super) fn observe_contents(&mut self, observer: EntityId, area: AreaId, mode: ObserveMode) -> Result<Vec<EntityId>> {
        let checks: Vec<(EntityId, Check)> = self
            .world
            .non_agents_in(area)
            .into_iter()
            .filter_map(|id| self.world.entity(id))
            .map(|entity| (entity.id(), Check::observe_entity(mode, &entity.base)))
            .collect();

        let mut found = Vec::new();
        for (id, check) in checks {
            if self.roll_check(observer, check, 0.0)?.success {
                self.reveal_found(id)?;
                found.push(id);
            }
        }
        Ok(found)
    }

    /// Both parties stand in the same area; returns it
    pub(super) fn ensure_colocated(&self, actor: EntityId, target: EntityId) -> Result<AreaId> {
        let here = self.world.location(actor)?;
        if self.world.location(target)? != here {
            return Err(SimError::NotColocated {
                actor: self.name(actor)?,
                target: self.name(target)?,
            });
        }
        Ok(here)
    }
}
