//! Action handlers
//!
//! Each handler narrates into the mission log and mutates the world. In-world
//! failures (locked doors, blown cover, misses) are log lines; only contract
//! violations such as acting on something in another room come back as `Err`.
//! Alarm for the chosen action is charged by the caller, after the handler.

use rand::seq::SliceRandom;

use crate::alarm::{action_alarm, apply_alarm_event};
use crate::core::error::{Result, SimError};
use crate::core::types::{AreaId, EntityId, Exploration, Skill};
use crate::decision::Decision;
use crate::mission::combat::{shot_damage, ShotOutcome};
use crate::mission::controller::GameController;
use crate::mission::log::MISSION_CONTROL;
use crate::skills::{ActionKind, Check, ObserveMode};

impl GameController {
    /// Dispatch a decision to its handler
    pub(super) fn perform(&mut self, agent: EntityId, decision: &Decision) -> Result<()> {
        let argument = decision.arguments.first().copied();
        match decision.action {
            ActionKind::Wait => self.wait(agent),
            ActionKind::LookAround => self.look_around(agent),
            ActionKind::Move => {
                let to = self.area_argument(argument)?;
                self.move_agent(agent, to).map(drop)
            }
            ActionKind::Peek => {
                let into = self.area_argument(argument)?;
                self.peek(agent, into)
            }
            ActionKind::Investigate => self.investigate(agent),
            ActionKind::Hide => self.hide(agent).map(drop),
            ActionKind::TakeOut => self.take_out(agent, required(argument)?).map(drop),
            ActionKind::Shoot => self.shoot(agent, required(argument)?).map(drop),
            ActionKind::Bypass => self.bypass(agent, required(argument)?).map(drop),
            ActionKind::Capture => self.capture(agent, required(argument)?).map(drop),
            ActionKind::Sneak => {
                let to = self.area_argument(argument)?;
                self.sneak(agent, to).map(drop)
            }
            ActionKind::Charge => {
                let to = self.area_argument(argument)?;
                self.charge(agent, to).map(drop)
            }
            ActionKind::Exfiltrate => self.exfiltrate(agent),
        }
    }

    fn area_argument(&self, argument: Option<EntityId>) -> Result<AreaId> {
        let id = required(argument)?;
        self.world
            .area_by_entity(id)
            .ok_or_else(|| SimError::InvalidDecision(format!("{} is not an area", id)))
    }

    pub fn wait(&mut self, agent: EntityId) -> Result<()> {
        let here = self.world.location(agent)?;
        let line = format!("{}: Waiting in {}.", self.name(agent)?, self.world.area(here)?.name());
        self.log.append(line);
        Ok(())
    }

    /// Scan the current area and its exits without moving
    pub fn look_around(&mut self, agent: EntityId) -> Result<()> {
        let here = self.world.location(agent)?;
        let line = format!("{}: Looking around {}.", self.name(agent)?, self.world.area(here)?.name());
        self.log.append(line);
        self.observe_contents(agent, here, ObserveMode::LookAround)?;
        self.observe_connections(agent, here, ObserveMode::LookAround)
    }

    /// Walk into an adjacent area.
    ///
    /// Locked passages stop the move. Passages with an access difficulty need
    /// a bypass roll first, whose alarm is charged whether or not it works.
    /// Arriving reveals the area and rolls to spot its contents and exits.
    /// Returns whether the agent actually moved.
    pub fn move_agent(&mut self, agent: EntityId, to: AreaId) -> Result<bool> {
        let from = self.world.location(agent)?;
        if !self.world.is_adjacent(from, to) {
            return Err(SimError::NotConnected { from, to });
        }
        let name = self.name(agent)?;
        let destination = self.world.area(to)?.name().to_string();
        self.log.append(format!("{}: Moving to {}.", name, destination));

        let view = self.world.require_connection(from, to)?.viewed_from(from)?;
        let (locked, access) = (view.is_locked(), view.access_difficulty());

        if locked {
            self.log.append(format!("{}: Locked.", name));
            return Ok(false);
        }

        if access > 0.0 {
            let skill = self.engine.primary_skill(ActionKind::Bypass).unwrap_or(Skill::Acrobatics);
            let skill_value = self.world.character(agent)?.skill(skill);
            let magnitude = action_alarm(&self.tuning, ActionKind::Bypass, skill_value, None)?;
            apply_alarm_event(&mut self.world, from, magnitude)?;

            let passed = self
                .roll_check(agent, Check::Bypass { access_difficulty: access }, 0.0)?
                .success;
            if !passed {
                self.log.append(format!("{}: Couldn't get through to {}.", name, destination));
                return Ok(false);
            }
        }

        self.world.change_area(agent, to)?;
        self.world.character_mut(agent)?.is_hidden = false;

        self.world.reveal_area(to, Exploration::Glimpsed);
        self.observe_contents(agent, to, ObserveMode::LookAround)?;
        self.observe_connections(agent, to, ObserveMode::LookAround)?;
        self.world.unlock_connection(from, to)?;
        Ok(true)
    }

    /// Look into an adjacent area without entering. Anything spotted is
    /// flagged as peeked for this turn.
    pub fn peek(&mut self, agent: EntityId, into: AreaId) -> Result<()> {
        let here = self.world.location(agent)?;
        if !self.world.is_adjacent(here, into) {
            return Err(SimError::NotConnected { from: here, to: into });
        }

        let found = self.observe_contents(agent, into, ObserveMode::Peek)?;
        for id in found {
            self.world.get_mut(id)?.base.is_peeked = true;
        }

        let line = format!("{}: Peeked into {}.", self.name(agent)?, self.world.area(into)?.name());
        self.log.append(line);
        Ok(())
    }

    /// Search the current area closely, including its exits
    pub fn investigate(&mut self, agent: EntityId) -> Result<()> {
        let here = self.world.location(agent)?;
        let line = format!("{}: Investigating {}.", self.name(agent)?, self.world.area(here)?.name());
        self.log.append(line);

        self.observe_contents(agent, here, ObserveMode::Investigate)?;
        self.observe_connections(agent, here, ObserveMode::Investigate)
    }

    /// Hide from every hostile in the area; one failed roll blows cover.
    /// With nobody watching, hiding always works.
    pub fn hide(&mut self, agent: EntityId) -> Result<bool> {
        let here = self.world.location(agent)?;
        let area = self.world.area(here)?;
        let checks = self
            .world
            .hostiles_in(here)
            .into_iter()
            .map(|id| Ok(Check::hide_from(self.world.character(id)?, area)))
            .collect::<Result<Vec<_>>>()?;

        let mut hidden = true;
        for check in checks {
            hidden &= self.roll_check(agent, check, 0.0)?.success;
        }
        self.world.character_mut(agent)?.is_hidden = hidden || self.options.agents_always_hidden;

        let name = self.name(agent)?;
        let area_name = self.world.area(here)?.name();
        let line = if hidden {
            format!("{}: Secure in {}.", name, area_name)
        } else {
            format!("{}: Cover blown in {}!", name, area_name)
        };
        self.log.append(line);
        Ok(hidden)
    }

    /// Melee takedown. Always preceded by a hide attempt; success removes the hostile.
    pub fn take_out(&mut self, agent: EntityId, hostile: EntityId) -> Result<bool> {
        self.ensure_colocated(agent, hostile)?;
        if !self.world.get(hostile)?.is_hostile() {
            return Err(SimError::WrongEntityKind {
                entity: hostile,
                expected: "hostile",
            });
        }

        self.hide(agent)?;

        let check = Check::take_out(self.world.character(hostile)?);
        let success = self.roll_check(agent, check, 0.0)?.success;

        let (name, target) = (self.name(agent)?, self.name(hostile)?);
        if success {
            self.world.remove_entity(hostile);
            self.log.append(format!("{}: {} taken out!", name, target));
        } else {
            self.log.append(format!("{}: In melee with {}!", name, target));
        }
        Ok(success)
    }

    /// Fire at a character in the same area. Used by agents and hostiles alike.
    ///
    /// The shooter is revealed whatever happens. A hit deals damage from two
    /// normal draws (see [`shot_damage`]); dropping to zero health removes
    /// the target.
    pub fn shoot(&mut self, shooter: EntityId, target: EntityId) -> Result<ShotOutcome> {
        let here = self.ensure_colocated(shooter, target)?;
        self.world.character_mut(shooter)?.is_hidden = false;

        let area = self.world.area(here)?;
        let defender = self.world.character(target)?;
        let check = Check::shoot_at(defender, area);
        let total_cover = defender.skill(Skill::Cover) + area.cover_modifier();

        let hit = self.roll_check(shooter, check, 0.0)?.success;
        let damage = if hit {
            let firearms = self.world.character(shooter)?.skill(Skill::Firearms);
            shot_damage(
                firearms,
                total_cover,
                self.tuning.skill_sigma,
                self.tuning.max_shot_damage,
                &mut self.rng,
            )?
        } else {
            0.0
        };

        let shooter_is_agent = self.world.get(shooter)?.is_agent();
        let target_is_agent = self.world.get(target)?.is_agent();
        let (shooter_name, target_name) = (self.name(shooter)?, self.name(target)?);

        if shooter_is_agent {
            self.log.append(format!("{}: Opened fire at {}!", shooter_name, target_name));
        }
        if target_is_agent {
            if damage > 0.0 {
                self.log.append(format!("{}: I'm hit!", target_name));
            } else {
                self.log.append(format!("{}: Under fire!", target_name));
            }
        }

        let lethal = self.world.character_mut(target)?.take_damage(damage);
        tracing::debug!(shooter = %shooter_name, target = %target_name, hit, damage, lethal, "shot resolved");

        if lethal {
            if shooter_is_agent {
                self.log.append(format!("{}: Target down!", shooter_name));
            } else if target_is_agent {
                self.log.append(format!("{}: Agent Down!", MISSION_CONTROL));
            }
            self.world.remove_entity(target);
            return Ok(ShotOutcome::Killed);
        }

        Ok(if hit {
            ShotOutcome::Hit { damage }
        } else {
            ShotOutcome::Miss
        })
    }

    pub fn capture(&mut self, agent: EntityId, objective: EntityId) -> Result<bool> {
        self.ensure_colocated(agent, objective)?;
        let check = self
            .world
            .get(objective)?
            .as_objective()
            .map(Check::capture)
            .ok_or(SimError::WrongEntityKind {
                entity: objective,
                expected: "objective",
            })?;

        let success = self.roll_check(agent, check, 0.0)?.success;
        let (name, target) = (self.name(agent)?, self.name(objective)?);
        if success {
            self.world.get_mut(objective)?.capture();
            self.log.append(format!("{}: {} captured!", name, target));
        } else {
            self.log.append(format!("{}: {} failed to capture!", name, target));
        }
        Ok(success)
    }

    pub fn bypass(&mut self, agent: EntityId, obstacle: EntityId) -> Result<bool> {
        self.ensure_colocated(agent, obstacle)?;
        let difficulty = self
            .world
            .get(obstacle)?
            .as_obstacle()
            .map(|o| o.difficulty())
            .ok_or(SimError::WrongEntityKind {
                entity: obstacle,
                expected: "obstacle",
            })?;

        let success = self
            .roll_check(agent, Check::Bypass { access_difficulty: difficulty }, 0.0)?
            .success;
        let (name, target) = (self.name(agent)?, self.name(obstacle)?);
        let line = if success {
            format!("{}: {} cleared!", name, target)
        } else {
            format!("{}: path blocked by {}!", name, target)
        };
        self.log.append(line);
        Ok(success)
    }

    /// Hide, move, hide again. Reports the final hide.
    pub fn sneak(&mut self, agent: EntityId, to: AreaId) -> Result<bool> {
        self.hide(agent)?;
        self.move_agent(agent, to)?;
        self.hide(agent)
    }

    /// Move in and open fire on a random hostile there, if the move worked
    pub fn charge(&mut self, agent: EntityId, to: AreaId) -> Result<Option<ShotOutcome>> {
        if !self.move_agent(agent, to)? {
            return Ok(None);
        }
        let hostiles = self.world.hostiles_in(to);
        match hostiles.choose(&mut self.rng) {
            Some(&target) => self.shoot(agent, target).map(Some),
            None => Ok(None),
        }
    }

    /// Leave the field. Eligibility is settled by the legal-action list.
    pub fn exfiltrate(&mut self, agent: EntityId) -> Result<()> {
        let name = self.name(agent)?;
        self.world.remove_entity(agent);
        self.log.append(format!("{}: Exfiltrated!", name));
        Ok(())
    }
}

fn required(argument: Option<EntityId>) -> Result<EntityId> {
    argument.ok_or_else(|| SimError::InvalidDecision("missing argument".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{EngineOptions, TuningConfig};
    use crate::core::types::Skills;
    use crate::entity::{Agent, Character, Entity, Hostile, Objective, ObjectiveKind, Obstacle};
    use crate::world::{Area, ConnectionSpec, World};

    struct Scene {
        gc: GameController,
        agent: EntityId,
        rooms: [AreaId; 3],
    }

    /// yard -(open)- lobby -(locked door)- office; agent in the lobby
    fn scene(skills: Skills) -> Scene {
        scene_with(skills, TuningConfig::default())
    }

    fn scene_with(skills: Skills, tuning: TuningConfig) -> Scene {
        let mut world = World::new();
        let yard = world.add_area(Area::new("Yard", "").extraction_point());
        let lobby = world.add_area(Area::new("Lobby", ""));
        let office = world.add_area(Area::new("Office", ""));
        world.connect_open(yard, lobby).unwrap();
        world
            .connect(lobby, office, ConnectionSpec::door().locked(true, true))
            .unwrap();

        let agent = world
            .spawn(Entity::agent("Vega", "", lobby, Agent::new(Character::new(skills))))
            .unwrap();
        let gc = GameController::new(
            world,
            tuning,
            EngineOptions {
                seed: Some(3),
                ..EngineOptions::default()
            },
        )
        .unwrap();
        Scene {
            gc,
            agent,
            rooms: [yard, lobby, office],
        }
    }

    fn guard(gc: &mut GameController, area: AreaId, skills: Skills) -> EntityId {
        gc.world_mut()
            .spawn(Entity::hostile("Guard", "", Hostile::new(skills, &[area])))
            .unwrap()
    }

    fn last_line(gc: &GameController) -> &str {
        gc.log().entries().last().map(String::as_str).unwrap_or("")
    }

    #[test]
    fn test_locked_move_is_refused() {
        let mut s = scene(Skills::new().with(Skill::Stealth, 1.0));
        let [_, lobby, office] = s.rooms;
        assert!(!s.gc.move_agent(s.agent, office).unwrap());
        assert_eq!(s.gc.world().location(s.agent).unwrap(), lobby);
        assert_eq!(last_line(&s.gc), "Vega: Locked.");
    }

    #[test]
    fn test_move_reveals_and_unhides() {
        let mut s = scene(Skills::new().with(Skill::Observation, 1.0));
        let [yard, _, _] = s.rooms;
        s.gc.world_mut().character_mut(s.agent).unwrap().is_hidden = true;

        assert!(s.gc.move_agent(s.agent, yard).unwrap());
        assert_eq!(s.gc.world().location(s.agent).unwrap(), yard);
        assert!(!s.gc.world().character(s.agent).unwrap().is_hidden);
        assert!(s.gc.world().area(yard).unwrap().explored().is_explored());
    }

    #[test]
    fn test_move_to_non_adjacent_is_contract_error() {
        let mut s = scene(Skills::new());
        let far = s.gc.world_mut().add_area(Area::new("Roof", ""));
        assert!(matches!(
            s.gc.move_agent(s.agent, far),
            Err(SimError::NotConnected { .. })
        ));
    }

    #[test]
    fn test_hide_with_no_hostiles_always_succeeds() {
        let mut s = scene(Skills::new());
        for _ in 0..10 {
            assert!(s.gc.hide(s.agent).unwrap());
        }
        assert_eq!(last_line(&s.gc), "Vega: Secure in Lobby.");
    }

    #[test]
    fn test_hide_against_sharp_guard_fails() {
        let mut s = scene(Skills::new());
        let [_, lobby, _] = s.rooms;
        guard(&mut s.gc, lobby, Skills::new().with(Skill::Observation, 1.0));
        assert!(!s.gc.hide(s.agent).unwrap());
        assert!(!s.gc.world().character(s.agent).unwrap().is_hidden);
        assert_eq!(last_line(&s.gc), "Vega: Cover blown in Lobby!");
    }

    #[test]
    fn test_capture_marks_objective() {
        let mut s = scene(Skills::new().with(Skill::Hacking, 1.0));
        let [_, lobby, _] = s.rooms;
        let terminal = s
            .gc
            .world_mut()
            .spawn(Entity::objective(
                "Terminal",
                "",
                lobby,
                Objective::new(ObjectiveKind::Computer, 0.0),
            ))
            .unwrap();

        assert!(s.gc.capture(s.agent, terminal).unwrap());
        let objective = s.gc.world().get(terminal).unwrap();
        assert!(objective.as_objective().unwrap().is_captured());
        assert_eq!(last_line(&s.gc), "Vega: Terminal captured!");
        assert_eq!(s.gc.objective_progress().captured, 1);
    }

    #[test]
    fn test_bypass_narrates_both_ways() {
        let mut s = scene(Skills::new().with(Skill::Acrobatics, 1.0));
        let [_, lobby, _] = s.rooms;
        let easy = s
            .gc
            .world_mut()
            .spawn(Entity::obstacle("Fence", "", lobby, Obstacle::new("fence", 0.0)))
            .unwrap();
        let wall = s
            .gc
            .world_mut()
            .spawn(Entity::obstacle("Wall", "", lobby, Obstacle::new("wall", 1.0)))
            .unwrap();

        assert!(s.gc.bypass(s.agent, easy).unwrap());
        assert_eq!(last_line(&s.gc), "Vega: Fence cleared!");
        assert!(!s.gc.bypass(s.agent, wall).unwrap());
        assert_eq!(last_line(&s.gc), "Vega: path blocked by Wall!");
    }

    #[test]
    fn test_shoot_requires_same_area() {
        let mut s = scene(Skills::new().with(Skill::Firearms, 1.0));
        let [yard, _, _] = s.rooms;
        let target = guard(&mut s.gc, yard, Skills::new());
        assert!(matches!(
            s.gc.shoot(s.agent, target),
            Err(SimError::NotColocated { .. })
        ));
    }

    #[test]
    fn test_shooting_reveals_shooter_and_kills_eventually() {
        let mut s = scene(Skills::new().with(Skill::Firearms, 1.0));
        let [_, lobby, _] = s.rooms;
        let target = guard(&mut s.gc, lobby, Skills::new());

        let mut outcome = ShotOutcome::Miss;
        for _ in 0..200 {
            s.gc.world_mut().character_mut(s.agent).unwrap().is_hidden = true;
            outcome = s.gc.shoot(s.agent, target).unwrap();
            assert!(!s.gc.world().character(s.agent).unwrap().is_hidden);
            if outcome.is_kill() {
                break;
            }
        }
        assert!(outcome.is_kill());
        assert!(!s.gc.world().contains(target));
        assert_eq!(last_line(&s.gc), "Vega: Target down!");
    }

    #[test]
    fn test_take_out_removes_hostile_on_success() {
        let mut s = scene(Skills::new().with(Skill::Stealth, 1.0).with(Skill::HandToHand, 1.0));
        let [_, lobby, _] = s.rooms;
        let target = guard(&mut s.gc, lobby, Skills::new());

        assert!(s.gc.take_out(s.agent, target).unwrap());
        assert!(!s.gc.world().contains(target));
        let lines = s.gc.log().entries();
        assert_eq!(lines[lines.len() - 2], "Vega: Secure in Lobby.");
        assert_eq!(lines[lines.len() - 1], "Vega: Guard taken out!");
    }

    #[test]
    fn test_charge_through_lock_does_not_shoot() {
        let mut s = scene(Skills::new().with(Skill::Firearms, 1.0));
        let [_, _, office] = s.rooms;
        guard(&mut s.gc, office, Skills::new());
        assert_eq!(s.gc.charge(s.agent, office).unwrap(), None);
    }

    #[test]
    fn test_exfiltrate_removes_agent() {
        let mut s = scene(Skills::new());
        s.gc.exfiltrate(s.agent).unwrap();
        assert!(!s.gc.world().contains(s.agent));
        assert_eq!(last_line(&s.gc), "Vega: Exfiltrated!");
    }

    fn sharp_peeking() -> TuningConfig {
        TuningConfig {
            peek_modifier: 0.0,
            ..TuningConfig::default()
        }
    }

    fn briefing(gc: &GameController) -> String {
        crate::decision::knowledge_base(gc.world(), &[], None).unwrap()
    }

    #[test]
    fn test_peek_flags_spotted_entities() {
        // 1.0 observation - 0.0 spot + 0.0 peek modifier: always spotted
        let mut s = scene_with(Skills::new().with(Skill::Observation, 1.0), sharp_peeking());
        let [yard, _, _] = s.rooms;
        let watcher = guard(&mut s.gc, yard, Skills::new());
        assert!(!briefing(&s.gc).contains("Hostiles:"));

        s.gc.peek(s.agent, yard).unwrap();
        let entity = s.gc.world().get(watcher).unwrap();
        assert!(entity.explored().is_explored());
        assert!(entity.base.is_peeked);
        assert!(s.gc.hostile_visible(watcher).unwrap());
        assert!(briefing(&s.gc).contains("Name: Guard"));
        assert_eq!(last_line(&s.gc), "Vega: Peeked into Yard.");
        // The peeker stays put
        assert_eq!(s.gc.world().location(s.agent).unwrap(), s.rooms[1]);
    }

    #[test]
    fn test_failed_peek_flags_nothing() {
        // 0.0 observation - 0.0 spot - 0.2 peek penalty clamps to 0
        let mut s = scene(Skills::new().with(Skill::Observation, 0.0));
        let [yard, _, _] = s.rooms;
        let watcher = guard(&mut s.gc, yard, Skills::new());

        s.gc.peek(s.agent, yard).unwrap();
        let entity = s.gc.world().get(watcher).unwrap();
        assert!(!entity.explored().is_explored());
        assert!(!entity.base.is_peeked);
        assert!(!s.gc.hostile_visible(watcher).unwrap());
        assert!(!briefing(&s.gc).contains("Hostiles:"));
        // The attempt is logged either way
        assert_eq!(last_line(&s.gc), "Vega: Peeked into Yard.");
    }
}
