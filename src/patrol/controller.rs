//! Hostile movement: chase, investigate noise, or walk the patrol
//!
//! Evaluated once per turn for every hostile that has nobody to shoot. The
//! first matching mode wins:
//!
//! 1. Someone fled this room while the guard watched: follow the chase pointer.
//! 2. Alarmed: head for the loudest of here and the adjacent areas, or wander
//!    at random when everything is silent.
//! 3. Calm: maybe linger, otherwise continue along the pendulum route.
//!
//! Moves are always a single step. A target with no path means staying put.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::config::TuningConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{AreaId, EntityId};
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PursuitMode {
    ChasePointer,
    Noise,
    RandomSearch,
    Patrol,
    /// Standing still: lingering, a one-stop route, or nowhere to go
    Linger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatrolDecision {
    pub mode: PursuitMode,
    pub target: Option<AreaId>,
    /// First hop toward `target`; `None` means the hostile stays
    pub next_step: Option<AreaId>,
}

#[derive(Debug, Clone)]
pub struct PatrolController {
    alarmed_threshold: f32,
    stay_probability: f32,
}

impl PatrolController {
    pub fn new(config: &TuningConfig) -> Self {
        Self {
            alarmed_threshold: config.alarmed_threshold,
            stay_probability: config.guard_stay_probability,
        }
    }

    /// Pick this turn's target and first step. Updates the hostile's patrol
    /// bookkeeping but does not move it.
    pub fn plan<R: Rng + ?Sized>(
        &self,
        world: &mut World,
        hostile: EntityId,
        rng: &mut R,
    ) -> Result<PatrolDecision> {
        let here = world.location(hostile)?;
        let alarm = world
            .get(hostile)?
            .as_hostile()
            .ok_or(SimError::WrongEntityKind {
                entity: hostile,
                expected: "hostile",
            })?
            .alarm_level();

        let chase_pointer = world.area(here)?.chase_pointer();

        let (mode, target) = if let Some(pointer) = chase_pointer {
            (PursuitMode::ChasePointer, Some(pointer))
        } else if alarm > self.alarmed_threshold {
            world.hostile_mut(hostile)?.is_patrolling = false;
            self.noise_target(world, here, rng)?
        } else {
            let guard = world.hostile_mut(hostile)?;
            guard.is_patrolling = true;

            if guard.patrol.len() <= 1 || rng.gen::<f32>() < self.stay_probability {
                (PursuitMode::Linger, None)
            } else {
                if guard.patrol.current() == Some(here) {
                    guard.patrol.advance();
                }
                (PursuitMode::Patrol, guard.patrol.current())
            }
        };

        let next_step = match target {
            Some(target) => world.graph().next_step(here, target)?,
            None => None,
        };

        Ok(PatrolDecision {
            mode,
            target,
            next_step,
        })
    }

    /// Loudest of the current and adjacent areas; ties keep the current area
    fn noise_target<R: Rng + ?Sized>(
        &self,
        world: &World,
        here: AreaId,
        rng: &mut R,
    ) -> Result<(PursuitMode, Option<AreaId>)> {
        let neighbors = world.neighbors(here);

        let mut candidates = vec![(here, world.area(here)?.noise_level())];
        for &area in neighbors {
            candidates.push((area, world.area(area)?.noise_level()));
        }
        candidates.sort_by_key(|&(_, noise)| Reverse(OrderedFloat(noise)));

        match candidates.first() {
            Some(&(area, noise)) if noise > 0.0 => Ok((PursuitMode::Noise, Some(area))),
            _ => match neighbors.choose(rng) {
                Some(&area) => Ok((PursuitMode::RandomSearch, Some(area))),
                None => Ok((PursuitMode::Linger, None)),
            },
        }
    }

    /// Plan and carry out one hostile's move
    pub fn step<R: Rng + ?Sized>(
        &self,
        world: &mut World,
        hostile: EntityId,
        rng: &mut R,
    ) -> Result<PatrolDecision> {
        let decision = self.plan(world, hostile, rng)?;
        match decision.next_step {
            Some(next) => {
                world.change_area(hostile, next)?;
            }
            None if decision.target.is_some() => {
                tracing::debug!(target = ?decision.target, "no step toward target, staying");
            }
            None => {}
        }
        tracing::debug!(mode = ?decision.mode, next = ?decision.next_step, "hostile moved");
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Skills;
    use crate::entity::{Agent, Character, Entity, Hostile};
    use crate::world::Area;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// 0 - 1 - 2 - 3 corridor plus an isolated room 4
    fn corridor() -> (World, Vec<AreaId>) {
        let mut world = World::new();
        let ids: Vec<AreaId> = (0..5)
            .map(|i| world.add_area(Area::new(format!("Room {}", i), "")))
            .collect();
        for pair in ids[..4].windows(2) {
            world.connect_open(pair[0], pair[1]).unwrap();
        }
        (world, ids)
    }

    fn calm_controller() -> PatrolController {
        let config = TuningConfig {
            guard_stay_probability: 0.0,
            ..TuningConfig::default()
        };
        PatrolController::new(&config)
    }

    fn spawn_guard(world: &mut World, route: &[AreaId]) -> EntityId {
        world
            .spawn(Entity::hostile("Guard", "", Hostile::new(Skills::new(), route)))
            .unwrap()
    }

    #[test]
    fn test_patrol_walks_pendulum() {
        let (mut world, ids) = corridor();
        let guard = spawn_guard(&mut world, &[ids[0], ids[1], ids[2]]);
        let controller = calm_controller();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let mut visited = Vec::new();
        for _ in 0..4 {
            let decision = controller.step(&mut world, guard, &mut rng).unwrap();
            assert_eq!(decision.mode, PursuitMode::Patrol);
            visited.push(world.location(guard).unwrap());
        }
        assert_eq!(visited, vec![ids[1], ids[2], ids[1], ids[0]]);
    }

    #[test]
    fn test_patrol_resumes_from_off_route() {
        let (mut world, ids) = corridor();
        let guard = spawn_guard(&mut world, &[ids[0], ids[1]]);
        // Knocked off route: standing in room 3 while the route index points at room 0
        world.change_area(guard, ids[1]).unwrap();
        world.change_area(guard, ids[2]).unwrap();
        world.change_area(guard, ids[3]).unwrap();

        let controller = calm_controller();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let decision = controller.step(&mut world, guard, &mut rng).unwrap();

        assert_eq!(decision.target, Some(ids[0]));
        assert_eq!(world.location(guard).unwrap(), ids[2]);
    }

    #[test]
    fn test_single_stop_route_lingers() {
        let (mut world, ids) = corridor();
        let guard = spawn_guard(&mut world, &[ids[2]]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let decision = calm_controller().step(&mut world, guard, &mut rng).unwrap();
        assert_eq!(decision.mode, PursuitMode::Linger);
        assert_eq!(world.location(guard).unwrap(), ids[2]);
    }

    #[test]
    fn test_stay_probability_one_always_lingers() {
        let (mut world, ids) = corridor();
        let guard = spawn_guard(&mut world, &[ids[0], ids[1]]);
        let config = TuningConfig {
            guard_stay_probability: 1.0,
            ..TuningConfig::default()
        };
        let controller = PatrolController::new(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        for _ in 0..10 {
            controller.step(&mut world, guard, &mut rng).unwrap();
        }
        assert_eq!(world.location(guard).unwrap(), ids[0]);
    }

    #[test]
    fn test_alarmed_guard_follows_noise() {
        let (mut world, ids) = corridor();
        let guard = spawn_guard(&mut world, &[ids[1]]);
        world.hostile_mut(guard).unwrap().adjust_alarm(0.8);
        world.area_mut(ids[2]).unwrap().add_noise(0.4);
        world.area_mut(ids[0]).unwrap().add_noise(0.1);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let decision = calm_controller().step(&mut world, guard, &mut rng).unwrap();

        assert_eq!(decision.mode, PursuitMode::Noise);
        assert_eq!(world.location(guard).unwrap(), ids[2]);
        assert!(!world.get(guard).unwrap().as_hostile().unwrap().is_patrolling);
    }

    #[test]
    fn test_alarmed_guard_stays_when_loudest_is_here() {
        let (mut world, ids) = corridor();
        let guard = spawn_guard(&mut world, &[ids[1]]);
        world.hostile_mut(guard).unwrap().adjust_alarm(0.8);
        world.area_mut(ids[1]).unwrap().add_noise(0.5);
        world.area_mut(ids[2]).unwrap().add_noise(0.5);

        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let decision = calm_controller().step(&mut world, guard, &mut rng).unwrap();
        assert_eq!(decision.target, Some(ids[1]));
        assert_eq!(decision.next_step, None);
    }

    #[test]
    fn test_silent_alarmed_guard_searches_randomly() {
        let (mut world, ids) = corridor();
        let guard = spawn_guard(&mut world, &[ids[1]]);
        world.hostile_mut(guard).unwrap().adjust_alarm(0.8);

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let decision = calm_controller().step(&mut world, guard, &mut rng).unwrap();

        assert_eq!(decision.mode, PursuitMode::RandomSearch);
        let now = world.location(guard).unwrap();
        assert!(now == ids[0] || now == ids[2]);
    }

    #[test]
    fn test_chase_pointer_takes_priority() {
        let (mut world, ids) = corridor();
        let guard = spawn_guard(&mut world, &[ids[1], ids[0]]);
        let agent = world
            .spawn(Entity::agent(
                "Vega",
                "",
                ids[1],
                Agent::new(Character::new(Skills::new())),
            ))
            .unwrap();
        world.change_area(agent, ids[2]).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let decision = calm_controller().step(&mut world, guard, &mut rng).unwrap();

        assert_eq!(decision.mode, PursuitMode::ChasePointer);
        assert_eq!(world.location(guard).unwrap(), ids[2]);
    }

    #[test]
    fn test_unreachable_target_stays() {
        let (mut world, ids) = corridor();
        let guard = spawn_guard(&mut world, &[ids[3], ids[4]]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let decision = calm_controller().step(&mut world, guard, &mut rng).unwrap();
        assert_eq!(decision.target, Some(ids[4]));
        assert_eq!(decision.next_step, None);
        assert_eq!(world.location(guard).unwrap(), ids[3]);
    }
}
