//! One-hop noise propagation and hostile alarm updates

use crate::core::error::Result;
use crate::core::types::AreaId;
use crate::world::World;

/// What a single alarm event touched
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmReport {
    pub origin: AreaId,
    pub magnitude: f32,
    /// Neighboring areas and the attenuated magnitude each received
    pub propagated: Vec<(AreaId, f32)>,
    /// Hostiles whose alarm level actually moved
    pub hostiles_alerted: usize,
}

/// Add noise to `area` and every area one connection away, alarming the hostiles there.
///
/// The origin gets the full `magnitude`; each neighbor gets `magnitude` scaled by
/// the connecting passage's noise factor. Nothing travels a second hop.
pub fn apply_alarm_event(world: &mut World, area: AreaId, magnitude: f32) -> Result<AlarmReport> {
    world.area_mut(area)?.add_noise(magnitude);
    let mut hostiles_alerted = alarm_hostiles_in(world, area, magnitude)?;

    let hops: Vec<(AreaId, f32)> = world
        .connections_of(area)
        .filter_map(|conn| conn.other(area).map(|other| (other, magnitude * conn.noise_factor())))
        .collect();

    for &(other, attenuated) in &hops {
        world.area_mut(other)?.add_noise(attenuated);
        hostiles_alerted += alarm_hostiles_in(world, other, attenuated)?;
    }

    tracing::debug!(?area, magnitude, hops = hops.len(), hostiles_alerted, "alarm event");

    Ok(AlarmReport {
        origin: area,
        magnitude,
        propagated: hops,
        hostiles_alerted,
    })
}

fn alarm_hostiles_in(world: &mut World, area: AreaId, delta: f32) -> Result<usize> {
    let mut alerted = 0;
    for id in world.hostiles_in(area) {
        if world.hostile_mut(id)?.adjust_alarm(delta) {
            alerted += 1;
        }
    }
    Ok(alerted)
}
