//! Gunfire damage

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::core::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotOutcome {
    Miss,
    /// Hit but the target survived; damage may be zero when the defense roll won
    Hit { damage: f32 },
    Killed,
}

impl ShotOutcome {
    pub fn is_kill(&self) -> bool {
        matches!(self, ShotOutcome::Killed)
    }

    pub fn damage_dealt(&self) -> bool {
        matches!(self, ShotOutcome::Hit { damage } if *damage > 0.0) || self.is_kill()
    }
}

/// Damage of a landed shot.
///
/// Shooter effectiveness and target defense are independent normal draws
/// centered on the shooter's firearms and the target's total cover. The
/// difference is clamped into `[0, cap]`. `sigma` must be finite and non-negative.
pub fn shot_damage<R: Rng + ?Sized>(
    firearms: f32,
    total_cover: f32,
    sigma: f32,
    cap: f32,
    rng: &mut R,
) -> Result<f32> {
    if !(sigma >= 0.0 && sigma.is_finite()) {
        return Err(SimError::Config(format!("shot sigma must be finite and >= 0, got {}", sigma)));
    }
    let attack = Normal::new(firearms, sigma)
        .map_err(|e| SimError::Config(format!("bad shot distribution: {}", e)))?;
    let defense = Normal::new(total_cover, sigma)
        .map_err(|e| SimError::Config(format!("bad shot distribution: {}", e)))?;

    let attack_roll = attack.sample(rng);
    let defense_roll = defense.sample(rng);
    let damage = (attack_roll - defense_roll).clamp(0.0, cap);

    tracing::debug!(attack_roll, defense_roll, damage, "shot damage");
    Ok(damage)
}
