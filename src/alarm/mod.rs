//! Noise and alarm
//!
//! Actions make noise in the actor's area; hostiles there and one passage
//! away grow more alarmed. Alarm persists between turns and drains slowly
//! while nothing new is heard. Noise itself lasts a single turn.

pub mod propagation;

pub use propagation::{apply_alarm_event, AlarmReport};

use crate::core::config::TuningConfig;
use crate::core::error::Result;
use crate::entity::Hostile;
use crate::skills::ActionKind;
use crate::world::{ConnectionKind, World};

/// Alarm magnitude of an action performed with the given primary-skill value.
///
/// `through` is the kind of passage a peek looked through; doors cost extra.
pub fn action_alarm(
    config: &TuningConfig,
    action: ActionKind,
    skill_value: f32,
    through: Option<ConnectionKind>,
) -> Result<f32> {
    let mut magnitude = config.alarm_table.lookup(action, skill_value)?;
    if action == ActionKind::Peek && through == Some(ConnectionKind::Door) {
        magnitude += config.door_peek_alarm_penalty;
    }
    Ok(magnitude)
}

/// Drain alarm from a hostile that heard nothing this turn
pub fn relax(hostile: &mut Hostile, decay: f32) -> bool {
    if hostile.alarm_increased_this_turn {
        return false;
    }
    hostile.adjust_alarm(-decay)
}

/// End-of-turn reset: noise back to baseline, chase pointers gone
pub fn reset_area_transients(world: &mut World) {
    world.reset_area_transients();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{AreaId, Skills};

    #[test]
    fn test_door_peek_costs_extra() {
        let config = TuningConfig::default();
        let open = action_alarm(&config, ActionKind::Peek, 1.0, Some(ConnectionKind::Open)).unwrap();
        let door = action_alarm(&config, ActionKind::Peek, 1.0, Some(ConnectionKind::Door)).unwrap();
        let window = action_alarm(&config, ActionKind::Peek, 1.0, Some(ConnectionKind::Window)).unwrap();
        assert!((open - 0.02).abs() < 1e-6);
        assert!((door - 0.22).abs() < 1e-6);
        assert_eq!(window, open);
    }

    #[test]
    fn test_relax_only_without_fresh_alarm() {
        let mut hostile = Hostile::new(Skills::new(), &[AreaId(0)]);
        hostile.adjust_alarm(0.3);
        assert!(!relax(&mut hostile, 0.1));
        assert!((hostile.alarm_level() - 0.3).abs() < 1e-6);

        hostile.clear_turn_flags();
        assert!(relax(&mut hostile, 0.1));
        assert!((hostile.alarm_level() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_relax_never_below_zero_or_out_of_fight_mode() {
        let mut calm = Hostile::new(Skills::new(), &[AreaId(0)]);
        relax(&mut calm, 0.1);
        assert_eq!(calm.alarm_level(), 0.0);

        let mut fighting = Hostile::new(Skills::new(), &[AreaId(0)]);
        fighting.adjust_alarm(5.0);
        fighting.clear_turn_flags();
        assert!(!relax(&mut fighting, 0.1));
        assert_eq!(fighting.alarm_level(), 1.0);
    }
}
