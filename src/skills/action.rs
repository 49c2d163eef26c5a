//! Action vocabulary shared by the decision layer and the turn engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every action a character can attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Wait,
    LookAround,
    Move,
    Peek,
    Investigate,
    Hide,
    TakeOut,
    Shoot,
    Bypass,
    Capture,
    Sneak,
    Charge,
    Exfiltrate,
}

impl ActionKind {
    pub const ALL: [ActionKind; 13] = [
        ActionKind::Wait,
        ActionKind::LookAround,
        ActionKind::Move,
        ActionKind::Peek,
        ActionKind::Investigate,
        ActionKind::Hide,
        ActionKind::TakeOut,
        ActionKind::Shoot,
        ActionKind::Bypass,
        ActionKind::Capture,
        ActionKind::Sneak,
        ActionKind::Charge,
        ActionKind::Exfiltrate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Wait => "wait",
            ActionKind::LookAround => "look_around",
            ActionKind::Move => "move",
            ActionKind::Peek => "peek",
            ActionKind::Investigate => "investigate",
            ActionKind::Hide => "hide",
            ActionKind::TakeOut => "take_out",
            ActionKind::Shoot => "shoot",
            ActionKind::Bypass => "bypass",
            ActionKind::Capture => "capture",
            ActionKind::Sneak => "sneak",
            ActionKind::Charge => "charge",
            ActionKind::Exfiltrate => "exfiltrate",
        }
    }

    /// Number of entity arguments a decision for this action carries
    pub fn arity(self) -> usize {
        match self {
            ActionKind::Wait
            | ActionKind::LookAround
            | ActionKind::Investigate
            | ActionKind::Hide
            | ActionKind::Exfiltrate => 0,
            _ => 1,
        }
    }

    /// Actions whose argument is an adjacent area
    pub fn targets_area(self) -> bool {
        matches!(
            self,
            ActionKind::Move | ActionKind::Peek | ActionKind::Sneak | ActionKind::Charge
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        ActionKind::ALL
            .into_iter()
            .find(|action| action.as_str() == normalized)
            .ok_or_else(|| format!("Unknown action: {}", s))
    }
}
