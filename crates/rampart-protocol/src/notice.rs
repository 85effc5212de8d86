//! Player-facing notices emitted by the engine.
//!
//! The engine hands these to the host world, which owns localization and
//! delivery. Text rendering lives here so every host renders the same
//! wording.

use serde::{Deserialize, Serialize};

use crate::Winner;

/// A broadcast or per-player message produced during a siege.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Notice {
    /// Pre-siege warning, fired once at creation.
    SiegeWarning { city: String },
    /// Countdown to hostilities, fired at 75/50/25% of the cinematic window.
    Countdown { city: String, seconds_left: u64 },
    /// Hostilities have begun.
    BattleJoined { city: String },
    /// Periodic combat status line.
    Status {
        city: String,
        minutes_left: u64,
        leader_health_pct: Option<u32>,
    },
    /// Final outcome announcement.
    SiegeOver { city: String, winner: Winner },
    /// Per-recipient reward confirmation.
    Reward {
        city: String,
        honor: u32,
        gold: u32,
    },
}

impl Notice {
    /// Render the default English wording.
    pub fn render(&self) -> String {
        match self {
            Notice::SiegeWarning { city } => {
                format!("{city} is under attack! Defenders, rally to your leader!")
            }
            Notice::Countdown { city, seconds_left } => {
                format!("The assault on {city} begins in {seconds_left} seconds!")
            }
            Notice::BattleJoined { city } => {
                format!("The battle for {city} has begun!")
            }
            Notice::Status {
                city,
                minutes_left,
                leader_health_pct,
            } => match leader_health_pct {
                Some(pct) => format!(
                    "Siege of {city}: {minutes_left} minutes remain. The city leader stands at {pct}% health."
                ),
                None => format!("Siege of {city}: {minutes_left} minutes remain."),
            },
            Notice::SiegeOver { city, winner } => match winner {
                Winner::Attackers => format!("{city} has fallen to the invaders!"),
                Winner::Defenders => format!("The defenders of {city} have repelled the invasion!"),
            },
            Notice::Reward { city, honor, gold } => format!(
                "For your part in the siege of {city} you receive {honor} honor and {gold} copper."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_wording_differs_by_winner() {
        let fall = Notice::SiegeOver {
            city: "Ironhold".into(),
            winner: Winner::Attackers,
        };
        let hold = Notice::SiegeOver {
            city: "Ironhold".into(),
            winner: Winner::Defenders,
        };
        assert!(fall.render().contains("fallen"));
        assert!(hold.render().contains("repelled"));
    }
}
