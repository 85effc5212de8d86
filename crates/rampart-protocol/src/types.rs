//! Core shared types for the siege engine.

use serde::{Deserialize, Serialize};

/// World-space position. Z is vertical.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Full 3D distance.
    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Horizontal-plane distance, ignoring Z.
    pub fn distance_2d(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// The two player factions of the host world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Coalition,
    Dominion,
}

impl Faction {
    pub const fn opponent(self) -> Faction {
        match self {
            Faction::Coalition => Faction::Dominion,
            Faction::Dominion => Faction::Coalition,
        }
    }
}

/// Rank classification governing level, scale, and respawn delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    /// The assault leader. One per siege.
    Leader,
    /// Elite commanders flanking the leader.
    Commander,
    /// Mid-tier elites.
    Elite,
    /// Rank-and-file troops.
    Minion,
    /// City garrison defenders.
    Defender,
}

/// Which side of the siege a participant fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Attacker,
    Defender,
}

/// A participant's place along the city's waypoint path.
///
/// Attackers count upward from 0 toward the objective; defenders count
/// downward from the waypoint count toward the spawn anchor. The role is
/// carried explicitly rather than folded into the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub role: Role,
    pub index: usize,
    /// Set once the terminal anchor has been reached; such units are skipped.
    pub arrived: bool,
}

impl Progress {
    pub const fn start_attacker() -> Self {
        Self {
            role: Role::Attacker,
            index: 0,
            arrived: false,
        }
    }

    pub const fn start_defender(waypoint_count: usize) -> Self {
        Self {
            role: Role::Defender,
            index: waypoint_count,
            arrived: false,
        }
    }
}

/// Lifecycle phase of a siege event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiegePhase {
    /// Pre-announcement, immediately replaced by Cinematic at creation.
    Warning,
    /// Scripted dialogue window, no aggression.
    Cinematic,
    /// Hostilities active, pathing and respawns running.
    Combat,
    /// Outcome computed, cleanup running; terminal.
    Resolved,
}

/// Which side won a resolved siege.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "side")]
pub enum Winner {
    /// The objective actor died before the timer ran out.
    Attackers,
    /// The timer expired with the objective still alive, or the objective
    /// was missing from the start.
    Defenders,
}

/// Ambient weather override applied for the duration of a siege.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherState {
    pub kind: WeatherKind,
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherKind {
    Fine,
    Rain,
    Storm,
    Snow,
}

/// Transient zone-wide audio cues fired at phase transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicCue {
    CinematicIntro,
    BattleBegins,
    CoalitionVictory,
    DominionVictory,
}
