//! Administrative operations exposed by the siege engine.

use serde::{Deserialize, Serialize};

use crate::{CityId, Position, SiegePhase, Winner};

/// A request from an operator. City names are resolved by the engine; an
/// unknown name is rejected without touching engine state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum AdminCommand {
    /// Start a siege now, on a named city or a random eligible one.
    StartSiege { city: Option<String> },
    /// Force an active siege to resolve with an explicit winner.
    StopSiege { city: String, winner: Winner },
    /// Despawn everything belonging to one city's siege, or to all sieges.
    Cleanup { city: Option<String> },
    /// Report all active sieges.
    ListSieges,
    /// Dump a city's waypoint path (diagnostic).
    ShowWaypoints { city: String },
    /// Re-read catalog and configuration for future sieges.
    ReloadConfig,
}

/// Engine response to an [`AdminCommand`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AdminReply {
    SiegeStarted { city: CityId, name: String },
    SiegeStopped { city: CityId, winner: Winner },
    CleanedUp { events: usize },
    Sieges { sieges: Vec<SiegeSummary> },
    Waypoints { city: CityId, path: Vec<Position> },
    Reloaded,
}

/// One row of the `ListSieges` report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiegeSummary {
    pub city: CityId,
    pub city_name: String,
    pub phase: SiegePhase,
    pub seconds_remaining: u64,
    pub attackers_alive: usize,
    pub defenders_alive: usize,
}
