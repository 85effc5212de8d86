//! Raw (YAML-shaped) and compiled catalog types.
//!
//! The YAML side uses string data-ids; compilation maps those to dense
//! runtime ids in key order, so ids are deterministic for a given file.

use std::collections::HashMap;

use rampart_protocol::{ActorKindId, CityId, DataId, Faction, MapId, Position, Tier, ZoneId};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct RawActorKind {
    pub name: String,
    pub level: u8,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawForce {
    /// Pool of leader identities; one is drawn per siege for variety.
    pub leaders: Vec<DataId>,
    pub commander: DataId,
    pub elite: DataId,
    pub minion: DataId,
    pub defender: DataId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCity {
    pub name: String,
    pub faction: Faction,
    pub map: u32,
    pub zone: u32,
    /// Actor kind of the defended objective (the city leader).
    pub leader: DataId,
    pub spawn: [f32; 3],
    pub objective: [f32; 3],
    pub announce: [f32; 3],
    #[serde(default)]
    pub waypoints: Vec<[f32; 3]>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// A spawnable actor template.
#[derive(Clone, Debug)]
pub struct ActorKind {
    pub name: String,
    pub level: u8,
    pub scale: f32,
}

/// The assault/garrison roster one faction fields.
#[derive(Clone, Debug)]
pub struct ForceRoster {
    pub leaders: Vec<ActorKindId>,
    pub commander: ActorKindId,
    pub elite: ActorKindId,
    pub minion: ActorKindId,
    pub defender: ActorKindId,
}

impl ForceRoster {
    /// Kind used when fielding a unit of the given tier. Leaders come from
    /// a pool and are chosen elsewhere.
    pub fn kind_for(&self, tier: Tier) -> Option<ActorKindId> {
        match tier {
            Tier::Leader => None,
            Tier::Commander => Some(self.commander),
            Tier::Elite => Some(self.elite),
            Tier::Minion => Some(self.minion),
            Tier::Defender => Some(self.defender),
        }
    }
}

/// A city eligible for sieges. Immutable at runtime except via reload.
#[derive(Clone, Debug)]
pub struct CityDefinition {
    pub id: CityId,
    pub name: String,
    pub faction: Faction,
    pub map: MapId,
    pub zone: ZoneId,
    pub leader_kind: ActorKindId,
    /// Where the attacking force assembles.
    pub spawn: Position,
    /// Where the defended objective stands.
    pub objective: Position,
    /// Center for radius-gated announcements and rewards.
    pub announce: Position,
    /// Ordered path from spawn toward objective. May be empty.
    pub waypoints: Vec<Position>,
    pub enabled: bool,
}

/// Compiled city and force data.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub kinds: Vec<ActorKind>,
    pub kind_ids: HashMap<String, ActorKindId>,
    pub coalition_force: ForceRoster,
    pub dominion_force: ForceRoster,
    pub cities: Vec<CityDefinition>,
    pub city_ids: HashMap<String, CityId>,
}

impl Catalog {
    pub fn kind(&self, id: ActorKindId) -> &ActorKind {
        &self.kinds[id.raw as usize]
    }

    pub fn force(&self, faction: Faction) -> &ForceRoster {
        match faction {
            Faction::Coalition => &self.coalition_force,
            Faction::Dominion => &self.dominion_force,
        }
    }

    pub fn city(&self, id: CityId) -> &CityDefinition {
        &self.cities[id.raw as usize]
    }

    pub fn city_by_name(&self, name: &str) -> Option<&CityDefinition> {
        // Accept either the data id or the display name, case-insensitively.
        if let Some(&id) = self.city_ids.get(name) {
            return Some(self.city(id));
        }
        self.cities
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}
