//! Dialogue pools for the cinematic and combat phases.
//!
//! Scripts come from `scripts.yaml` as strings of semicolon-separated lines;
//! one script is chosen at random per siege and its lines play in order.
//! Combat taunts are single lines drawn at random. Lines may contain the
//! `{LEADER}` and `{CITY}` placeholders.

use rampart_protocol::Faction;
use serde::Deserialize;

use crate::rng::GameRng;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawScripts {
    #[serde(default)]
    pub coalition_scripts: Vec<String>,
    #[serde(default)]
    pub dominion_scripts: Vec<String>,
    #[serde(default)]
    pub coalition_taunts: String,
    #[serde(default)]
    pub dominion_taunts: String,
}

/// Parsed dialogue pools, per attacking faction.
#[derive(Clone, Debug, Default)]
pub struct ScriptBook {
    coalition_scripts: Vec<Vec<String>>,
    dominion_scripts: Vec<Vec<String>>,
    coalition_taunts: Vec<String>,
    dominion_taunts: Vec<String>,
}

impl ScriptBook {
    pub(crate) fn from_raw(raw: RawScripts) -> Self {
        Self {
            coalition_scripts: raw.coalition_scripts.iter().map(|s| split_lines(s)).collect(),
            dominion_scripts: raw.dominion_scripts.iter().map(|s| split_lines(s)).collect(),
            coalition_taunts: split_lines(&raw.coalition_taunts),
            dominion_taunts: split_lines(&raw.dominion_taunts),
        }
    }

    /// Draw one cinematic script for the given attacking faction.
    pub fn pick_script(&self, faction: Faction, rng: &mut GameRng) -> Vec<String> {
        let pool = match faction {
            Faction::Coalition => &self.coalition_scripts,
            Faction::Dominion => &self.dominion_scripts,
        };
        rng.pick(pool).cloned().unwrap_or_default()
    }

    /// Draw one combat taunt for the given attacking faction.
    pub fn pick_taunt(&self, faction: Faction, rng: &mut GameRng) -> Option<String> {
        let pool = match faction {
            Faction::Coalition => &self.coalition_taunts,
            Faction::Dominion => &self.dominion_taunts,
        };
        rng.pick(pool).cloned()
    }
}

fn split_lines(script: &str) -> Vec<String> {
    script
        .split(';')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Substitute the `{LEADER}` and `{CITY}` placeholders in a dialogue line.
pub fn substitute(line: &str, leader: &str, city: &str) -> String {
    line.replace("{LEADER}", leader).replace("{CITY}", city)
}
