//! Engine tuning, loaded from `siege.yaml`.

use std::time::Duration;

use rampart_protocol::Tier;
use serde::Deserialize;

/// All siege tuning knobs. Every field has a default matching the values
/// the event shipped with, so a partial YAML file is fine.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SiegeConfig {
    pub enabled: bool,
    /// Allow more than one city to be under siege at once.
    pub multi_siege: bool,
    /// Bounds for the random delay between sieges, in minutes.
    pub timer_min_minutes: u64,
    pub timer_max_minutes: u64,
    /// Length of the combat window, in minutes.
    pub duration_minutes: u64,
    /// Scripted-dialogue window before hostilities, in seconds.
    pub cinematic_delay_secs: u64,
    pub yell_cadence_secs: u64,
    pub status_cadence_secs: u64,
    /// Radius for announcements and rewards. 0 means everyone online.
    pub announce_radius: f32,
    /// How long a resolved event is kept visible before being discarded.
    pub resolved_retention_secs: u64,
    pub arrival_radius: f32,
    /// Horizontal scatter applied to move targets so units do not stack.
    pub jitter_radius: f32,
    pub formation: FormationConfig,
    pub respawn_delay_secs: RespawnDelays,
    pub reward: RewardConfig,
    pub bots: BotConfig,
}

impl Default for SiegeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            multi_siege: false,
            timer_min_minutes: 120,
            timer_max_minutes: 240,
            duration_minutes: 30,
            cinematic_delay_secs: 150,
            yell_cadence_secs: 30,
            status_cadence_secs: 300,
            announce_radius: 500.0,
            resolved_retention_secs: 60,
            arrival_radius: 10.0,
            jitter_radius: 5.0,
            formation: FormationConfig::default(),
            respawn_delay_secs: RespawnDelays::default(),
            reward: RewardConfig::default(),
            bots: BotConfig::default(),
        }
    }
}

impl SiegeConfig {
    pub fn siege_interval_secs(&self) -> std::ops::Range<u64> {
        self.timer_min_minutes * 60..self.timer_max_minutes * 60 + 1
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_minutes * 60)
    }

    pub fn cinematic_delay(&self) -> Duration {
        Duration::from_secs(self.cinematic_delay_secs)
    }

    pub fn yell_cadence(&self) -> Duration {
        Duration::from_secs(self.yell_cadence_secs)
    }

    pub fn status_cadence(&self) -> Duration {
        Duration::from_secs(self.status_cadence_secs)
    }

    pub fn resolved_retention(&self) -> Duration {
        Duration::from_secs(self.resolved_retention_secs)
    }

    pub fn respawn_delay(&self, tier: Tier) -> Duration {
        let secs = match tier {
            Tier::Leader => self.respawn_delay_secs.leader,
            Tier::Commander => self.respawn_delay_secs.commander,
            Tier::Elite => self.respawn_delay_secs.elite,
            Tier::Minion => self.respawn_delay_secs.minion,
            Tier::Defender => self.respawn_delay_secs.defender,
        };
        Duration::from_secs(secs)
    }
}

/// Unit counts and ring radii for the initial formation.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    pub minions: u32,
    pub elites: u32,
    pub commanders: u32,
    pub defenders: u32,
    pub minion_ring: f32,
    pub elite_ring: f32,
    pub commander_ring: f32,
    pub leader_ring: f32,
    pub defender_ring: f32,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            minions: 15,
            elites: 5,
            commanders: 2,
            defenders: 10,
            minion_ring: 35.0,
            elite_ring: 21.0,
            commander_ring: 10.5,
            leader_ring: 3.0,
            defender_ring: 10.0,
        }
    }
}

/// Per-tier respawn delays, in seconds. Longest at the top of the ladder.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RespawnDelays {
    pub leader: u64,
    pub commander: u64,
    pub elite: u64,
    pub minion: u64,
    pub defender: u64,
}

impl Default for RespawnDelays {
    fn default() -> Self {
        Self {
            leader: 300,
            commander: 180,
            elite: 120,
            minion: 60,
            defender: 45,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub honor: u32,
    /// Gold payout in copper: base + per_level * player level.
    pub gold_base: u32,
    pub gold_per_level: u32,
    pub min_level: u8,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            honor: 100,
            gold_base: 5000,
            gold_per_level: 5000,
            min_level: 10,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub enabled: bool,
    pub per_side: u32,
    pub min_level: u8,
    pub respawn_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            per_side: 5,
            min_level: 60,
            respawn_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respawn_ladder_is_decreasing() {
        let config = SiegeConfig::default();
        let delays = [
            Tier::Leader,
            Tier::Commander,
            Tier::Elite,
            Tier::Minion,
            Tier::Defender,
        ]
        .map(|t| config.respawn_delay(t));
        for pair in delays.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: SiegeConfig = serde_yaml::from_str("multi_siege: true\n").unwrap();
        assert!(config.multi_siege);
        assert_eq!(config.timer_min_minutes, 120);
        assert_eq!(config.formation.minions, 15);
    }
}
