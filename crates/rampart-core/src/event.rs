//! Per-siege mutable state.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use rampart_protocol::{
    ActorId, ActorKindId, Faction, Progress, Role, SiegePhase, SiegeSummary, Tier, WeatherState,
    Winner,
};

use crate::catalog::CityDefinition;
use crate::world::BotSnapshot;

/// One queued replacement for a fallen participant.
#[derive(Clone, Copy, Debug)]
pub struct RespawnEntry {
    pub actor: ActorId,
    pub tier: Tier,
    pub role: Role,
    pub died_at: Duration,
}

/// One spawnable identity, resolved from the catalog at siege start.
#[derive(Clone, Copy, Debug)]
pub struct UnitTemplate {
    pub kind: ActorKindId,
    pub level: u8,
    pub scale: f32,
}

/// The identities this event spawns, per tier. Resolved once at start so a
/// catalog reload cannot move kind ids under a running siege.
#[derive(Clone, Copy, Debug, Default)]
pub struct EventRoster {
    pub leader: Option<UnitTemplate>,
    pub commander: Option<UnitTemplate>,
    pub elite: Option<UnitTemplate>,
    pub minion: Option<UnitTemplate>,
    pub defender: Option<UnitTemplate>,
}

impl EventRoster {
    pub fn for_tier(&self, tier: Tier) -> Option<UnitTemplate> {
        match tier {
            Tier::Leader => self.leader,
            Tier::Commander => self.commander,
            Tier::Elite => self.elite,
            Tier::Minion => self.minion,
            Tier::Defender => self.defender,
        }
    }
}

/// Bot participants and the state needed to hand them back afterwards.
#[derive(Debug, Default)]
pub struct BotRoster {
    pub attackers: Vec<ActorId>,
    pub defenders: Vec<ActorId>,
    pub snapshots: HashMap<ActorId, BotSnapshot>,
    /// Dead bots awaiting their (short) respawn, with death time.
    pub pending: Vec<(ActorId, Role, Duration)>,
    pub queued_dead: HashSet<ActorId>,
}

/// One active (or recently resolved) siege.
///
/// Holds its own compiled copy of the city definition so a catalog reload
/// mid-siege cannot move waypoints under running units.
#[derive(Debug)]
pub struct SiegeEvent {
    pub city: CityDefinition,
    pub attacking_faction: Faction,
    pub phase: SiegePhase,

    pub started: Duration,
    pub ends: Duration,
    /// Captured at siege start; countdown thresholds never re-read config.
    pub cinematic_delay: Duration,
    pub resolved_at: Option<Duration>,
    pub outcome: Option<Winner>,

    /// The defended objective. `None` means it could not be located at
    /// start; the siege then resolves for the defenders at timeout.
    pub objective: Option<ActorId>,
    /// Display name of the attacking leader, for dialogue substitution.
    pub leader_name: String,
    /// Spawnable identities for respawns, resolved at start.
    pub roster: EventRoster,

    pub attackers: Vec<ActorId>,
    pub defenders: Vec<ActorId>,
    pub tiers: HashMap<ActorId, Tier>,
    pub progress: HashMap<ActorId, Progress>,

    pub respawn_queue: Vec<RespawnEntry>,
    /// Deaths already queued, so each death enqueues exactly once.
    pub queued_dead: HashSet<ActorId>,

    /// One-shot flags for the 75/50/25% countdown broadcasts.
    pub countdown_fired: [bool; 3],
    pub next_yell: Duration,
    pub next_status: Duration,
    /// The cinematic script chosen for this siege, played line by line.
    pub script: Vec<String>,
    pub script_cursor: usize,

    pub weather_before: Option<WeatherState>,
    pub bots: BotRoster,
}

impl SiegeEvent {
    pub fn is_active(&self) -> bool {
        self.phase != SiegePhase::Resolved
    }

    pub fn time_remaining(&self, now: Duration) -> Duration {
        self.ends.saturating_sub(now)
    }

    /// All tracked combatants, attackers first.
    pub fn participants(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.attackers.iter().chain(self.defenders.iter()).copied()
    }

    pub fn role_of(&self, actor: ActorId) -> Option<Role> {
        self.progress.get(&actor).map(|p| p.role)
    }

    /// Swap a respawned replacement in for a dead participant, preserving
    /// roster order and progress-map membership.
    pub fn replace_participant(&mut self, old: ActorId, new: ActorId, progress: Progress) {
        let roster = match progress.role {
            Role::Attacker => &mut self.attackers,
            Role::Defender => &mut self.defenders,
        };
        if let Some(slot) = roster.iter_mut().find(|a| **a == old) {
            *slot = new;
        } else {
            roster.push(new);
        }
        if let Some(tier) = self.tiers.remove(&old) {
            self.tiers.insert(new, tier);
        }
        self.progress.remove(&old);
        self.progress.insert(new, progress);
        self.queued_dead.remove(&old);
    }

    pub fn summary(&self, now: Duration, alive_attackers: usize, alive_defenders: usize) -> SiegeSummary {
        SiegeSummary {
            city: self.city.id,
            city_name: self.city.name.clone(),
            phase: self.phase,
            seconds_remaining: self.time_remaining(now).as_secs(),
            attackers_alive: alive_attackers,
            defenders_alive: alive_defenders,
        }
    }
}
