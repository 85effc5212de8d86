//! Optional autonomous-agent participation.
//!
//! Mirrors the pathing/respawn protocol for player-like agents supplied by
//! an injected [`BotHost`]. Everything here is best-effort; the engine runs
//! identically when no bot capability is present.

use std::time::Duration;

use rampart_protocol::{ActorId, Faction, Role};
use tracing::{debug, warn};

use crate::config::SiegeConfig;
use crate::event::SiegeEvent;
use crate::rng::GameRng;
use crate::world::BotHost;

/// Draft up to `per_side` agents per side, snapshot them, and move them to
/// their side's anchor under combat duty.
pub(crate) fn recruit(
    event: &mut SiegeEvent,
    config: &SiegeConfig,
    bots: &mut dyn BotHost,
    rng: &mut GameRng,
) {
    if !config.bots.enabled {
        return;
    }
    for role in [Role::Attacker, Role::Defender] {
        let faction = side_faction(event, role);
        let mut pool = bots.candidates(faction, config.bots.min_level);
        let mut drafted = 0u32;
        while drafted < config.bots.per_side && !pool.is_empty() {
            let idx = rng.gen_range_u64(0..pool.len() as u64) as usize;
            let bot = pool.swap_remove(idx);
            let Some(snapshot) = bots.snapshot(bot) else {
                continue;
            };
            event.bots.snapshots.insert(bot, snapshot);
            bots.teleport(bot, event.city.map, side_anchor(event, role));
            bots.assign_combat_duty(bot, faction.opponent());
            match role {
                Role::Attacker => event.bots.attackers.push(bot),
                Role::Defender => event.bots.defenders.push(bot),
            }
            drafted += 1;
        }
        debug!(city = %event.city.name, ?role, drafted, "bots recruited");
    }
}

/// Detect bot deaths and bring them back after the short bot delay.
pub(crate) fn tick(
    event: &mut SiegeEvent,
    config: &SiegeConfig,
    bots: &mut dyn BotHost,
    now: Duration,
) {
    let roster: Vec<(ActorId, Role)> = event
        .bots
        .attackers
        .iter()
        .map(|&b| (b, Role::Attacker))
        .chain(event.bots.defenders.iter().map(|&b| (b, Role::Defender)))
        .collect();
    for (bot, role) in roster {
        if !bots.is_alive(bot) && !event.bots.queued_dead.contains(&bot) {
            event.bots.queued_dead.insert(bot);
            event.bots.pending.push((bot, role, now));
        }
    }

    let delay = Duration::from_secs(config.bots.respawn_secs);
    let mut i = 0;
    while i < event.bots.pending.len() {
        let (bot, role, died_at) = event.bots.pending[i];
        if now < died_at + delay {
            i += 1;
            continue;
        }
        bots.revive_at(bot, event.city.map, side_anchor(event, role));
        bots.assign_combat_duty(bot, side_faction(event, role).opponent());
        event.bots.queued_dead.remove(&bot);
        event.bots.pending.remove(i);
    }
}

/// Hand every drafted agent back its pre-siege state. Agents the host
/// cannot restore (dead, mid-teleport, instanced) are skipped for good.
pub(crate) fn release(event: &mut SiegeEvent, bots: &mut dyn BotHost) {
    for (bot, snapshot) in event.bots.snapshots.drain() {
        if !bots.restore(bot, &snapshot) {
            warn!(city = %event.city.name, ?bot, "bot not restorable, skipped");
        }
    }
    event.bots.attackers.clear();
    event.bots.defenders.clear();
    event.bots.pending.clear();
    event.bots.queued_dead.clear();
}

fn side_faction(event: &SiegeEvent, role: Role) -> Faction {
    match role {
        Role::Attacker => event.attacking_faction,
        Role::Defender => event.city.faction,
    }
}

fn side_anchor(event: &SiegeEvent, role: Role) -> rampart_protocol::Position {
    match role {
        Role::Attacker => event.city.spawn,
        Role::Defender => event.city.objective,
    }
}
