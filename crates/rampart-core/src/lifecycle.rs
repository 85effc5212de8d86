//! Per-event phase machine: cinematic playback, combat, resolution.
//!
//! Ordering inside one tick matters: the cinematic/countdown checks run
//! first, and in Combat the objective-death check runs before the timeout
//! check, so a leader kill on the final tick still counts for the
//! attackers. Pathing and respawns only run if the event survived the
//! phase checks this tick.

use std::time::Duration;

use rampart_protocol::{ActorId, Faction, MusicCue, Notice, SiegePhase, Tier, Winner};
use tracing::{info, warn};

use crate::bots;
use crate::config::SiegeConfig;
use crate::event::SiegeEvent;
use crate::pathing;
use crate::respawn;
use crate::rewards;
use crate::rng::GameRng;
use crate::script::{self, ScriptBook};
use crate::world::{BotHost, World};

// Countdown one-shots fire when remaining cinematic time crosses these.
const COUNTDOWN_FRACTIONS: [f32; 3] = [0.75, 0.50, 0.25];

pub(crate) fn tick_event(
    event: &mut SiegeEvent,
    config: &SiegeConfig,
    scripts: &ScriptBook,
    rng: &mut GameRng,
    world: &mut dyn World,
    mut bot_host: Option<&mut (dyn BotHost + '_)>,
    now: Duration,
) {
    match event.phase {
        SiegePhase::Warning | SiegePhase::Resolved => {}
        SiegePhase::Cinematic => {
            tick_cinematic(event, config, world, rng, now);
        }
        SiegePhase::Combat => {
            tick_combat(event, config, scripts, rng, world, &mut bot_host, now);
        }
    }
}

fn tick_cinematic(
    event: &mut SiegeEvent,
    config: &SiegeConfig,
    world: &mut dyn World,
    rng: &mut GameRng,
    now: Duration,
) {
    let elapsed = now.saturating_sub(event.started);
    let remaining = event.cinematic_delay.saturating_sub(elapsed);

    // 75/50/25% countdowns, each at most once per siege and at most one
    // broadcast per tick even when ticks are sparse.
    for (i, fraction) in COUNTDOWN_FRACTIONS.iter().enumerate() {
        if event.countdown_fired[i] {
            continue;
        }
        let threshold = event.cinematic_delay.mul_f32(*fraction);
        if remaining <= threshold {
            event.countdown_fired[i] = true;
            announce(
                event,
                config,
                world,
                &Notice::Countdown {
                    city: event.city.name.clone(),
                    seconds_left: remaining.as_secs(),
                },
            );
        }
        break;
    }

    // Scripted dialogue, one line per cadence interval.
    if now >= event.next_yell && event.script_cursor < event.script.len() {
        if let Some(speaker) = pick_speaker(event, world, rng) {
            let line = script::substitute(
                &event.script[event.script_cursor],
                &event.leader_name,
                &event.city.name,
            );
            world.yell(speaker, &line);
            event.script_cursor += 1;
        }
        event.next_yell = now + config.yell_cadence();
    }

    if elapsed >= event.cinematic_delay {
        begin_combat(event, config, world, rng, now);
    }
}

/// Lift passivity, make both sides hostile, and issue the first move
/// commands.
fn begin_combat(
    event: &mut SiegeEvent,
    config: &SiegeConfig,
    world: &mut dyn World,
    rng: &mut GameRng,
    now: Duration,
) {
    for &actor in &event.attackers {
        world.set_hostile_toward(actor, event.city.faction);
        world.set_aggressive(actor, true);
    }
    for &actor in &event.defenders {
        world.set_hostile_toward(actor, event.attacking_faction);
        world.set_aggressive(actor, true);
    }

    event.phase = SiegePhase::Combat;
    event.next_yell = now + config.yell_cadence();
    event.next_status = now + config.status_cadence();

    // First pathing commands go out at the transition itself, not on the
    // following tick.
    advance_paths(event, config, world, rng);

    announce(
        event,
        config,
        world,
        &Notice::BattleJoined {
            city: event.city.name.clone(),
        },
    );
    world.play_music(event.city.zone, MusicCue::BattleBegins);
    info!(city = %event.city.name, "siege entered combat phase");
}

#[allow(clippy::too_many_arguments)]
fn tick_combat(
    event: &mut SiegeEvent,
    config: &SiegeConfig,
    scripts: &ScriptBook,
    rng: &mut GameRng,
    world: &mut dyn World,
    bot_host: &mut Option<&mut (dyn BotHost + '_)>,
    now: Duration,
) {
    // Win conditions first; objective death beats timeout in a tie.
    if let Some(objective) = event.objective {
        if !world.exists(objective) || !world.is_alive(objective) {
            resolve(event, config, world, bot_host.as_deref_mut(), Winner::Attackers, now);
            return;
        }
    }
    if now >= event.ends {
        resolve(event, config, world, bot_host.as_deref_mut(), Winner::Defenders, now);
        return;
    }

    // Combat taunts.
    if now >= event.next_yell {
        if let (Some(speaker), Some(taunt)) = (
            pick_speaker(event, world, rng),
            scripts.pick_taunt(event.attacking_faction, rng),
        ) {
            let line = script::substitute(&taunt, &event.leader_name, &event.city.name);
            world.yell(speaker, &line);
        }
        event.next_yell = now + config.yell_cadence();
    }

    // Periodic status broadcast.
    if now >= event.next_status {
        let leader_health_pct = event
            .objective
            .and_then(|obj| world.health_fraction(obj))
            .map(|f| (f * 100.0).round() as u32);
        announce(
            event,
            config,
            world,
            &Notice::Status {
                city: event.city.name.clone(),
                minutes_left: event.time_remaining(now).as_secs() / 60,
                leader_health_pct,
            },
        );
        event.next_status = now + config.status_cadence();
    }

    sweep_deaths(event, world, now);
    advance_paths(event, config, world, rng);
    respawn::process(event, config, world, now);

    if let Some(bots_ref) = bot_host.as_deref_mut() {
        bots::tick(event, config, bots_ref, now);
    }
}

/// One pathing pass over everyone still standing.
fn advance_paths(
    event: &mut SiegeEvent,
    config: &SiegeConfig,
    world: &mut dyn World,
    rng: &mut GameRng,
) {
    let participants: Vec<ActorId> = event.participants().collect();
    for actor in participants {
        if !world.is_alive(actor) {
            continue;
        }
        if let Some(mut progress) = event.progress.get(&actor).copied() {
            pathing::advance(world, rng, &event.city, config, actor, &mut progress);
            event.progress.insert(actor, progress);
        }
    }
}

/// Queue deaths for respawn; drop stale references that already finished
/// their path.
fn sweep_deaths(event: &mut SiegeEvent, world: &mut dyn World, now: Duration) {
    let participants: Vec<ActorId> = event.participants().collect();
    for actor in participants {
        if !world.exists(actor) {
            let terminal = event.progress.get(&actor).is_some_and(|p| p.arrived);
            if terminal {
                // Despawned externally after finishing its path; just
                // forget it.
                event.attackers.retain(|&a| a != actor);
                event.defenders.retain(|&a| a != actor);
                event.tiers.remove(&actor);
                event.progress.remove(&actor);
            } else {
                respawn::note_death(event, actor, now);
            }
        } else if !world.is_alive(actor) {
            respawn::note_death(event, actor, now);
        }
    }
}

/// Compute the outcome, pay out, and tear the siege down. The event record
/// stays around (phase Resolved) until the retention window passes.
pub(crate) fn resolve(
    event: &mut SiegeEvent,
    config: &SiegeConfig,
    world: &mut dyn World,
    bot_host: Option<&mut (dyn BotHost + '_)>,
    winner: Winner,
    now: Duration,
) {
    event.outcome = Some(winner);
    event.phase = SiegePhase::Resolved;
    event.resolved_at = Some(now);

    announce(
        event,
        config,
        world,
        &Notice::SiegeOver {
            city: event.city.name.clone(),
            winner,
        },
    );
    let winning_faction = match winner {
        Winner::Attackers => event.attacking_faction,
        Winner::Defenders => event.city.faction,
    };
    let cue = match winning_faction {
        Faction::Coalition => MusicCue::CoalitionVictory,
        Faction::Dominion => MusicCue::DominionVictory,
    };
    world.play_music(event.city.zone, cue);

    rewards::dispatch(event, config, world, winner);
    teardown(event, world, bot_host);

    info!(city = %event.city.name, ?winner, "siege resolved");
}

/// Despawn everything the event owns, restore the environment, and hand
/// bots back. Safe to call more than once.
pub(crate) fn teardown(
    event: &mut SiegeEvent,
    world: &mut dyn World,
    bot_host: Option<&mut (dyn BotHost + '_)>,
) {
    // A fallen city leader comes back once the siege is over, so later
    // sieges on this city still find their objective.
    if let Some(objective) = event.objective {
        if world.exists(objective) && !world.is_alive(objective) {
            world.revive(objective);
        }
    }

    for actor in event.participants().collect::<Vec<_>>() {
        if world.exists(actor) {
            world.despawn(actor);
        }
    }
    event.attackers.clear();
    event.defenders.clear();
    event.tiers.clear();
    event.progress.clear();
    event.respawn_queue.clear();
    event.queued_dead.clear();

    if let Some(weather) = event.weather_before.take() {
        world.set_weather(event.city.zone, weather);
    }
    if let Some(bots_ref) = bot_host {
        bots::release(event, bots_ref);
    } else if !event.bots.snapshots.is_empty() {
        warn!(city = %event.city.name, "bot host gone, drafted bots not restored");
    }
}

/// Radius-gated announcement; radius 0 reaches everyone online.
pub(crate) fn announce(
    event: &SiegeEvent,
    config: &SiegeConfig,
    world: &mut dyn World,
    notice: &Notice,
) {
    if config.announce_radius > 0.0 {
        let players =
            world.players_within(event.city.map, event.city.announce, config.announce_radius);
        for player in players {
            world.send_notice(player.id, notice);
        }
    } else {
        world.broadcast(notice);
    }
}

/// A random live leader or commander on the attacking side.
fn pick_speaker(event: &SiegeEvent, world: &dyn World, rng: &mut GameRng) -> Option<ActorId> {
    let eligible: Vec<ActorId> = event
        .attackers
        .iter()
        .copied()
        .filter(|a| {
            matches!(
                event.tiers.get(a),
                Some(Tier::Leader) | Some(Tier::Commander)
            ) && world.is_alive(*a)
        })
        .collect();
    rng.pick(&eligible).copied()
}
