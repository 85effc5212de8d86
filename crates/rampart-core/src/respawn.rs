//! Replenishment of fallen participants.
//!
//! Deaths are queued exactly once, FIFO, and applied only after the tier's
//! delay has elapsed. A replacement the world refuses to place stays queued
//! and is retried on a later tick.

use std::time::Duration;

use rampart_protocol::{ActorId, Progress, Role, SiegePhase};
use tracing::debug;

use crate::config::SiegeConfig;
use crate::event::{RespawnEntry, SiegeEvent};
use crate::spawner;
use crate::world::World;

/// Record a participant death. Duplicate reports for the same actor are
/// ignored; so are actors the event no longer tracks (stale references that
/// already left the bookkeeping).
pub(crate) fn note_death(event: &mut SiegeEvent, actor: ActorId, now: Duration) {
    if event.queued_dead.contains(&actor) {
        return;
    }
    let (Some(&tier), Some(role)) = (event.tiers.get(&actor), event.role_of(actor)) else {
        return;
    };
    event.queued_dead.insert(actor);
    event.respawn_queue.push(RespawnEntry {
        actor,
        tier,
        role,
        died_at: now,
    });
    debug!(city = %event.city.name, ?tier, ?role, "participant death queued for respawn");
}

/// Apply every queue entry whose delay has elapsed.
pub(crate) fn process(
    event: &mut SiegeEvent,
    config: &SiegeConfig,
    world: &mut dyn World,
    now: Duration,
) {
    let mut i = 0;
    while i < event.respawn_queue.len() {
        let entry = event.respawn_queue[i];
        if now < entry.died_at + config.respawn_delay(entry.tier) {
            i += 1;
            continue;
        }

        match spawn_replacement(event, world, &entry) {
            Some((new_actor, progress)) => {
                if event.phase == SiegePhase::Combat {
                    let enemy = match entry.role {
                        Role::Attacker => event.city.faction,
                        Role::Defender => event.attacking_faction,
                    };
                    world.set_hostile_toward(new_actor, enemy);
                    world.set_aggressive(new_actor, true);
                }
                event.replace_participant(entry.actor, new_actor, progress);
                event.respawn_queue.remove(i);
                debug!(
                    city = %event.city.name,
                    tier = ?entry.tier,
                    "respawned siege participant"
                );
            }
            None => {
                // Placement failed; keep the entry and retry next tick.
                i += 1;
            }
        }
    }
}

fn spawn_replacement(
    event: &SiegeEvent,
    world: &mut dyn World,
    entry: &RespawnEntry,
) -> Option<(ActorId, Progress)> {
    // Templates come from the event's own roster, never the live catalog,
    // so a reload mid-siege cannot move kind ids under a queued respawn.
    let template = event.roster.for_tier(entry.tier)?;
    let anchor = match entry.role {
        Role::Attacker => event.city.spawn,
        Role::Defender => event.city.objective,
    };

    let actor = spawner::spawn_unit(world, event, template, entry.tier, entry.role, anchor)?;
    let progress = match entry.role {
        Role::Attacker => Progress::start_attacker(),
        Role::Defender => Progress::start_defender(event.city.waypoints.len()),
    };
    Some((actor, progress))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    use rampart_protocol::{ActorKindId, CityId, Faction, MapId, Position, Tier, ZoneId};

    use crate::catalog::CityDefinition;
    use crate::event::{BotRoster, EventRoster};

    fn test_event() -> SiegeEvent {
        let city = CityDefinition {
            id: CityId::new(0),
            name: "Testgate".into(),
            faction: Faction::Coalition,
            map: MapId(0),
            zone: ZoneId(1),
            leader_kind: ActorKindId::new(0),
            spawn: Position::default(),
            objective: Position::new(100.0, 0.0, 0.0),
            announce: Position::default(),
            waypoints: vec![Position::new(50.0, 0.0, 0.0)],
            enabled: true,
        };
        SiegeEvent {
            city,
            attacking_faction: Faction::Dominion,
            phase: SiegePhase::Combat,
            started: Duration::ZERO,
            ends: Duration::from_secs(1800),
            cinematic_delay: Duration::from_secs(150),
            resolved_at: None,
            outcome: None,
            objective: None,
            leader_name: "Warlord".into(),
            roster: EventRoster::default(),
            attackers: Vec::new(),
            defenders: Vec::new(),
            tiers: HashMap::new(),
            progress: HashMap::new(),
            respawn_queue: Vec::new(),
            queued_dead: HashSet::new(),
            countdown_fired: [false; 3],
            next_yell: Duration::ZERO,
            next_status: Duration::ZERO,
            script: Vec::new(),
            script_cursor: 0,
            weather_before: None,
            bots: BotRoster::default(),
        }
    }

    #[test]
    fn deaths_queue_exactly_once() {
        let mut event = test_event();
        let actor = ActorId::new(1, 0);
        event.attackers.push(actor);
        event.tiers.insert(actor, Tier::Minion);
        event.progress.insert(actor, Progress::start_attacker());

        note_death(&mut event, actor, Duration::from_secs(500));
        note_death(&mut event, actor, Duration::from_secs(501));
        assert_eq!(event.respawn_queue.len(), 1);
        assert_eq!(event.respawn_queue[0].died_at, Duration::from_secs(500));
    }

    #[test]
    fn untracked_actor_is_ignored() {
        let mut event = test_event();
        note_death(&mut event, ActorId::new(9, 0), Duration::from_secs(10));
        assert!(event.respawn_queue.is_empty());
    }

    #[test]
    fn replacement_substitutes_in_place() {
        let mut event = test_event();
        let old = ActorId::new(1, 0);
        let other = ActorId::new(2, 0);
        event.attackers.extend([old, other]);
        event.tiers.insert(old, Tier::Minion);
        event.tiers.insert(other, Tier::Elite);
        event.progress.insert(old, Progress::start_attacker());
        event.progress.insert(other, Progress::start_attacker());
        event.queued_dead.insert(old);

        let new = ActorId::new(3, 0);
        event.replace_participant(old, new, Progress::start_attacker());

        assert_eq!(event.attackers, vec![new, other]);
        assert_eq!(event.tiers.get(&new), Some(&Tier::Minion));
        assert!(!event.progress.contains_key(&old));
        assert!(event.progress.contains_key(&new));
        assert!(!event.queued_dead.contains(&old));
    }
}
