//! Initial formation placement.
//!
//! Attackers assemble in four concentric ranks around the city's spawn
//! anchor, leader innermost; defenders form a single ring around the
//! objective. A slot the world cannot place is skipped, never fatal.

use std::f32::consts::TAU;

use rampart_protocol::{ActorId, ActorKindId, Position, Progress, Role, Tier};
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::config::SiegeConfig;
use crate::event::{EventRoster, SiegeEvent, UnitTemplate};
use crate::rng::GameRng;
use crate::world::{SpawnRequest, World};

/// Spawn one siege unit at a point, grounded and passive.
pub(crate) fn spawn_unit(
    world: &mut dyn World,
    event: &SiegeEvent,
    template: UnitTemplate,
    tier: Tier,
    role: Role,
    position: Position,
) -> Option<ActorId> {
    let faction = match role {
        Role::Attacker => event.attacking_faction,
        Role::Defender => event.city.faction,
    };
    let request = SpawnRequest {
        kind: template.kind,
        map: event.city.map,
        position,
        faction,
        tier,
        level: template.level,
        scale: template.scale,
    };
    let actor = world.spawn(&request)?;
    world.set_grounded(actor);
    world.set_aggressive(actor, false);
    world.set_home(actor, position);
    Some(actor)
}

/// Populate a freshly created event with its full formation. Resolves the
/// spawnable identities into the event's roster and records the chosen
/// attacking leader for dialogue.
pub(crate) fn populate(
    event: &mut SiegeEvent,
    catalog: &Catalog,
    config: &SiegeConfig,
    world: &mut dyn World,
    rng: &mut GameRng,
) {
    let force = catalog.force(event.attacking_faction);
    let garrison = catalog.force(event.city.faction);
    let formation = &config.formation;

    let template = |kind: ActorKindId| {
        let t = catalog.kind(kind);
        UnitTemplate {
            kind,
            level: t.level,
            scale: t.scale,
        }
    };

    // One leader identity per siege, drawn from the faction pool.
    let leader_kind = rng.pick(&force.leaders).copied();
    event.leader_name = leader_kind
        .map(|k| catalog.kind(k).name.clone())
        .unwrap_or_else(|| "the invaders".to_owned());

    let leader = leader_kind.map(|k| template(k));
    let commander = template(force.commander);
    let elite = template(force.elite);
    let minion = template(force.minion);
    let defender = template(garrison.defender);
    event.roster = EventRoster {
        leader,
        commander: Some(commander),
        elite: Some(elite),
        minion: Some(minion),
        defender: Some(defender),
    };

    if let Some(leader) = leader {
        place_rank(event, world, leader, Tier::Leader, Role::Attacker, 1, formation.leader_ring);
    } else {
        warn!(city = %event.city.name, "no leader configured for attacking faction");
    }
    place_rank(
        event, world,
        commander, Tier::Commander, Role::Attacker,
        formation.commanders, formation.commander_ring,
    );
    place_rank(
        event, world,
        elite, Tier::Elite, Role::Attacker,
        formation.elites, formation.elite_ring,
    );
    place_rank(
        event, world,
        minion, Tier::Minion, Role::Attacker,
        formation.minions, formation.minion_ring,
    );
    place_rank(
        event, world,
        defender, Tier::Defender, Role::Defender,
        formation.defenders, formation.defender_ring,
    );

    debug!(
        city = %event.city.name,
        attackers = event.attackers.len(),
        defenders = event.defenders.len(),
        "formation placed"
    );
}

fn place_rank(
    event: &mut SiegeEvent,
    world: &mut dyn World,
    template: UnitTemplate,
    tier: Tier,
    role: Role,
    count: u32,
    radius: f32,
) {
    let anchor = match role {
        Role::Attacker => event.city.spawn,
        Role::Defender => event.city.objective,
    };
    let waypoint_count = event.city.waypoints.len();

    for i in 0..count {
        let position = ring_position(world, event, anchor, radius, i, count);
        match spawn_unit(world, event, template, tier, role, position) {
            Some(actor) => {
                let progress = match role {
                    Role::Attacker => Progress::start_attacker(),
                    Role::Defender => Progress::start_defender(waypoint_count),
                };
                match role {
                    Role::Attacker => event.attackers.push(actor),
                    Role::Defender => event.defenders.push(actor),
                }
                event.tiers.insert(actor, tier);
                event.progress.insert(actor, progress);
            }
            None => {
                // Partial formations are tolerated.
                warn!(
                    city = %event.city.name,
                    ?tier,
                    slot = i,
                    "could not place siege unit, slot skipped"
                );
            }
        }
    }
}

/// Evenly distributed ring slot, snapped to terrain height.
fn ring_position(
    world: &dyn World,
    event: &SiegeEvent,
    anchor: Position,
    radius: f32,
    i: u32,
    count: u32,
) -> Position {
    let angle = TAU * i as f32 / count.max(1) as f32;
    let x = anchor.x + radius * angle.cos();
    let y = anchor.y + radius * angle.sin();
    let z = world
        .ground_height(event.city.map, x, y, anchor.z)
        .unwrap_or(anchor.z);
    Position::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_slots_are_evenly_spread() {
        let anchor = Position::new(100.0, 200.0, 10.0);
        let count = 8;
        let radius = 35.0_f32;
        let mut positions = Vec::new();
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32;
            positions.push(Position::new(
                anchor.x + radius * angle.cos(),
                anchor.y + radius * angle.sin(),
                anchor.z,
            ));
        }
        // Every slot sits on the ring.
        for p in &positions {
            assert!((p.distance_2d(&anchor) - radius).abs() < 1e-3);
        }
        // Adjacent slots are equidistant.
        let gap = positions[0].distance_2d(&positions[1]);
        for pair in positions.windows(2) {
            assert!((pair[0].distance_2d(&pair[1]) - gap).abs() < 1e-3);
        }
    }
}
