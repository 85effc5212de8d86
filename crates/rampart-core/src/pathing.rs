//! Waypoint advance/retreat pathing.
//!
//! Attackers walk the city path forward (index 0..=N, N meaning the
//! objective anchor); defenders walk it backward toward the spawn anchor.
//! Move targets get a small horizontal jitter so units do not stack, but
//! the Z coordinate is always the authored waypoint Z. Terrain lookups are
//! deliberately not used here; re-deriving Z sends paths underground.

use std::f32::consts::TAU;

use rampart_protocol::{ActorId, Position, Progress, Role};

use crate::catalog::CityDefinition;
use crate::config::SiegeConfig;
use crate::rng::GameRng;
use crate::world::World;

/// The point a participant is currently walking toward.
pub fn current_target(city: &CityDefinition, progress: &Progress) -> Position {
    let n = city.waypoints.len();
    match progress.role {
        Role::Attacker => {
            if progress.index < n {
                city.waypoints[progress.index]
            } else {
                city.objective
            }
        }
        Role::Defender => {
            if progress.index > 0 {
                city.waypoints[progress.index - 1]
            } else {
                city.spawn
            }
        }
    }
}

/// Advance one participant along its path. Call once per live participant
/// per tick. In-combat, mid-move, and arrived units are left untouched.
pub fn advance(
    world: &mut dyn World,
    rng: &mut GameRng,
    city: &CityDefinition,
    config: &SiegeConfig,
    actor: ActorId,
    progress: &mut Progress,
) {
    if progress.arrived || world.in_combat(actor) {
        return;
    }
    let Some(position) = world.position(actor) else {
        return;
    };

    let target = current_target(city, progress);
    if position.distance(&target) > config.arrival_radius {
        // Not there yet; issue a move only if the last one finished.
        if !world.is_moving(actor) {
            issue_move(world, rng, config, actor, target);
        }
        return;
    }

    // Arrived at the current target: step the index, or finish.
    let n = city.waypoints.len();
    match progress.role {
        Role::Attacker => {
            if progress.index < n {
                progress.index += 1;
            } else {
                progress.arrived = true;
            }
        }
        Role::Defender => {
            if progress.index > 0 {
                progress.index -= 1;
            } else {
                progress.arrived = true;
            }
        }
    }
    if !progress.arrived {
        let next = current_target(city, progress);
        issue_move(world, rng, config, actor, next);
    }
}

/// Command a move toward `target` with horizontal-only jitter, and pin the
/// unit's home to the target so leashing cannot drag it back.
fn issue_move(
    world: &mut dyn World,
    rng: &mut GameRng,
    config: &SiegeConfig,
    actor: ActorId,
    target: Position,
) {
    let radius = config.jitter_radius * rng.next_f32();
    let angle = TAU * rng.next_f32();
    let jittered = Position::new(
        target.x + radius * angle.cos(),
        target.y + radius * angle.sin(),
        target.z,
    );
    world.set_home(actor, jittered);
    world.move_to(actor, jittered);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city_with_path() -> CityDefinition {
        use rampart_protocol::{ActorKindId, CityId, Faction, MapId, ZoneId};
        CityDefinition {
            id: CityId::new(0),
            name: "Testgate".into(),
            faction: Faction::Coalition,
            map: MapId(0),
            zone: ZoneId(1),
            leader_kind: ActorKindId::new(0),
            spawn: Position::new(0.0, 0.0, 5.0),
            objective: Position::new(300.0, 0.0, 9.0),
            announce: Position::new(150.0, 0.0, 5.0),
            waypoints: vec![
                Position::new(100.0, 0.0, 6.0),
                Position::new(200.0, 0.0, 7.0),
            ],
            enabled: true,
        }
    }

    #[test]
    fn attacker_targets_run_forward_to_objective() {
        let city = city_with_path();
        let mut p = Progress::start_attacker();
        assert_eq!(current_target(&city, &p), city.waypoints[0]);
        p.index = 1;
        assert_eq!(current_target(&city, &p), city.waypoints[1]);
        p.index = 2;
        assert_eq!(current_target(&city, &p), city.objective);
    }

    #[test]
    fn defender_targets_run_backward_to_spawn() {
        let city = city_with_path();
        let mut p = Progress::start_defender(city.waypoints.len());
        assert_eq!(current_target(&city, &p), city.waypoints[1]);
        p.index = 1;
        assert_eq!(current_target(&city, &p), city.waypoints[0]);
        p.index = 0;
        assert_eq!(current_target(&city, &p), city.spawn);
    }

    #[test]
    fn empty_path_goes_straight_to_terminal() {
        let mut city = city_with_path();
        city.waypoints.clear();
        let attacker = Progress::start_attacker();
        assert_eq!(current_target(&city, &attacker), city.objective);
        let defender = Progress::start_defender(0);
        assert_eq!(current_target(&city, &defender), city.spawn);
    }
}
