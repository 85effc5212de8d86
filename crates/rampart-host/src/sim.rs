//! In-memory world backend.
//!
//! Implements the engine's `World` trait over a flat, deterministic toy
//! world: actors move toward their target at a fixed speed, terrain height
//! is whatever the caller hints, and deliveries are recorded so tests can
//! assert on them. The binary uses it as a demo host; the integration
//! tests use it as the harness.

use std::collections::HashMap;
use std::time::Duration;

use rampart_core::{BotHost, BotSnapshot, PlayerInfo, SpawnRequest, World};
use rampart_protocol::{
    ActorId, ActorKindId, Faction, MapId, MusicCue, Notice, PlayerId, Position, Tier, WeatherKind,
    WeatherState, ZoneId,
};

/// Movement speed for simulated actors, units per second.
const RUN_SPEED: f32 = 7.0;

#[derive(Clone, Debug)]
pub struct SimActor {
    pub kind: ActorKindId,
    pub map: MapId,
    pub position: Position,
    pub faction: Faction,
    pub tier: Tier,
    pub level: u8,
    pub alive: bool,
    pub health: f32,
    pub target: Option<Position>,
    pub in_combat: bool,
    pub aggressive: bool,
    pub hostile_toward: Option<Faction>,
    pub home: Option<Position>,
}

struct Slot {
    generation: u32,
    actor: Option<SimActor>,
}

#[derive(Clone, Debug)]
pub struct SimPlayer {
    pub map: MapId,
    pub info: PlayerInfo,
}

/// Deterministic world stand-in. Public fields are test observation points.
#[derive(Default)]
pub struct SimWorld {
    slots: Vec<Slot>,
    players: Vec<SimPlayer>,
    weather: HashMap<ZoneId, WeatherState>,
    /// When set, `spawn` refuses every request (spawn-failure injection).
    pub deny_spawns: bool,
    /// Recorded notices: `None` recipient means a global broadcast.
    pub notices: Vec<(Option<PlayerId>, Notice)>,
    pub yells: Vec<(ActorId, String)>,
    pub music: Vec<(ZoneId, MusicCue)>,
    pub honor_granted: HashMap<PlayerId, u32>,
    pub gold_granted: HashMap<PlayerId, u32>,
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance simulated movement by `dt`.
    pub fn step(&mut self, dt: Duration) {
        let travel = RUN_SPEED * dt.as_secs_f32();
        for slot in &mut self.slots {
            let Some(actor) = slot.actor.as_mut() else {
                continue;
            };
            let Some(target) = actor.target else { continue };
            if !actor.alive {
                continue;
            }
            let distance = actor.position.distance(&target);
            if distance <= travel {
                actor.position = target;
                actor.target = None;
            } else {
                let t = travel / distance;
                actor.position = Position::new(
                    actor.position.x + (target.x - actor.position.x) * t,
                    actor.position.y + (target.y - actor.position.y) * t,
                    actor.position.z + (target.z - actor.position.z) * t,
                );
            }
        }
    }

    /// Place a permanent actor (e.g. a city leader) outside any siege.
    pub fn place_fixture(
        &mut self,
        kind: ActorKindId,
        map: MapId,
        position: Position,
        faction: Faction,
        level: u8,
    ) -> ActorId {
        self.insert(SimActor {
            kind,
            map,
            position,
            faction,
            tier: Tier::Leader,
            level,
            alive: true,
            health: 1.0,
            target: None,
            in_combat: false,
            aggressive: false,
            hostile_toward: None,
            home: None,
        })
    }

    pub fn add_player(&mut self, map: MapId, info: PlayerInfo) {
        self.players.push(SimPlayer { map, info });
    }

    pub fn kill(&mut self, actor: ActorId) {
        if let Some(a) = self.actor_mut(actor) {
            a.alive = false;
            a.health = 0.0;
            a.target = None;
        }
    }

    pub fn set_in_combat(&mut self, actor: ActorId, in_combat: bool) {
        if let Some(a) = self.actor_mut(actor) {
            a.in_combat = in_combat;
        }
    }

    pub fn actor(&self, id: ActorId) -> Option<&SimActor> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.actor.as_ref()
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut SimActor> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.actor.as_mut()
    }

    pub fn actor_count(&self) -> usize {
        self.slots.iter().filter(|s| s.actor.is_some()).count()
    }

    fn insert(&mut self, actor: SimActor) -> ActorId {
        // Reuse the first free slot, bumping its generation.
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.actor.is_none() {
                slot.generation += 1;
                slot.actor = Some(actor);
                return ActorId::new(index as u32, slot.generation);
            }
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            actor: Some(actor),
        });
        ActorId::new(index, 0)
    }
}

/// Simulated autonomous agent, observable by tests.
#[derive(Clone, Debug)]
pub struct SimBot {
    pub map: MapId,
    pub position: Position,
    pub faction: Faction,
    pub level: u8,
    pub alive: bool,
    pub pvp_flagged: bool,
    pub roam_mode: String,
    /// `Some(enemy)` while under siege combat duty, `None` when roaming.
    pub combat_duty: Option<Faction>,
}

/// In-memory `BotHost`. Bot ids are plain indices (generation 0); bots are
/// never removed, so ids stay valid for a test's lifetime.
#[derive(Default)]
pub struct SimBotHost {
    bots: Vec<SimBot>,
}

impl SimBotHost {
    pub fn add_bot(&mut self, faction: Faction, level: u8, map: MapId, position: Position) -> ActorId {
        let id = ActorId::new(self.bots.len() as u32, 0);
        self.bots.push(SimBot {
            map,
            position,
            faction,
            level,
            alive: true,
            pvp_flagged: false,
            roam_mode: "wander".to_owned(),
            combat_duty: None,
        });
        id
    }

    pub fn bot(&self, id: ActorId) -> Option<&SimBot> {
        self.bots.get(id.index as usize)
    }

    pub fn kill(&mut self, id: ActorId) {
        if let Some(b) = self.bots.get_mut(id.index as usize) {
            b.alive = false;
        }
    }
}

impl BotHost for SimBotHost {
    fn candidates(&self, faction: Faction, min_level: u8) -> Vec<ActorId> {
        self.bots
            .iter()
            .enumerate()
            .filter(|(_, b)| b.faction == faction && b.level >= min_level && b.alive)
            .map(|(i, _)| ActorId::new(i as u32, 0))
            .collect()
    }

    fn snapshot(&self, bot: ActorId) -> Option<BotSnapshot> {
        self.bot(bot).map(|b| BotSnapshot {
            map: b.map,
            position: b.position,
            pvp_flagged: b.pvp_flagged,
            roam_mode: b.roam_mode.clone(),
        })
    }

    fn teleport(&mut self, bot: ActorId, map: MapId, position: Position) {
        if let Some(b) = self.bots.get_mut(bot.index as usize) {
            b.map = map;
            b.position = position;
        }
    }

    fn assign_combat_duty(&mut self, bot: ActorId, enemy: Faction) {
        if let Some(b) = self.bots.get_mut(bot.index as usize) {
            b.combat_duty = Some(enemy);
        }
    }

    fn is_alive(&self, bot: ActorId) -> bool {
        self.bot(bot).is_some_and(|b| b.alive)
    }

    fn revive_at(&mut self, bot: ActorId, map: MapId, position: Position) {
        if let Some(b) = self.bots.get_mut(bot.index as usize) {
            b.alive = true;
            b.map = map;
            b.position = position;
        }
    }

    fn restore(&mut self, bot: ActorId, snapshot: &BotSnapshot) -> bool {
        let Some(b) = self.bots.get_mut(bot.index as usize) else {
            return false;
        };
        if !b.alive {
            return false;
        }
        b.map = snapshot.map;
        b.position = snapshot.position;
        b.pvp_flagged = snapshot.pvp_flagged;
        b.roam_mode = snapshot.roam_mode.clone();
        b.combat_duty = None;
        true
    }
}

impl World for SimWorld {
    fn spawn(&mut self, request: &SpawnRequest) -> Option<ActorId> {
        if self.deny_spawns {
            return None;
        }
        Some(self.insert(SimActor {
            kind: request.kind,
            map: request.map,
            position: request.position,
            faction: request.faction,
            tier: request.tier,
            level: request.level,
            alive: true,
            health: 1.0,
            target: None,
            in_combat: false,
            aggressive: false,
            hostile_toward: None,
            home: None,
        }))
    }

    fn despawn(&mut self, actor: ActorId) {
        if let Some(slot) = self.slots.get_mut(actor.index as usize) {
            if slot.generation == actor.generation {
                slot.actor = None;
            }
        }
    }

    fn revive(&mut self, actor: ActorId) {
        if let Some(a) = self.actor_mut(actor) {
            a.alive = true;
            a.health = 1.0;
            a.in_combat = false;
            a.target = None;
        }
    }

    fn exists(&self, actor: ActorId) -> bool {
        self.actor(actor).is_some()
    }

    fn is_alive(&self, actor: ActorId) -> bool {
        self.actor(actor).is_some_and(|a| a.alive)
    }

    fn health_fraction(&self, actor: ActorId) -> Option<f32> {
        self.actor(actor).map(|a| a.health)
    }

    fn position(&self, actor: ActorId) -> Option<Position> {
        self.actor(actor).map(|a| a.position)
    }

    fn move_to(&mut self, actor: ActorId, target: Position) {
        if let Some(a) = self.actor_mut(actor) {
            if a.alive {
                a.target = Some(target);
            }
        }
    }

    fn is_moving(&self, actor: ActorId) -> bool {
        self.actor(actor).is_some_and(|a| a.target.is_some())
    }

    fn in_combat(&self, actor: ActorId) -> bool {
        self.actor(actor).is_some_and(|a| a.in_combat)
    }

    fn set_home(&mut self, actor: ActorId, home: Position) {
        if let Some(a) = self.actor_mut(actor) {
            a.home = Some(home);
        }
    }

    fn set_hostile_toward(&mut self, actor: ActorId, faction: Faction) {
        if let Some(a) = self.actor_mut(actor) {
            a.hostile_toward = Some(faction);
        }
    }

    fn set_aggressive(&mut self, actor: ActorId, aggressive: bool) {
        if let Some(a) = self.actor_mut(actor) {
            a.aggressive = aggressive;
        }
    }

    fn set_grounded(&mut self, _actor: ActorId) {
        // The toy world has no flight.
    }

    fn ground_height(&self, _map: MapId, _x: f32, _y: f32, z_hint: f32) -> Option<f32> {
        // Flat world: the hint is the ground.
        Some(z_hint)
    }

    fn find_kind_near(
        &self,
        map: MapId,
        kind: ActorKindId,
        center: Position,
        radius: f32,
    ) -> Option<ActorId> {
        self.slots.iter().enumerate().find_map(|(index, slot)| {
            let actor = slot.actor.as_ref()?;
            if actor.kind == kind
                && actor.map == map
                && actor.alive
                && actor.position.distance(&center) <= radius
            {
                Some(ActorId::new(index as u32, slot.generation))
            } else {
                None
            }
        })
    }

    fn players_within(&self, map: MapId, center: Position, radius: f32) -> Vec<PlayerInfo> {
        self.players
            .iter()
            .filter(|p| p.map == map && p.info.position.distance(&center) <= radius)
            .map(|p| p.info.clone())
            .collect()
    }

    fn all_players(&self) -> Vec<PlayerInfo> {
        self.players.iter().map(|p| p.info.clone()).collect()
    }

    fn send_notice(&mut self, player: PlayerId, notice: &Notice) {
        self.notices.push((Some(player), notice.clone()));
    }

    fn broadcast(&mut self, notice: &Notice) {
        self.notices.push((None, notice.clone()));
    }

    fn yell(&mut self, actor: ActorId, line: &str) {
        self.yells.push((actor, line.to_owned()));
    }

    fn grant_honor(&mut self, player: PlayerId, amount: u32) {
        *self.honor_granted.entry(player).or_default() += amount;
    }

    fn grant_gold(&mut self, player: PlayerId, copper: u32) {
        *self.gold_granted.entry(player).or_default() += copper;
    }

    fn weather(&self, zone: ZoneId) -> WeatherState {
        self.weather.get(&zone).copied().unwrap_or(WeatherState {
            kind: WeatherKind::Fine,
            intensity: 0.0,
        })
    }

    fn set_weather(&mut self, zone: ZoneId, weather: WeatherState) {
        self.weather.insert(zone, weather);
    }

    fn play_music(&mut self, zone: ZoneId, cue: MusicCue) {
        self.music.push((zone, cue));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actors_walk_to_their_target() {
        let mut world = SimWorld::new();
        let id = world.place_fixture(
            ActorKindId::new(0),
            MapId(0),
            Position::default(),
            Faction::Coalition,
            60,
        );
        world.move_to(id, Position::new(70.0, 0.0, 0.0));
        assert!(world.is_moving(id));

        world.step(Duration::from_secs(5));
        let midway = world.position(id).unwrap();
        assert!(midway.x > 30.0 && midway.x < 40.0);

        world.step(Duration::from_secs(10));
        assert_eq!(world.position(id).unwrap().x, 70.0);
        assert!(!world.is_moving(id));
    }

    #[test]
    fn dead_bots_are_not_restorable() {
        let mut host = SimBotHost::default();
        let id = host.add_bot(Faction::Dominion, 60, MapId(0), Position::default());
        let snap = host.snapshot(id).unwrap();

        host.teleport(id, MapId(1), Position::new(5.0, 0.0, 0.0));
        host.kill(id);
        assert!(!host.restore(id, &snap));

        host.revive_at(id, MapId(1), Position::default());
        assert!(host.restore(id, &snap));
        assert_eq!(host.bot(id).unwrap().map, MapId(0));
        assert!(host.bot(id).unwrap().combat_duty.is_none());
    }

    #[test]
    fn generations_invalidate_stale_ids() {
        let mut world = SimWorld::new();
        let first = world.place_fixture(
            ActorKindId::new(0),
            MapId(0),
            Position::default(),
            Faction::Coalition,
            60,
        );
        world.despawn(first);
        let second = world.place_fixture(
            ActorKindId::new(0),
            MapId(0),
            Position::default(),
            Faction::Coalition,
            60,
        );
        // Same slot, new generation: the old handle must not resolve.
        assert_eq!(first.index, second.index);
        assert!(!world.exists(first));
        assert!(world.exists(second));
    }
}
