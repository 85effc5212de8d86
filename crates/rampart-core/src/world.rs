//! The narrow interface the engine needs from its host world.
//!
//! The engine never touches terrain, combat AI, or message delivery
//! directly; everything goes through this trait. Hosts plug in the real
//! world, tests plug in a simulated one.

use rampart_protocol::{
    ActorId, ActorKindId, Faction, MapId, MusicCue, Notice, PlayerId, Position, Tier, WeatherState,
    ZoneId,
};

/// Parameters for a temporary actor owned by a siege event.
#[derive(Clone, Debug)]
pub struct SpawnRequest {
    pub kind: ActorKindId,
    pub map: MapId,
    pub position: Position,
    pub faction: Faction,
    pub tier: Tier,
    pub level: u8,
    pub scale: f32,
}

/// A player visible to announcement/reward queries.
#[derive(Clone, Debug)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub level: u8,
    pub faction: Faction,
    pub position: Position,
}

/// Host world collaborator. All calls are non-blocking; move commands are
/// fire-and-forget and observed later via [`World::is_moving`].
pub trait World {
    /// Create a temporary actor. `None` means placement failed; the caller
    /// skips or retries, it is never fatal.
    fn spawn(&mut self, request: &SpawnRequest) -> Option<ActorId>;
    fn despawn(&mut self, actor: ActorId);
    /// Bring a dead persistent actor back at full health (city leader
    /// restoration after a lost siege).
    fn revive(&mut self, actor: ActorId);

    /// Does the reference still resolve to an actor at all?
    fn exists(&self, actor: ActorId) -> bool;
    fn is_alive(&self, actor: ActorId) -> bool;
    fn health_fraction(&self, actor: ActorId) -> Option<f32>;
    fn position(&self, actor: ActorId) -> Option<Position>;

    fn move_to(&mut self, actor: ActorId, target: Position);
    fn is_moving(&self, actor: ActorId) -> bool;
    fn in_combat(&self, actor: ActorId) -> bool;
    /// Pin the actor's home so built-in leashing does not pull it back.
    fn set_home(&mut self, actor: ActorId, home: Position);

    fn set_hostile_toward(&mut self, actor: ActorId, faction: Faction);
    fn set_aggressive(&mut self, actor: ActorId, aggressive: bool);
    /// Disable flight/hover so the actor walks the path.
    fn set_grounded(&mut self, actor: ActorId);

    /// Terrain height near (x, y), using `z_hint` to pick the right floor.
    fn ground_height(&self, map: MapId, x: f32, y: f32, z_hint: f32) -> Option<f32>;
    /// Find a live actor of the given kind near a point (objective lookup).
    fn find_kind_near(
        &self,
        map: MapId,
        kind: ActorKindId,
        center: Position,
        radius: f32,
    ) -> Option<ActorId>;

    fn players_within(&self, map: MapId, center: Position, radius: f32) -> Vec<PlayerInfo>;
    fn all_players(&self) -> Vec<PlayerInfo>;
    fn send_notice(&mut self, player: PlayerId, notice: &Notice);
    fn broadcast(&mut self, notice: &Notice);
    /// Make an actor shout a line of dialogue.
    fn yell(&mut self, actor: ActorId, line: &str);

    fn grant_honor(&mut self, player: PlayerId, amount: u32);
    fn grant_gold(&mut self, player: PlayerId, copper: u32);

    fn weather(&self, zone: ZoneId) -> WeatherState;
    fn set_weather(&mut self, zone: ZoneId, weather: WeatherState);
    fn play_music(&mut self, zone: ZoneId, cue: MusicCue);
}

/// Optional autonomous-agent ("bot") capability. The engine runs correctly
/// with this entirely absent.
pub trait BotHost {
    /// Eligible agents: correct faction, at or above the level floor,
    /// alive, not grouped or inside an instance.
    fn candidates(&self, faction: Faction, min_level: u8) -> Vec<ActorId>;
    fn snapshot(&self, bot: ActorId) -> Option<BotSnapshot>;
    fn teleport(&mut self, bot: ActorId, map: MapId, position: Position);
    /// Swap free-roam behavior for hostile engagement against `enemy`.
    fn assign_combat_duty(&mut self, bot: ActorId, enemy: Faction);
    fn is_alive(&self, bot: ActorId) -> bool;
    fn revive_at(&mut self, bot: ActorId, map: MapId, position: Position);
    /// Best-effort restore; `false` means the agent was skipped (dead,
    /// mid-teleport, or inside an unrelated instance).
    fn restore(&mut self, bot: ActorId, snapshot: &BotSnapshot) -> bool;
}

/// Pre-siege agent state, restored verbatim on release.
#[derive(Clone, Debug, PartialEq)]
pub struct BotSnapshot {
    pub map: MapId,
    pub position: Position,
    pub pvp_flagged: bool,
    /// Host-defined autonomous-behavior mode (e.g. a roam strategy name).
    pub roam_mode: String,
}
