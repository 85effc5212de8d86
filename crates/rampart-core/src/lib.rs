mod bots;
mod catalog;
mod config;
mod engine;
mod event;
mod lifecycle;
mod pathing;
mod respawn;
mod rewards;
mod rng;
mod script;
mod spawner;
mod world;

pub use crate::catalog::*;
pub use crate::config::*;
pub use crate::engine::{AdminError, SiegeEngine};
pub use crate::event::{BotRoster, EventRoster, RespawnEntry, SiegeEvent, UnitTemplate};
pub use crate::pathing::current_target;
pub use crate::rng::GameRng;
pub use crate::script::{substitute, ScriptBook};
pub use crate::world::{BotHost, BotSnapshot, PlayerInfo, SpawnRequest, World};
