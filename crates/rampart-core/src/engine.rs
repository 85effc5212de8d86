//! The owned engine-state object the host ticks.
//!
//! Everything lives here: compiled catalog, tuning, active events, and the
//! scheduler's re-arm timestamp. There are no globals; tests construct
//! isolated engines freely.

use std::time::Duration;

use rampart_protocol::{
    AdminCommand, AdminReply, CityId, Notice, Position, SiegePhase, SiegeSummary, WeatherKind,
    WeatherState, Winner,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::bots;
use crate::catalog::{load_catalog, Catalog, CatalogBundle, CatalogError, CatalogSource};
use crate::config::SiegeConfig;
use crate::event::{BotRoster, EventRoster, SiegeEvent};
use crate::lifecycle;
use crate::rng::GameRng;
use crate::script::ScriptBook;
use crate::spawner;
use crate::world::{BotHost, World};

/// Objective lookup radius around the objective anchor.
const OBJECTIVE_SEARCH_RADIUS: f32 = 100.0;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("unknown city: {0}")]
    UnknownCity(String),
    #[error("city is disabled for sieges: {0}")]
    CityDisabled(String),
    #[error("{0} is already under siege")]
    AlreadyUnderSiege(String),
    #[error("no active siege at {0}")]
    NoActiveSiege(String),
    #[error("no eligible city for a new siege")]
    NoEligibleCity,
    #[error("siege events are disabled")]
    Disabled,
    #[error("reload failed: {0}")]
    Reload(#[from] CatalogError),
}

/// The siege engine. Single-threaded; advance it by calling [`tick`] from
/// the host's update loop.
///
/// [`tick`]: SiegeEngine::tick
pub struct SiegeEngine {
    config: SiegeConfig,
    catalog: Catalog,
    scripts: ScriptBook,
    rng: GameRng,
    /// Where `ReloadConfig` reads from; `None` means the embedded data.
    data_path: Option<String>,
    /// When the scheduler next tries to start a siege. Armed on first tick.
    next_siege_at: Option<Duration>,
    events: Vec<SiegeEvent>,
}

impl SiegeEngine {
    pub fn new(bundle: CatalogBundle, seed: u64) -> Self {
        Self {
            config: bundle.config,
            catalog: bundle.catalog,
            scripts: bundle.scripts,
            rng: GameRng::seed_from_u64(seed),
            data_path: None,
            next_siege_at: None,
            events: Vec::new(),
        }
    }

    /// Read catalog/config from this directory on `ReloadConfig`.
    pub fn set_data_path(&mut self, path: impl Into<String>) {
        self.data_path = Some(path.into());
    }

    pub fn config(&self) -> &SiegeConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn events(&self) -> &[SiegeEvent] {
        &self.events
    }

    pub fn next_siege_at(&self) -> Option<Duration> {
        self.next_siege_at
    }

    /// Advance every active siege, sweep expired records, and let the
    /// scheduler start a new siege if one is due.
    pub fn tick(
        &mut self,
        now: Duration,
        world: &mut dyn World,
        mut bot_host: Option<&mut (dyn BotHost + '_)>,
    ) {
        for event in &mut self.events {
            lifecycle::tick_event(
                event,
                &self.config,
                &self.scripts,
                &mut self.rng,
                world,
                bot_host.as_deref_mut(),
                now,
            );
        }

        // Resolved events linger briefly for observability, then go away.
        let retention = self.config.resolved_retention();
        self.events.retain(|e| match e.resolved_at {
            Some(at) => now.saturating_sub(at) < retention,
            None => true,
        });

        self.run_scheduler(now, world, bot_host);
    }

    fn run_scheduler(
        &mut self,
        now: Duration,
        world: &mut dyn World,
        bot_host: Option<&mut (dyn BotHost + '_)>,
    ) {
        if !self.config.enabled {
            return;
        }
        match self.next_siege_at {
            None => {
                let at = now + self.random_interval();
                info!(seconds = (at - now).as_secs(), "first siege armed");
                self.next_siege_at = Some(at);
            }
            Some(due) if now >= due => {
                match self.pick_eligible_city() {
                    Some(city) => {
                        self.start_event(city, now, world, bot_host);
                    }
                    None => {
                        // No eligible target; skip this round quietly.
                        warn!("siege due but no eligible city, skipping");
                    }
                }
                self.next_siege_at = Some(now + self.random_interval());
            }
            Some(_) => {}
        }
    }

    fn random_interval(&mut self) -> Duration {
        Duration::from_secs(self.rng.gen_range_u64(self.config.siege_interval_secs()))
    }

    fn is_under_siege(&self, city: CityId) -> bool {
        self.events
            .iter()
            .any(|e| e.city.id == city && e.is_active())
    }

    /// Any city currently under an active siege.
    fn active_siege_city(&self) -> Option<&SiegeEvent> {
        self.events.iter().find(|e| e.is_active())
    }

    fn pick_eligible_city(&mut self) -> Option<CityId> {
        // Without multi-siege, one active siege anywhere blocks new ones.
        if !self.config.multi_siege && self.active_siege_city().is_some() {
            return None;
        }
        let eligible: Vec<CityId> = self
            .catalog
            .cities
            .iter()
            .filter(|c| c.enabled && !self.is_under_siege(c.id))
            .map(|c| c.id)
            .collect();
        self.rng.pick(&eligible).copied()
    }

    /// Create, announce, and populate a new siege on `city`.
    fn start_event(
        &mut self,
        city: CityId,
        now: Duration,
        world: &mut dyn World,
        mut bot_host: Option<&mut (dyn BotHost + '_)>,
    ) -> CityId {
        let definition = self.catalog.city(city).clone();

        // Environment override, snapshotting what we replace.
        let weather_before = world.weather(definition.zone);
        world.set_weather(
            definition.zone,
            WeatherState {
                kind: WeatherKind::Storm,
                intensity: 0.75,
            },
        );

        let objective = world.find_kind_near(
            definition.map,
            definition.leader_kind,
            definition.objective,
            OBJECTIVE_SEARCH_RADIUS,
        );
        if objective.is_none() {
            // Siege still runs; timeout resolution will favor defenders.
            warn!(city = %definition.name, "objective actor not found at siege start");
        }

        let attacking_faction = definition.faction.opponent();
        let mut event = SiegeEvent {
            attacking_faction,
            phase: SiegePhase::Warning,
            started: now,
            ends: now + self.config.duration(),
            cinematic_delay: self.config.cinematic_delay(),
            resolved_at: None,
            outcome: None,
            objective,
            leader_name: String::new(),
            roster: EventRoster::default(),
            attackers: Vec::new(),
            defenders: Vec::new(),
            tiers: Default::default(),
            progress: Default::default(),
            respawn_queue: Vec::new(),
            queued_dead: Default::default(),
            countdown_fired: [false; 3],
            next_yell: now,
            next_status: now,
            script: self.scripts.pick_script(attacking_faction, &mut self.rng),
            script_cursor: 0,
            weather_before: Some(weather_before),
            bots: BotRoster::default(),
            city: definition,
        };

        lifecycle::announce(
            &event,
            &self.config,
            world,
            &Notice::SiegeWarning {
                city: event.city.name.clone(),
            },
        );
        world.play_music(event.city.zone, rampart_protocol::MusicCue::CinematicIntro);

        spawner::populate(&mut event, &self.catalog, &self.config, world, &mut self.rng);
        if let Some(bots_ref) = bot_host.as_deref_mut() {
            bots::recruit(&mut event, &self.config, bots_ref, &mut self.rng);
        }

        // Warning is transient; the cinematic window starts immediately.
        event.phase = SiegePhase::Cinematic;
        info!(
            city = %event.city.name,
            attacking = ?event.attacking_faction,
            leader = %event.leader_name,
            "siege started"
        );

        let id = event.city.id;
        self.events.push(event);
        id
    }

    // ------------------------------------------------------------------
    // Administrative surface
    // ------------------------------------------------------------------

    pub fn handle_admin(
        &mut self,
        command: &AdminCommand,
        now: Duration,
        world: &mut dyn World,
        bot_host: Option<&mut (dyn BotHost + '_)>,
    ) -> Result<AdminReply, AdminError> {
        match command {
            AdminCommand::StartSiege { city } => {
                let id = self.start_siege(city.as_deref(), now, world, bot_host)?;
                Ok(AdminReply::SiegeStarted {
                    city: id,
                    name: self.catalog.city(id).name.clone(),
                })
            }
            AdminCommand::StopSiege { city, winner } => {
                self.stop_siege(city, *winner, now, world, bot_host)?;
                let id = self
                    .catalog
                    .city_by_name(city)
                    .map(|c| c.id)
                    .ok_or_else(|| AdminError::UnknownCity(city.clone()))?;
                Ok(AdminReply::SiegeStopped {
                    city: id,
                    winner: *winner,
                })
            }
            AdminCommand::Cleanup { city } => {
                let events = self.cleanup(city.as_deref(), world, bot_host)?;
                Ok(AdminReply::CleanedUp { events })
            }
            AdminCommand::ListSieges => Ok(AdminReply::Sieges {
                sieges: self.active_sieges(now, world),
            }),
            AdminCommand::ShowWaypoints { city } => {
                let (id, path) = self.city_waypoints(city)?;
                Ok(AdminReply::Waypoints { city: id, path })
            }
            AdminCommand::ReloadConfig => {
                self.reload()?;
                Ok(AdminReply::Reloaded)
            }
        }
    }

    /// Force-start a siege on a named city, or a random eligible one.
    pub fn start_siege(
        &mut self,
        city: Option<&str>,
        now: Duration,
        world: &mut dyn World,
        bot_host: Option<&mut (dyn BotHost + '_)>,
    ) -> Result<CityId, AdminError> {
        if !self.config.enabled {
            return Err(AdminError::Disabled);
        }
        let id = match city {
            Some(name) => {
                let definition = self
                    .catalog
                    .city_by_name(name)
                    .ok_or_else(|| AdminError::UnknownCity(name.to_owned()))?;
                if !definition.enabled {
                    return Err(AdminError::CityDisabled(definition.name.clone()));
                }
                if self.is_under_siege(definition.id) {
                    return Err(AdminError::AlreadyUnderSiege(definition.name.clone()));
                }
                let id = definition.id;
                if !self.config.multi_siege {
                    if let Some(active) = self.active_siege_city() {
                        return Err(AdminError::AlreadyUnderSiege(active.city.name.clone()));
                    }
                }
                id
            }
            None => self.pick_eligible_city().ok_or(AdminError::NoEligibleCity)?,
        };
        Ok(self.start_event(id, now, world, bot_host))
    }

    /// Force an active siege to a chosen outcome, bypassing the objective
    /// health check.
    pub fn stop_siege(
        &mut self,
        city: &str,
        winner: Winner,
        now: Duration,
        world: &mut dyn World,
        bot_host: Option<&mut (dyn BotHost + '_)>,
    ) -> Result<(), AdminError> {
        let id = self
            .catalog
            .city_by_name(city)
            .map(|c| c.id)
            .ok_or_else(|| AdminError::UnknownCity(city.to_owned()))?;
        let event = self
            .events
            .iter_mut()
            .find(|e| e.city.id == id && e.is_active())
            .ok_or_else(|| AdminError::NoActiveSiege(city.to_owned()))?;
        lifecycle::resolve(event, &self.config, world, bot_host, winner, now);
        Ok(())
    }

    /// Tear down sieges (one city's, or all) without computing an outcome
    /// or paying rewards. Returns how many events were removed.
    pub fn cleanup(
        &mut self,
        city: Option<&str>,
        world: &mut dyn World,
        mut bot_host: Option<&mut (dyn BotHost + '_)>,
    ) -> Result<usize, AdminError> {
        let target = match city {
            Some(name) => Some(
                self.catalog
                    .city_by_name(name)
                    .map(|c| c.id)
                    .ok_or_else(|| AdminError::UnknownCity(name.to_owned()))?,
            ),
            None => None,
        };
        let mut removed = 0;
        self.events.retain_mut(|event| {
            if target.is_some_and(|id| event.city.id != id) {
                return true;
            }
            lifecycle::teardown(event, world, bot_host.as_deref_mut());
            removed += 1;
            false
        });
        Ok(removed)
    }

    pub fn active_sieges(&self, now: Duration, world: &dyn World) -> Vec<SiegeSummary> {
        self.events
            .iter()
            .filter(|e| e.is_active())
            .map(|e| {
                let alive = |list: &[rampart_protocol::ActorId]| {
                    list.iter().filter(|&&a| world.is_alive(a)).count()
                };
                e.summary(now, alive(&e.attackers), alive(&e.defenders))
            })
            .collect()
    }

    /// Diagnostic dump of a city's authored path.
    pub fn city_waypoints(&self, city: &str) -> Result<(CityId, Vec<Position>), AdminError> {
        let definition = self
            .catalog
            .city_by_name(city)
            .ok_or_else(|| AdminError::UnknownCity(city.to_owned()))?;
        Ok((definition.id, definition.waypoints.clone()))
    }

    /// Re-read catalog, config, and scripts for future sieges. Running
    /// events keep the definitions they started with.
    pub fn reload(&mut self) -> Result<(), AdminError> {
        let source = match &self.data_path {
            Some(path) => CatalogSource::Path(path.clone()),
            None => CatalogSource::Embedded,
        };
        let bundle = load_catalog(source)?;
        self.catalog = bundle.catalog;
        self.config = bundle.config;
        self.scripts = bundle.scripts;
        info!("siege catalog and configuration reloaded");
        Ok(())
    }
}
