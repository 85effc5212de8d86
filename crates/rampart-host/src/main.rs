//! Rampart Siege Host
//!
//! Reference host that ticks the siege engine against the simulated world.
//! Real deployments implement `World` over their own simulation and drive
//! `SiegeEngine::tick` from their update loop the same way.

use std::time::Instant;

use rand::Rng;
use rampart_core::{load_catalog, CatalogSource, SiegeEngine};
use tracing::info;

use rampart_host::{HostConfig, SimWorld};

fn main() {
    let config = HostConfig::default();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.clone())
        .init();

    let source = match &config.data_path {
        Some(path) => CatalogSource::Path(path.clone()),
        None => CatalogSource::Embedded,
    };
    let bundle = match load_catalog(source) {
        Ok(bundle) => bundle,
        Err(e) => {
            tracing::error!("Failed to load siege catalog: {}", e);
            std::process::exit(1);
        }
    };

    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut engine = SiegeEngine::new(bundle, seed);
    if let Some(path) = &config.data_path {
        engine.set_data_path(path.clone());
    }

    // Stand up each city's leader so sieges have a live objective.
    let mut world = SimWorld::new();
    let fixtures: Vec<_> = engine
        .catalog()
        .cities
        .iter()
        .map(|c| {
            (
                c.leader_kind,
                c.map,
                c.objective,
                c.faction,
                engine.catalog().kind(c.leader_kind).level,
            )
        })
        .collect();
    for (kind, map, position, faction, level) in fixtures {
        world.place_fixture(kind, map, position, faction, level);
    }

    info!("Rampart Siege Host v{}", env!("CARGO_PKG_VERSION"));
    info!("Seed: {:016x}", seed);
    info!("Cities: {}", engine.catalog().cities.len());

    // Main host loop
    let tick_duration = config.tick_interval;
    let started = Instant::now();
    let mut last_report = started.elapsed();
    loop {
        let loop_start = Instant::now();
        let now = started.elapsed();

        // Advance simulated movement, then game logic
        world.step(tick_duration);
        engine.tick(now, &mut world, None);

        // Periodic status report for operators
        if now.saturating_sub(last_report).as_secs() >= 60 {
            last_report = now;
            let sieges = engine.active_sieges(now, &world);
            if !sieges.is_empty() {
                let report = serde_json::to_string(&sieges).unwrap_or_default();
                info!(%report, "active sieges");
            }
        }

        let elapsed = loop_start.elapsed();
        if let Some(sleep_time) = tick_duration.checked_sub(elapsed) {
            std::thread::sleep(sleep_time);
        }
    }
}
