use std::collections::BTreeMap;

use rampart_protocol::{ActorKindId, CityId, MapId, Position, ZoneId};
use serde::Deserialize;
use thiserror::Error;

use crate::catalog::{ActorKind, Catalog, CityDefinition, ForceRoster, RawCity, RawForce};
use crate::config::SiegeConfig;
use crate::script::{RawScripts, ScriptBook};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("missing referenced id: {0}")]
    MissingId(String),
    #[error("utf-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub enum CatalogSource<'a> {
    Embedded,
    Path(String),
    Bytes {
        cities: &'a [u8],
        siege: Option<&'a [u8]>,
        scripts: Option<&'a [u8]>,
    },
}

/// Everything the engine needs, compiled from one source.
#[derive(Clone, Debug)]
pub struct CatalogBundle {
    pub catalog: Catalog,
    pub config: SiegeConfig,
    pub scripts: ScriptBook,
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    kinds: BTreeMap<String, crate::catalog::RawActorKind>,
    coalition_force: RawForce,
    dominion_force: RawForce,
    cities: BTreeMap<String, RawCity>,
}

pub fn load_catalog(source: CatalogSource<'_>) -> Result<CatalogBundle, CatalogError> {
    let (raw, config, scripts) = match source {
        CatalogSource::Embedded => {
            let cities_yaml = include_str!("../../data/base/cities.yaml");
            let siege_yaml = include_str!("../../data/base/siege.yaml");
            let scripts_yaml = include_str!("../../data/base/scripts.yaml");
            parse_raw(cities_yaml, Some(siege_yaml), Some(scripts_yaml))?
        }
        CatalogSource::Path(path) => {
            let cities_yaml = std::fs::read_to_string(format!("{path}/cities.yaml"))?;
            let siege_yaml = std::fs::read_to_string(format!("{path}/siege.yaml")).ok();
            let scripts_yaml = std::fs::read_to_string(format!("{path}/scripts.yaml")).ok();
            parse_raw(&cities_yaml, siege_yaml.as_deref(), scripts_yaml.as_deref())?
        }
        CatalogSource::Bytes {
            cities,
            siege,
            scripts,
        } => parse_raw(
            std::str::from_utf8(cities)?,
            siege.map(std::str::from_utf8).transpose()?,
            scripts.map(std::str::from_utf8).transpose()?,
        )?,
    };

    let catalog = compile_catalog(raw)?;
    Ok(CatalogBundle {
        catalog,
        config,
        scripts,
    })
}

fn parse_raw(
    cities_yaml: &str,
    siege_yaml: Option<&str>,
    scripts_yaml: Option<&str>,
) -> Result<(RawCatalog, SiegeConfig, ScriptBook), CatalogError> {
    let raw: RawCatalog = serde_yaml::from_str(cities_yaml)?;
    let config = match siege_yaml {
        Some(s) => serde_yaml::from_str(s)?,
        None => SiegeConfig::default(),
    };
    let scripts: RawScripts = match scripts_yaml {
        Some(s) => serde_yaml::from_str(s)?,
        None => RawScripts::default(),
    };
    Ok((raw, config, ScriptBook::from_raw(scripts)))
}

fn compile_catalog(raw: RawCatalog) -> Result<Catalog, CatalogError> {
    let kind_ids = raw
        .kinds
        .keys()
        .enumerate()
        .map(|(i, k)| (k.clone(), ActorKindId::new(i as u16)))
        .collect::<std::collections::HashMap<_, _>>();

    let kinds = raw
        .kinds
        .into_values()
        .map(|k| ActorKind {
            name: k.name,
            level: k.level,
            scale: k.scale,
        })
        .collect::<Vec<_>>();

    let resolve = |id: &str| -> Result<ActorKindId, CatalogError> {
        kind_ids
            .get(id)
            .copied()
            .ok_or_else(|| CatalogError::MissingId(id.to_owned()))
    };

    let compile_force = |f: &RawForce| -> Result<ForceRoster, CatalogError> {
        Ok(ForceRoster {
            leaders: f
                .leaders
                .iter()
                .map(|l| resolve(l))
                .collect::<Result<Vec<_>, _>>()?,
            commander: resolve(&f.commander)?,
            elite: resolve(&f.elite)?,
            minion: resolve(&f.minion)?,
            defender: resolve(&f.defender)?,
        })
    };

    let coalition_force = compile_force(&raw.coalition_force)?;
    let dominion_force = compile_force(&raw.dominion_force)?;

    let city_ids = raw
        .cities
        .keys()
        .enumerate()
        .map(|(i, k)| (k.clone(), CityId::new(i as u16)))
        .collect::<std::collections::HashMap<_, _>>();

    let cities = raw
        .cities
        .into_iter()
        .enumerate()
        .map(|(i, (_, c))| {
            Ok(CityDefinition {
                id: CityId::new(i as u16),
                name: c.name,
                faction: c.faction,
                map: MapId(c.map),
                zone: ZoneId(c.zone),
                leader_kind: resolve(&c.leader)?,
                spawn: to_position(c.spawn),
                objective: to_position(c.objective),
                announce: to_position(c.announce),
                waypoints: c.waypoints.into_iter().map(to_position).collect(),
                enabled: c.enabled,
            })
        })
        .collect::<Result<Vec<_>, CatalogError>>()?;

    Ok(Catalog {
        kinds,
        kind_ids,
        coalition_force,
        dominion_force,
        cities,
        city_ids,
    })
}

fn to_position(coords: [f32; 3]) -> Position {
    Position::new(coords[0], coords[1], coords[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_protocol::Faction;

    #[test]
    fn embedded_catalog_compiles() {
        let bundle = load_catalog(CatalogSource::Embedded).unwrap();
        assert!(!bundle.catalog.cities.is_empty());
        // Each faction should have at least one city and a full force roster.
        for faction in [Faction::Coalition, Faction::Dominion] {
            assert!(bundle.catalog.cities.iter().any(|c| c.faction == faction));
            assert!(!bundle.catalog.force(faction).leaders.is_empty());
        }
        // City lookup works by data id and by display name.
        let first = &bundle.catalog.cities[0];
        assert!(bundle.catalog.city_by_name(&first.name).is_some());
        assert!(bundle
            .catalog
            .city_by_name(&first.name.to_lowercase())
            .is_some());
    }

    #[test]
    fn unknown_kind_reference_is_rejected() {
        let cities = br#"
kinds:
  guard: { name: "Guard", level: 60 }
coalition_force:
  leaders: [nonexistent]
  commander: guard
  elite: guard
  minion: guard
  defender: guard
dominion_force:
  leaders: [guard]
  commander: guard
  elite: guard
  minion: guard
  defender: guard
cities: {}
"#;
        let err = load_catalog(CatalogSource::Bytes {
            cities,
            siege: None,
            scripts: None,
        })
        .unwrap_err();
        assert!(matches!(err, CatalogError::MissingId(id) if id == "nonexistent"));
    }
}
