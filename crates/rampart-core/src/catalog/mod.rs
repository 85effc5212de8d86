//! Static siege data: actor kinds, faction force rosters, and cities.

mod loader;
mod types;

pub use loader::{load_catalog, CatalogBundle, CatalogError, CatalogSource};
pub use types::{ActorKind, Catalog, CityDefinition, ForceRoster};

pub(crate) use types::{RawActorKind, RawCity, RawForce};
