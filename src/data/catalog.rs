//! Read-only catalog of cards, ships and missions. Loaded once at startup and
//! shared by `Arc` between builds, CLI commands and server handlers.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::data::mission::Mission;
use crate::data::pilot::{compare_pilots, Pilot};
use crate::data::ship::Ship;
use crate::data::upgrade::Upgrade;
use crate::error::{Error, Result};

pub const DEFAULT_DATA_DIR: &str = "data";

const CATALOG_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// On-disk shape of every catalog file: `{ "upgrades": [...] }`, `{ "ships": [...] }`, ...
#[derive(Debug, Deserialize)]
struct CatalogFile<T> {
    #[serde(default)]
    data_version: Option<String>,
    #[serde(alias = "upgrades", alias = "pilots", alias = "ships", alias = "missions")]
    entries: Vec<T>,
}

#[derive(Debug, Default)]
pub struct Catalog {
    upgrades: Vec<Arc<Upgrade>>,
    upgrades_by_id: HashMap<u32, Arc<Upgrade>>,
    upgrades_by_slot: HashMap<String, Vec<Arc<Upgrade>>>,
    pilots: Vec<Arc<Pilot>>,
    pilots_by_id: HashMap<u32, Arc<Pilot>>,
    ships: Vec<Arc<Ship>>,
    ships_by_id: HashMap<String, Arc<Ship>>,
    missions: Vec<Arc<Mission>>,
    missions_by_id: HashMap<u32, Arc<Mission>>,
    data_version: Option<String>,
}

impl Catalog {
    /// Build a catalog from in-memory records. Later duplicates win id lookups;
    /// every record stays in the ordered listings so validation can report them.
    pub fn from_parts(
        upgrades: Vec<Upgrade>,
        pilots: Vec<Pilot>,
        ships: Vec<Ship>,
        missions: Vec<Mission>,
    ) -> Self {
        let upgrades: Vec<Arc<Upgrade>> = upgrades.into_iter().map(Arc::new).collect();
        let mut upgrades_by_slot: HashMap<String, Vec<Arc<Upgrade>>> = HashMap::new();
        for upgrade in &upgrades {
            upgrades_by_slot
                .entry(upgrade.slot.clone())
                .or_default()
                .push(Arc::clone(upgrade));
        }
        let upgrades_by_id = upgrades.iter().map(|u| (u.id, Arc::clone(u))).collect();

        let pilots: Vec<Arc<Pilot>> = pilots.into_iter().map(Arc::new).collect();
        let pilots_by_id = pilots.iter().map(|p| (p.id, Arc::clone(p))).collect();

        let ships: Vec<Arc<Ship>> = ships.into_iter().map(Arc::new).collect();
        let ships_by_id = ships.iter().map(|s| (s.id.clone(), Arc::clone(s))).collect();

        let missions: Vec<Arc<Mission>> = missions.into_iter().map(Arc::new).collect();
        let missions_by_id = missions.iter().map(|m| (m.id, Arc::clone(m))).collect();

        Catalog {
            upgrades,
            upgrades_by_id,
            upgrades_by_slot,
            pilots,
            pilots_by_id,
            ships,
            ships_by_id,
            missions,
            missions_by_id,
            data_version: None,
        }
    }

    /// Load `upgrades`, `pilots`, `ships` and (optionally) `missions` from a data
    /// directory. Each section may be JSON or YAML.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Arc<Catalog>> {
        let dir = dir.as_ref();
        let (upgrades, data_version) = load_required::<Upgrade>(dir, "upgrades")?;
        let (pilots, _) = load_required::<Pilot>(dir, "pilots")?;
        let (ships, _) = load_required::<Ship>(dir, "ships")?;
        let missions = match find_section(dir, "missions") {
            Some(path) => load_section::<Mission>(&path)?.entries,
            None => {
                debug!(dir = %dir.display(), "no missions catalog, continuing without missions");
                Vec::new()
            }
        };

        let mut catalog = Catalog::from_parts(upgrades, pilots, ships, missions);
        catalog.data_version = data_version;
        info!(
            dir = %dir.display(),
            upgrades = catalog.upgrades.len(),
            pilots = catalog.pilots.len(),
            ships = catalog.ships.len(),
            missions = catalog.missions.len(),
            "catalog loaded"
        );
        Ok(Arc::new(catalog))
    }

    pub fn upgrade(&self, id: u32) -> Option<&Arc<Upgrade>> {
        self.upgrades_by_id.get(&id)
    }

    pub fn pilot(&self, id: u32) -> Option<&Arc<Pilot>> {
        self.pilots_by_id.get(&id)
    }

    pub fn ship(&self, id: &str) -> Option<&Arc<Ship>> {
        self.ships_by_id.get(id)
    }

    pub fn mission(&self, id: u32) -> Option<&Arc<Mission>> {
        self.missions_by_id.get(&id)
    }

    /// Upgrades of one slot type in catalog order. Unknown slot types yield an empty slice.
    pub fn upgrades_for_slot(&self, slot_type: &str) -> &[Arc<Upgrade>] {
        self.upgrades_by_slot
            .get(slot_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn upgrades(&self) -> &[Arc<Upgrade>] {
        &self.upgrades
    }

    pub fn pilots(&self) -> &[Arc<Pilot>] {
        &self.pilots
    }

    pub fn ships(&self) -> &[Arc<Ship>] {
        &self.ships
    }

    pub fn missions(&self) -> &[Arc<Mission>] {
        &self.missions
    }

    /// Pilots whose ability can be bought, in catalog order.
    pub fn unique_pilots(&self) -> impl Iterator<Item = &Arc<Pilot>> {
        self.pilots.iter().filter(|p| p.unique)
    }

    /// Resolve a ship's built-in upgrades. Ids missing from the catalog are skipped.
    pub fn starting_upgrades(&self, ship: &Ship) -> Vec<Arc<Upgrade>> {
        ship.starting_upgrades
            .iter()
            .filter_map(|id| self.upgrade(*id).cloned())
            .collect()
    }

    /// Sort pilots into the canonical listing order.
    pub fn sort_pilots(&self, mut pilots: Vec<Arc<Pilot>>) -> Vec<Arc<Pilot>> {
        pilots.sort_by(|a, b| compare_pilots(a, b));
        pilots
    }

    pub fn data_version(&self) -> Option<&str> {
        self.data_version.as_deref()
    }
}

fn find_section(dir: &Path, name: &str) -> Option<PathBuf> {
    CATALOG_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .find(|path| path.is_file())
}

fn load_required<T: DeserializeOwned>(
    dir: &Path,
    name: &'static str,
) -> Result<(Vec<T>, Option<String>)> {
    let path = find_section(dir, name).ok_or_else(|| Error::MissingCatalogFile {
        dir: dir.to_path_buf(),
        name,
    })?;
    let file = load_section::<T>(&path)?;
    Ok((file.entries, file.data_version))
}

fn load_section<T: DeserializeOwned>(path: &Path) -> Result<CatalogFile<T>> {
    let raw = fs::read_to_string(path).map_err(|source| Error::CatalogRead {
        path: path.to_path_buf(),
        source,
    })?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "yaml" || ext == "yml");
    if is_yaml {
        serde_yaml::from_str(&raw).map_err(|source| Error::CatalogYaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_json::from_str(&raw).map_err(|source| Error::CatalogJson {
            path: path.to_path_buf(),
            source,
        })
    }
}
