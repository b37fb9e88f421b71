//! Ship chassis data: name and size for legality checks, starting XP for a
//! new campaign pilot, built-in upgrades and the chassis slot layout.

use serde::{Deserialize, Serialize};

/// Ship record (hotac schema). Loaded at startup from `ships.json` / `ships.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub id: String,
    pub name: String,
    /// Size class matched against an upgrade's `size` allow-list (e.g. "small", "large").
    pub size: String,
    /// XP granted when a pilot starts the campaign in this ship.
    #[serde(default)]
    pub starting_xp: i32,
    /// Upgrade ids fitted to the chassis from the start. Each gets a free slot.
    #[serde(default)]
    pub starting_upgrades: Vec<u32>,
    /// Slot types available on the chassis, in registry order.
    #[serde(default)]
    pub upgrade_slots: Vec<String>,
}
