//! The parts of a build the loadout engine reads: ship, pilot skill and the
//! ship's slot registry.

use std::sync::Arc;

use crate::build::slots::UpgradeSlots;
use crate::data::{Catalog, Ship, Upgrade};

/// Pilot skill of a freshly created campaign pilot.
pub const STARTING_PILOT_SKILL: u8 = 2;

#[derive(Debug, Clone)]
pub struct BuildContext {
    pub ship: Arc<Ship>,
    pub pilot_skill: u8,
    pub slots: UpgradeSlots,
    /// The ship's built-in upgrades, resolved against the catalog.
    pub starting_upgrades: Vec<Arc<Upgrade>>,
}

impl BuildContext {
    pub fn new(catalog: &Catalog, ship: Arc<Ship>, pilot_skill: u8) -> Self {
        let starting_upgrades = catalog.starting_upgrades(&ship);
        let slots = UpgradeSlots::for_ship(&ship, &starting_upgrades);
        BuildContext {
            ship,
            pilot_skill,
            slots,
            starting_upgrades,
        }
    }

    /// Swap the chassis. The slot registry is rebuilt from scratch.
    pub fn set_ship(&mut self, catalog: &Catalog, ship: Arc<Ship>) {
        self.starting_upgrades = catalog.starting_upgrades(&ship);
        self.slots = UpgradeSlots::for_ship(&ship, &self.starting_upgrades);
        self.ship = ship;
    }
}
