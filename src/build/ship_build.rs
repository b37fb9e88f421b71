use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::build::context::{BuildContext, STARTING_PILOT_SKILL};
use crate::build::events::{BuildObserver, Topic};
use crate::build::slots::UpgradeSlots;
use crate::build::summary::BuildSummary;
use crate::build::upgrades::UpgradesModel;
use crate::data::{Catalog, Pilot, Ship, Upgrade};
use crate::error::{Error, Result};
use crate::ledger::{XpItem, XpLedger};

/// One pilot's ship, skill, cards and XP history.
///
/// Every mutation re-derives the loadout and then announces a [`Topic`] to the
/// subscribed observers, in subscription order.
pub struct ShipBuild {
    catalog: Arc<Catalog>,
    context: BuildContext,
    upgrades: UpgradesModel,
    ledger: XpLedger,
    observers: Vec<Box<dyn BuildObserver>>,
}

impl fmt::Debug for ShipBuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShipBuild")
            .field("ship", &self.context.ship.id)
            .field("pilot_skill", &self.context.pilot_skill)
            .field("upgrades", &self.upgrades)
            .field("ledger", &self.ledger)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ShipBuild {
    pub fn new(catalog: Arc<Catalog>, ship_id: &str, pilot_skill: u8) -> Result<Self> {
        let ship = lookup_ship(&catalog, ship_id)?;
        let mut context = BuildContext::new(&catalog, ship, pilot_skill);
        let upgrades = UpgradesModel::empty(Arc::clone(&catalog), &mut context);
        Ok(ShipBuild {
            catalog,
            context,
            upgrades,
            ledger: XpLedger::new(),
            observers: Vec::new(),
        })
    }

    /// Replay a stored history. The first starting-ship entry naming a known
    /// ship picks the initial ship; pilot skill starts at [`STARTING_PILOT_SKILL`].
    ///
    /// Entries naming a ship, card or pilot missing from the catalog are
    /// recorded with no effect, matching how the ledger labels and costs them.
    pub fn from_history(catalog: Arc<Catalog>, items: impl IntoIterator<Item = XpItem>) -> Result<Self> {
        let items: Vec<XpItem> = items.into_iter().collect();
        let mut starting_ships = items.iter().filter_map(|item| match item {
            XpItem::StartingShip { ship_id } => Some(ship_id.as_str()),
            _ => None,
        });
        let first = starting_ships.next().ok_or(Error::MissingStartingShip)?;
        let ship_id = std::iter::once(first)
            .chain(starting_ships)
            .find(|id| catalog.ship(id).is_some())
            .unwrap_or(first)
            .to_string();

        let mut build = ShipBuild::new(catalog, &ship_id, STARTING_PILOT_SKILL)?;
        for item in items {
            match build.apply_effect(&item) {
                Ok(_) => {}
                Err(err @ (Error::UnknownShip { .. } | Error::UnknownUpgrade { .. } | Error::UnknownPilot { .. })) => {
                    warn!(key = item.key(), error = %err, "history entry has no effect");
                }
                Err(err) => return Err(err),
            }
            build.ledger.push(item);
        }
        debug!(
            ship = %build.context.ship.id,
            entries = build.ledger.len(),
            total_xp = build.total_xp(),
            "history replayed"
        );
        Ok(build)
    }

    pub fn subscribe(&mut self, observer: impl BuildObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn announce(&self, topic: Topic) {
        for observer in &self.observers {
            observer.announce(topic, self);
        }
    }

    /// Apply a history entry's effect, then record it in the ledger.
    ///
    /// Entries that fail (unknown ship, card or pilot) are neither applied
    /// nor recorded. Unknown entries are recorded and otherwise skipped.
    pub fn apply(&mut self, item: XpItem) -> Result<Option<Topic>> {
        let topic = self.apply_effect(&item)?;
        self.ledger.push(item);
        Ok(topic)
    }

    fn apply_effect(&mut self, item: &XpItem) -> Result<Option<Topic>> {
        let topic = match item {
            XpItem::StartingShip { ship_id } | XpItem::ShipChange { ship_id } => {
                Some(self.change_ship(ship_id)?)
            }
            XpItem::PilotSkillIncrease { pilot_skill } => Some(self.set_pilot_skill(*pilot_skill)),
            XpItem::BuyUpgrade { upgrade_id } => Some(self.buy_card(*upgrade_id)?),
            XpItem::BuyPilotAbility { pilot_id } => Some(self.buy_pilot_ability(*pilot_id)?),
            XpItem::LoseUpgrade { upgrade_id } => Some(self.lose_card(*upgrade_id)),
            XpItem::LosePilotAbility { pilot_id } => Some(self.lose_ability(*pilot_id)),
            XpItem::GainXp { .. } | XpItem::MissionCompleted { .. } => None,
            XpItem::Unknown { key, value } => {
                warn!(%key, %value, "skipping unrecognised history entry");
                None
            }
        };
        Ok(topic)
    }

    /// Swap the chassis. Purchases carry over; the slot registry is rebuilt.
    pub fn change_ship(&mut self, ship_id: &str) -> Result<Topic> {
        let ship = lookup_ship(&self.catalog, ship_id)?;
        self.context.set_ship(&self.catalog, ship);
        self.upgrades.refresh_upgrades_state(&mut self.context);
        self.announce(Topic::ShipUpdate);
        Ok(Topic::ShipUpdate)
    }

    pub fn set_pilot_skill(&mut self, pilot_skill: u8) -> Topic {
        self.context.pilot_skill = pilot_skill;
        self.upgrades.refresh_upgrades_state(&mut self.context);
        self.announce(Topic::PilotSkillUpdate);
        Topic::PilotSkillUpdate
    }

    pub fn buy_card(&mut self, upgrade_id: u32) -> Result<Topic> {
        let topic = self.upgrades.buy_card(&mut self.context, upgrade_id)?;
        self.announce(topic);
        Ok(topic)
    }

    pub fn buy_pilot_ability(&mut self, pilot_id: u32) -> Result<Topic> {
        let topic = self.upgrades.buy_pilot_ability(&mut self.context, pilot_id)?;
        self.announce(topic);
        Ok(topic)
    }

    pub fn lose_card(&mut self, upgrade_id: u32) -> Topic {
        let topic = self.upgrades.lose_card(&mut self.context, upgrade_id);
        self.announce(topic);
        topic
    }

    pub fn lose_ability(&mut self, pilot_id: u32) -> Topic {
        let topic = self.upgrades.lose_ability(&mut self.context, pilot_id);
        self.announce(topic);
        topic
    }

    pub fn equip(&mut self, upgrade_id: u32) -> Result<Topic> {
        let topic = self.upgrades.equip(&mut self.context, upgrade_id)?;
        self.announce(topic);
        Ok(topic)
    }

    pub fn equip_ability(&mut self, pilot_id: u32) -> Result<Topic> {
        let topic = self.upgrades.equip_ability(&mut self.context, pilot_id)?;
        self.announce(topic);
        Ok(topic)
    }

    /// Returns `None` (and announces nothing) when the card was not equipped.
    pub fn unequip_upgrade(&mut self, upgrade_id: u32) -> Option<Topic> {
        let topic = self.upgrades.unequip_upgrade(&mut self.context, upgrade_id)?;
        self.announce(topic);
        Some(topic)
    }

    pub fn unequip_ability(&mut self, pilot_id: u32) -> Option<Topic> {
        let topic = self.upgrades.unequip_ability(&mut self.context, pilot_id)?;
        self.announce(topic);
        Some(topic)
    }

    pub fn available_to_buy(&self, slot_type: &str) -> Vec<Arc<Upgrade>> {
        self.upgrades.get_available_to_buy(&self.context, slot_type)
    }

    pub fn abilities_available_to_buy(&self) -> Vec<Arc<Pilot>> {
        self.upgrades.get_abilities_available_to_buy()
    }

    pub fn can_equip_upgrade(&self, upgrade_id: u32) -> bool {
        self.upgrades.can_equip_upgrade(&self.context, upgrade_id)
    }

    pub fn can_equip_abilities(&self) -> bool {
        self.upgrades.can_equip_abilities(&self.context)
    }

    pub fn upgrade_allowed_in_build(&self, upgrade: &Upgrade) -> bool {
        self.upgrades.upgrade_allowed_in_build(&self.context, upgrade)
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn ship(&self) -> &Arc<Ship> {
        &self.context.ship
    }

    pub fn pilot_skill(&self) -> u8 {
        self.context.pilot_skill
    }

    pub fn slots(&self) -> &UpgradeSlots {
        &self.context.slots
    }

    pub fn upgrades(&self) -> &UpgradesModel {
        &self.upgrades
    }

    pub fn ledger(&self) -> &XpLedger {
        &self.ledger
    }

    pub fn total_xp(&self) -> i64 {
        self.ledger.total_xp(&self.catalog)
    }

    pub fn summary(&self) -> BuildSummary {
        BuildSummary::of(self)
    }
}

fn lookup_ship(catalog: &Catalog, ship_id: &str) -> Result<Arc<Ship>> {
    catalog
        .ship(ship_id)
        .cloned()
        .ok_or_else(|| Error::UnknownShip {
            id: ship_id.to_string(),
        })
}
