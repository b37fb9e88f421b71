//! Loadout engine: purchased and equipped upgrades/abilities for one build.
//!
//! Every mutation re-derives the whole equipped/disabled/unequipped state via
//! [`UpgradesModel::refresh_upgrades_state`]; equipped lists are never trusted
//! across mutations. Mutators return the [`Topic`] the owning build should
//! announce (or `None` when nothing changed and nothing must be announced).

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::build::card::Card;
use crate::build::context::BuildContext;
use crate::build::events::Topic;
use crate::build::multiset::{difference_all, difference_single, intersection_single, remove_first};
use crate::build::slots::{Slot, SlotIndex, SlotKind, UpgradeSlots};
use crate::data::upgrade::ELITE_SLOT;
use crate::data::{Catalog, Pilot, Upgrade};
use crate::error::{Error, Result};

/// Slot types whose cards may be bought again while a copy is already held.
const DUPLICABLE_SLOTS: &[&str] = &["Bomb", "Torpedo", "Cannon", "Turret", "Missile"];

/// Cards that may be held alongside their own counterpart.
const DUPLICABLE_XWS: &[&str] = &["hullupgrade", "shieldupgrade"];

#[derive(Debug, Clone)]
pub struct UpgradesModel {
    catalog: Arc<Catalog>,
    /// Upgrades in order of purchase.
    purchased: Vec<Arc<Upgrade>>,
    purchased_abilities: Vec<Arc<Pilot>>,
    equipped_upgrades: Vec<Arc<Upgrade>>,
    equipped_abilities: Vec<Arc<Pilot>>,
    all: Vec<Arc<Upgrade>>,
    disabled: Vec<Arc<Upgrade>>,
    disabled_abilities: Vec<Arc<Pilot>>,
    unequipped: Vec<Arc<Upgrade>>,
    unequipped_abilities: Vec<Arc<Pilot>>,
}

/// Working state of one slot assignment pass.
struct SlotAssignment {
    remaining_upgrades: Vec<Arc<Upgrade>>,
    remaining_abilities: Vec<Arc<Pilot>>,
    equipped_upgrades: Vec<Arc<Upgrade>>,
    equipped_abilities: Vec<Arc<Pilot>>,
}

impl UpgradesModel {
    /// Restore the engine from id lists. Ids unknown to the catalog are dropped.
    pub fn new(
        catalog: Arc<Catalog>,
        context: &mut BuildContext,
        upgrade_ids: &[u32],
        equipped_ids: &[u32],
        pilot_ids: &[u32],
        equipped_ability_ids: &[u32],
    ) -> Self {
        let purchased = upgrades_from_ids(&catalog, upgrade_ids);
        let purchased_abilities = abilities_from_ids(&catalog, pilot_ids);
        let equipped_upgrades = upgrades_from_ids(&catalog, equipped_ids);
        let equipped_abilities = abilities_from_ids(&catalog, equipped_ability_ids);
        let mut model = UpgradesModel {
            catalog,
            purchased,
            purchased_abilities,
            equipped_upgrades,
            equipped_abilities,
            all: Vec::new(),
            disabled: Vec::new(),
            disabled_abilities: Vec::new(),
            unequipped: Vec::new(),
            unequipped_abilities: Vec::new(),
        };
        model.refresh_upgrades_state(context);
        model
    }

    /// An engine with nothing purchased yet.
    pub fn empty(catalog: Arc<Catalog>, context: &mut BuildContext) -> Self {
        Self::new(catalog, context, &[], &[], &[], &[])
    }

    pub fn refresh_upgrades_state(&mut self, context: &mut BuildContext) {
        self.all = self
            .purchased
            .iter()
            .chain(context.starting_upgrades.iter())
            .cloned()
            .collect();

        let validated_upgrades = self.validate_upgrades(context, &self.equipped_upgrades);
        let validated_abilities = self.validate_abilities(context, &self.equipped_abilities);
        let (equipped_upgrades, equipped_abilities) =
            equip_upgrades_to_slots(&mut context.slots, validated_upgrades, validated_abilities);
        self.equipped_upgrades = equipped_upgrades;
        self.equipped_abilities = equipped_abilities;

        // Usable slot types include slots granted by what was just equipped.
        self.disabled = self.compute_disabled(context);
        self.disabled_abilities = self.compute_disabled_abilities(context);
        self.unequipped = difference_single(
            &difference_all(&self.purchased, &self.disabled),
            &self.equipped_upgrades,
        );
        self.unequipped_abilities = difference_single(
            &difference_all(&self.purchased_abilities, &self.disabled_abilities),
            &self.equipped_abilities,
        );

        debug!(
            ship = %context.ship.id,
            pilot_skill = context.pilot_skill,
            purchased = self.purchased.len(),
            equipped = self.equipped_upgrades.len(),
            equipped_abilities = self.equipped_abilities.len(),
            disabled = self.disabled.len(),
            slots = context.slots.len(),
            "upgrade state refreshed"
        );
    }

    /// Equipped upgrades must have been purchased (or be built in) and fit the ship.
    fn validate_upgrades(&self, context: &BuildContext, list: &[Arc<Upgrade>]) -> Vec<Arc<Upgrade>> {
        intersection_single(list, &self.all)
            .into_iter()
            .filter(|upgrade| upgrade_allowed_on_ship(context, upgrade))
            .collect()
    }

    /// Equipped abilities must have been purchased and be within the pilot's skill.
    fn validate_abilities(&self, context: &BuildContext, list: &[Arc<Pilot>]) -> Vec<Arc<Pilot>> {
        intersection_single(list, &self.purchased_abilities)
            .into_iter()
            .filter(|pilot| ability_allowed_in_build(context, pilot))
            .collect()
    }

    fn compute_disabled(&self, context: &BuildContext) -> Vec<Arc<Upgrade>> {
        let usable = context.slots.usable_slot_types();
        self.purchased
            .iter()
            .filter(|upgrade| {
                !upgrade_allowed_on_ship(context, upgrade) || !usable.contains(&upgrade.slot)
            })
            .cloned()
            .collect()
    }

    fn compute_disabled_abilities(&self, context: &BuildContext) -> Vec<Arc<Pilot>> {
        let elite_usable = context.slots.usable_slot_types().contains(ELITE_SLOT);
        self.purchased_abilities
            .iter()
            .filter(|pilot| !elite_usable || !ability_allowed_in_build(context, pilot))
            .cloned()
            .collect()
    }

    pub fn buy_card(&mut self, context: &mut BuildContext, upgrade_id: u32) -> Result<Topic> {
        let upgrade = self.lookup_upgrade(upgrade_id)?;
        self.purchased.push(upgrade);
        self.refresh_upgrades_state(context);
        Ok(Topic::UpgradesAdd)
    }

    pub fn buy_pilot_ability(&mut self, context: &mut BuildContext, pilot_id: u32) -> Result<Topic> {
        let pilot = self.lookup_pilot(pilot_id)?;
        self.purchased_abilities.push(pilot);
        self.refresh_upgrades_state(context);
        Ok(Topic::PilotAbilitiesAdd)
    }

    /// Remove the first purchased copy of `upgrade_id`. Always refreshes, even
    /// when no copy was held.
    pub fn lose_card(&mut self, context: &mut BuildContext, upgrade_id: u32) -> Topic {
        if remove_first(&mut self.purchased, upgrade_id).is_none() {
            debug!(upgrade_id, "lose_card: upgrade not held");
        }
        self.refresh_upgrades_state(context);
        Topic::UpgradesLose
    }

    /// Remove the first purchased copy of `pilot_id`. Always refreshes.
    pub fn lose_ability(&mut self, context: &mut BuildContext, pilot_id: u32) -> Topic {
        if remove_first(&mut self.purchased_abilities, pilot_id).is_none() {
            debug!(pilot_id, "lose_ability: ability not held");
        }
        self.refresh_upgrades_state(context);
        Topic::PilotAbilitiesLose
    }

    pub fn equip(&mut self, context: &mut BuildContext, upgrade_id: u32) -> Result<Topic> {
        let upgrade = self.lookup_upgrade(upgrade_id)?;
        self.equipped_upgrades.push(upgrade);
        self.refresh_upgrades_state(context);
        Ok(Topic::EquippedUpgradesUpdate)
    }

    pub fn equip_ability(&mut self, context: &mut BuildContext, pilot_id: u32) -> Result<Topic> {
        let pilot = self.lookup_pilot(pilot_id)?;
        self.equipped_abilities.push(pilot);
        self.refresh_upgrades_state(context);
        Ok(Topic::EquippedUpgradesUpdate)
    }

    /// Unequip the first equipped copy of `upgrade_id`. Refreshes only if one was found.
    pub fn unequip_upgrade(&mut self, context: &mut BuildContext, upgrade_id: u32) -> Option<Topic> {
        remove_first(&mut self.equipped_upgrades, upgrade_id)?;
        self.refresh_upgrades_state(context);
        Some(Topic::EquippedUpgradesUpdate)
    }

    /// Unequip the first equipped copy of `pilot_id`. Refreshes only if one was found.
    pub fn unequip_ability(&mut self, context: &mut BuildContext, pilot_id: u32) -> Option<Topic> {
        remove_first(&mut self.equipped_abilities, pilot_id)?;
        self.refresh_upgrades_state(context);
        Some(Topic::EquippedUpgradesUpdate)
    }

    /// Upgrades of `slot_type` that may be bought for this build.
    pub fn get_available_to_buy(&self, context: &BuildContext, slot_type: &str) -> Vec<Arc<Upgrade>> {
        self.catalog
            .upgrades_for_slot(slot_type)
            .iter()
            .filter(|upgrade| upgrade_allowed_on_ship(context, upgrade))
            .filter(|upgrade| self.upgrade_allowed_in_build(context, upgrade))
            .cloned()
            .collect()
    }

    /// Unique pilot abilities not bought yet, in canonical order.
    pub fn get_abilities_available_to_buy(&self) -> Vec<Arc<Pilot>> {
        let unique: Vec<Arc<Pilot>> = self.catalog.unique_pilots().cloned().collect();
        self.catalog
            .sort_pilots(difference_all(&unique, &self.purchased_abilities))
    }

    /// Purchase-time filter: no second copy of a starting upgrade, and no
    /// second copy of a held card unless it is a munition or hull/shield upgrade.
    /// Copies are matched by `xws` so both faces of a dual card count.
    pub fn upgrade_allowed_in_build(&self, context: &BuildContext, upgrade: &Upgrade) -> bool {
        if context
            .starting_upgrades
            .iter()
            .any(|starting| starting.xws == upgrade.xws)
        {
            return false;
        }

        let already_held = self.all.iter().any(|existing| existing.xws == upgrade.xws);
        if already_held {
            return DUPLICABLE_SLOTS.contains(&upgrade.slot.as_str())
                || DUPLICABLE_XWS.contains(&upgrade.xws.as_str());
        }

        true
    }

    pub fn ability_already_in_build(&self, pilot_id: u32) -> bool {
        self.purchased_abilities.iter().any(|p| p.id == pilot_id)
    }

    /// True if an enabled slot of the upgrade's type is currently empty.
    pub fn can_equip_upgrade(&self, context: &BuildContext, upgrade_id: u32) -> bool {
        let Some(upgrade) = self.catalog.upgrade(upgrade_id) else {
            return false;
        };
        has_empty_enabled_slot(&context.slots, &upgrade.slot)
    }

    /// True if an enabled Elite slot is currently empty.
    pub fn can_equip_abilities(&self, context: &BuildContext) -> bool {
        has_empty_enabled_slot(&context.slots, ELITE_SLOT)
    }

    fn lookup_upgrade(&self, upgrade_id: u32) -> Result<Arc<Upgrade>> {
        self.catalog
            .upgrade(upgrade_id)
            .cloned()
            .ok_or(Error::UnknownUpgrade { id: upgrade_id })
    }

    fn lookup_pilot(&self, pilot_id: u32) -> Result<Arc<Pilot>> {
        self.catalog
            .pilot(pilot_id)
            .cloned()
            .ok_or(Error::UnknownPilot { id: pilot_id })
    }

    pub fn purchased(&self) -> &[Arc<Upgrade>] {
        &self.purchased
    }

    pub fn purchased_abilities(&self) -> &[Arc<Pilot>] {
        &self.purchased_abilities
    }

    pub fn equipped_upgrades(&self) -> &[Arc<Upgrade>] {
        &self.equipped_upgrades
    }

    pub fn equipped_abilities(&self) -> &[Arc<Pilot>] {
        &self.equipped_abilities
    }

    /// Purchased upgrades plus the ship's starting upgrades.
    pub fn all(&self) -> &[Arc<Upgrade>] {
        &self.all
    }

    pub fn disabled(&self) -> &[Arc<Upgrade>] {
        &self.disabled
    }

    pub fn disabled_abilities(&self) -> &[Arc<Pilot>] {
        &self.disabled_abilities
    }

    pub fn unequipped(&self) -> &[Arc<Upgrade>] {
        &self.unequipped
    }

    pub fn unequipped_abilities(&self) -> &[Arc<Pilot>] {
        &self.unequipped_abilities
    }
}

/// Fails if the card is restricted to other ship names or other sizes.
pub fn upgrade_allowed_on_ship(context: &BuildContext, upgrade: &Upgrade) -> bool {
    if let Some(ships) = &upgrade.ship {
        if !ships.iter().any(|name| *name == context.ship.name) {
            return false;
        }
    }
    if let Some(sizes) = &upgrade.size {
        if !sizes.iter().any(|size| *size == context.ship.size) {
            return false;
        }
    }
    true
}

/// Fails if the ability's pilot skill is above the build's.
pub fn ability_allowed_in_build(context: &BuildContext, pilot: &Pilot) -> bool {
    pilot.skill <= context.pilot_skill
}

fn has_empty_enabled_slot(slots: &UpgradeSlots, slot_type: &str) -> bool {
    slots
        .enabled_slots()
        .into_iter()
        .filter_map(|index| slots.slot(index))
        .any(|slot| slot.slot_type == slot_type && slot.is_empty())
}

/// Place validated candidates into slots and return what actually got equipped.
///
/// Free slots take their exact starting upgrade, then enabled slots take the
/// first remaining candidate of their type (Elite slots fall back to the first
/// remaining ability). Upgrades with slot grants add slots as they are placed;
/// those are filled breadth-first from a worklist until no new slot appears.
fn equip_upgrades_to_slots(
    slots: &mut UpgradeSlots,
    upgrades: Vec<Arc<Upgrade>>,
    abilities: Vec<Arc<Pilot>>,
) -> (Vec<Arc<Upgrade>>, Vec<Arc<Pilot>>) {
    let mut assignment = SlotAssignment {
        remaining_upgrades: upgrades,
        remaining_abilities: abilities,
        equipped_upgrades: Vec::new(),
        equipped_abilities: Vec::new(),
    };

    slots.reset_additional_slots();
    let mut new_slots: VecDeque<SlotIndex> = VecDeque::new();

    for index in slots.free_slots() {
        let matching = slots
            .slot(index)
            .and_then(|slot| assignment.match_free_slot(slot));
        new_slots.extend(assignment.equip_slot(slots, index, matching));
    }

    for index in slots.enabled_slots() {
        let matching = slots.slot(index).and_then(|slot| assignment.match_slot(slot));
        new_slots.extend(assignment.equip_slot(slots, index, matching));
    }

    // Grant chains are finite by card data; there is no iteration cap.
    while let Some(index) = new_slots.pop_front() {
        let matching = slots.slot(index).and_then(|slot| assignment.match_slot(slot));
        new_slots.extend(assignment.equip_slot(slots, index, matching));
    }

    if !assignment.remaining_upgrades.is_empty() || !assignment.remaining_abilities.is_empty() {
        debug!(
            upgrades = assignment.remaining_upgrades.len(),
            abilities = assignment.remaining_abilities.len(),
            "candidates left without a slot"
        );
    }

    (assignment.equipped_upgrades, assignment.equipped_abilities)
}

impl SlotAssignment {
    fn match_free_slot(&self, slot: &Slot) -> Option<Card> {
        let SlotKind::Free { upgrade_id } = slot.kind else {
            return None;
        };
        self.remaining_upgrades
            .iter()
            .find(|upgrade| upgrade.id == upgrade_id)
            .cloned()
            .map(Card::Upgrade)
    }

    fn match_slot(&self, slot: &Slot) -> Option<Card> {
        let matching = self
            .remaining_upgrades
            .iter()
            .find(|upgrade| upgrade.slot == slot.slot_type)
            .cloned()
            .map(Card::Upgrade);

        if matching.is_none() && slot.slot_type == ELITE_SLOT {
            return self.remaining_abilities.first().cloned().map(Card::Ability);
        }
        matching
    }

    /// Put `card` into the slot at `index`, clearing any previous occupant.
    /// Returns the indices of slots granted by the placed card.
    fn equip_slot(
        &mut self,
        slots: &mut UpgradeSlots,
        index: SlotIndex,
        card: Option<Card>,
    ) -> Vec<SlotIndex> {
        let mut added = Vec::new();

        match slots.slot_mut(index) {
            Some(slot) => slot.equipped = None,
            None => {
                warn!(%index, "slot assignment referenced a missing slot");
                return added;
            }
        }

        let Some(card) = card else {
            return added;
        };

        match &card {
            Card::Ability(pilot) => {
                remove_first(&mut self.remaining_abilities, pilot.id);
                self.equipped_abilities.push(Arc::clone(pilot));
            }
            Card::Upgrade(upgrade) => {
                remove_first(&mut self.remaining_upgrades, upgrade.id);
                self.equipped_upgrades.push(Arc::clone(upgrade));
                for slot_type in upgrade.granted_slot_types() {
                    added.push(slots.add_additional_slot(slot_type));
                }
            }
        }

        if let Some(slot) = slots.slot_mut(index) {
            slot.equipped = Some(card);
        }
        added
    }
}

fn upgrades_from_ids(catalog: &Catalog, ids: &[u32]) -> Vec<Arc<Upgrade>> {
    ids.iter()
        .filter_map(|id| {
            let upgrade = catalog.upgrade(*id).cloned();
            if upgrade.is_none() {
                warn!(upgrade_id = id, "skipping unknown upgrade id");
            }
            upgrade
        })
        .collect()
}

fn abilities_from_ids(catalog: &Catalog, ids: &[u32]) -> Vec<Arc<Pilot>> {
    ids.iter()
        .filter_map(|id| {
            let pilot = catalog.pilot(*id).cloned();
            if pilot.is_none() {
                warn!(pilot_id = id, "skipping unknown pilot id");
            }
            pilot
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Grant, Ship};

    fn upgrade(id: u32, slot: &str, xws: &str) -> Upgrade {
        Upgrade {
            id,
            name: format!("{xws} ({id})"),
            slot: slot.to_string(),
            ship: None,
            size: None,
            points: 2,
            xws: xws.to_string(),
            dual_card_name: None,
            grants: Vec::new(),
        }
    }

    fn granting(id: u32, slot: &str, grants: &[&str]) -> Upgrade {
        let mut card = upgrade(id, slot, &format!("grant{id}"));
        card.grants = grants
            .iter()
            .map(|name| Grant {
                grant_type: "slot".to_string(),
                name: Some(name.to_string()),
            })
            .collect();
        card
    }

    fn pilot(id: u32, skill: u8) -> Pilot {
        Pilot {
            id,
            name: format!("pilot {id}"),
            skill,
            ship: None,
            xws: format!("pilot{id}"),
            unique: true,
            points: 20,
        }
    }

    fn ship(slots: &[&str], starting: &[u32]) -> Ship {
        Ship {
            id: "xwing".to_string(),
            name: "X-wing".to_string(),
            size: "small".to_string(),
            starting_xp: 0,
            starting_upgrades: starting.to_vec(),
            upgrade_slots: slots.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn setup(upgrades: Vec<Upgrade>, pilots: Vec<Pilot>, ship: Ship, skill: u8) -> (Arc<Catalog>, BuildContext) {
        let ship = Arc::new(ship);
        let catalog = Arc::new(Catalog::from_parts(upgrades, pilots, vec![(*ship).clone()], Vec::new()));
        let context = BuildContext::new(&catalog, ship, skill);
        (catalog, context)
    }

    fn ids(list: &[Arc<Upgrade>]) -> Vec<u32> {
        list.iter().map(|u| u.id).collect()
    }

    #[test]
    fn first_candidate_in_equip_order_wins_the_slot() {
        let (catalog, mut context) = setup(
            vec![upgrade(1, "Torpedo", "a"), upgrade(2, "Torpedo", "b")],
            Vec::new(),
            ship(&["Torpedo"], &[]),
            2,
        );
        let model = UpgradesModel::new(catalog, &mut context, &[1, 2], &[2, 1], &[], &[]);
        assert_eq!(ids(model.equipped_upgrades()), vec![2]);
        assert_eq!(ids(model.unequipped()), vec![1]);
        let slot = context.slots.slot(context.slots.enabled_slots()[0]).unwrap();
        assert_eq!(slot.equipped.as_ref().map(Card::id), Some(2));
    }

    #[test]
    fn elite_slot_prefers_elite_upgrades_over_abilities() {
        let (catalog, mut context) = setup(
            vec![upgrade(1, "Elite", "veteraninstincts")],
            vec![pilot(10, 2)],
            ship(&["Elite"], &[]),
            4,
        );
        let model = UpgradesModel::new(catalog, &mut context, &[1], &[1], &[10], &[10]);
        assert_eq!(ids(model.equipped_upgrades()), vec![1]);
        assert!(model.equipped_abilities().is_empty());
        assert_eq!(model.unequipped_abilities().len(), 1);
    }

    #[test]
    fn granted_elite_slot_can_hold_an_ability() {
        let (catalog, mut context) = setup(
            vec![granting(1, "Title", &["Elite"])],
            vec![pilot(10, 2)],
            ship(&["Title"], &[]),
            4,
        );
        let model = UpgradesModel::new(catalog, &mut context, &[1], &[1], &[10], &[10]);
        assert_eq!(model.equipped_abilities().len(), 1);
        assert!(model.disabled_abilities().is_empty());
        let granted = context.slots.granted_slots();
        assert_eq!(granted.len(), 1);
        assert!(context.slots.slot(granted[0]).unwrap().equipped.as_ref().unwrap().is_ability());
    }

    #[test]
    fn abilities_never_take_non_elite_granted_slots() {
        let (catalog, mut context) = setup(
            vec![granting(1, "Title", &["Crew"])],
            vec![pilot(10, 2)],
            ship(&["Title"], &[]),
            4,
        );
        let model = UpgradesModel::new(catalog, &mut context, &[1], &[1], &[10], &[10]);
        assert!(model.equipped_abilities().is_empty());
        assert_eq!(model.disabled_abilities().len(), 1, "no Elite slot at all");
    }

    #[test]
    fn unequipping_a_grant_source_drops_what_sat_in_its_slot() {
        let (catalog, mut context) = setup(
            vec![granting(1, "Title", &["Crew"]), upgrade(2, "Crew", "r2")],
            Vec::new(),
            ship(&["Title"], &[]),
            2,
        );
        let mut model = UpgradesModel::new(catalog, &mut context, &[1, 2], &[1, 2], &[], &[]);
        assert_eq!(ids(model.equipped_upgrades()), vec![1, 2]);

        assert_eq!(model.unequip_upgrade(&mut context, 1), Some(Topic::EquippedUpgradesUpdate));
        assert!(model.equipped_upgrades().is_empty());
        assert_eq!(ids(model.disabled()), vec![2], "Crew slot is gone");
        assert_eq!(ids(model.unequipped()), vec![1]);
    }

    #[test]
    fn unequip_of_missing_card_is_silent() {
        let (catalog, mut context) = setup(vec![upgrade(1, "Torpedo", "a")], Vec::new(), ship(&["Torpedo"], &[]), 2);
        let mut model = UpgradesModel::empty(catalog, &mut context);
        assert_eq!(model.unequip_upgrade(&mut context, 1), None);
        assert_eq!(model.unequip_ability(&mut context, 1), None);
    }

    #[test]
    fn lose_card_announces_even_without_a_match() {
        let (catalog, mut context) = setup(vec![upgrade(1, "Torpedo", "a")], Vec::new(), ship(&["Torpedo"], &[]), 2);
        let mut model = UpgradesModel::empty(catalog, &mut context);
        assert_eq!(model.lose_card(&mut context, 1), Topic::UpgradesLose);
        assert_eq!(model.lose_ability(&mut context, 1), Topic::PilotAbilitiesLose);
    }

    #[test]
    fn buying_unknown_cards_fails_without_mutation() {
        let (catalog, mut context) = setup(Vec::new(), Vec::new(), ship(&["Torpedo"], &[]), 2);
        let mut model = UpgradesModel::empty(catalog, &mut context);
        assert!(matches!(model.buy_card(&mut context, 5), Err(Error::UnknownUpgrade { id: 5 })));
        assert!(matches!(model.equip_ability(&mut context, 6), Err(Error::UnknownPilot { id: 6 })));
        assert!(model.purchased().is_empty());
        assert!(model.equipped_abilities().is_empty());
    }

    #[test]
    fn dual_sided_faces_block_each_other_but_munitions_do_not() {
        let mut front = upgrade(1, "Elite", "adaptability");
        front.dual_card_name = Some("Adaptability".to_string());
        let mut back = upgrade(2, "Elite", "adaptability");
        back.dual_card_name = Some("Adaptability".to_string());
        let (catalog, mut context) = setup(
            vec![front, back, upgrade(3, "Missile", "clustermissiles")],
            Vec::new(),
            ship(&["Elite", "Missile"], &[]),
            2,
        );
        let mut model = UpgradesModel::empty(catalog, &mut context);
        model.buy_card(&mut context, 1).unwrap();
        model.buy_card(&mut context, 3).unwrap();

        assert!(model.get_available_to_buy(&context, "Elite").is_empty());
        assert_eq!(ids(&model.get_available_to_buy(&context, "Missile")), vec![3]);
        assert!(!model.ability_already_in_build(10));
    }

    #[test]
    fn can_equip_reflects_empty_enabled_slots() {
        let (catalog, mut context) = setup(
            vec![upgrade(1, "Torpedo", "a"), upgrade(2, "Astromech", "r2")],
            vec![pilot(10, 2)],
            ship(&["Torpedo", "Elite"], &[]),
            2,
        );
        let mut model = UpgradesModel::empty(catalog, &mut context);
        assert!(model.can_equip_upgrade(&context, 1));
        assert!(!model.can_equip_upgrade(&context, 2), "no Astromech slot");
        assert!(!model.can_equip_upgrade(&context, 99), "unknown id");
        assert!(model.can_equip_abilities(&context));

        model.buy_card(&mut context, 1).unwrap();
        model.equip(&mut context, 1).unwrap();
        model.buy_pilot_ability(&mut context, 10).unwrap();
        model.equip_ability(&mut context, 10).unwrap();
        assert!(!model.can_equip_upgrade(&context, 1));
        assert!(!model.can_equip_abilities(&context));
    }
}
