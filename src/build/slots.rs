//! Slot registry for one ship build.
//!
//! Slots live in a single arena addressed by [`SlotIndex`]. The base slots
//! (free slots bound to starting upgrades, then the chassis' enabled slots)
//! come first; slots granted by equipped upgrades are appended after them and
//! dropped again by [`UpgradeSlots::reset_additional_slots`]. Indices stay
//! valid while slots are appended during slot assignment.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::build::card::Card;
use crate::data::{Ship, Upgrade};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SlotIndex(usize);

impl SlotIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotKind {
    /// Reserved for one specific starting upgrade.
    Free { upgrade_id: u32 },
    /// Chassis slot, filled by any card of the matching type.
    Enabled,
    /// Added by a slot grant on an equipped upgrade.
    Granted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub slot_type: String,
    pub kind: SlotKind,
    pub equipped: Option<Card>,
}

impl Slot {
    fn new(slot_type: impl Into<String>, kind: SlotKind) -> Self {
        Slot {
            slot_type: slot_type.into(),
            kind,
            equipped: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.equipped.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpgradeSlots {
    slots: Vec<Slot>,
    base_len: usize,
}

impl UpgradeSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Free slots for the resolved starting upgrades followed by the chassis slots.
    pub fn for_ship(ship: &Ship, starting_upgrades: &[std::sync::Arc<Upgrade>]) -> Self {
        let mut slots = UpgradeSlots::new();
        for upgrade in starting_upgrades {
            slots.push_free(upgrade);
        }
        for slot_type in &ship.upgrade_slots {
            slots.push_enabled(slot_type);
        }
        slots
    }

    /// Add a base slot bound to `upgrade`. Granted slots are discarded first.
    pub fn push_free(&mut self, upgrade: &Upgrade) -> SlotIndex {
        self.push_base(Slot::new(
            upgrade.slot.clone(),
            SlotKind::Free {
                upgrade_id: upgrade.id,
            },
        ))
    }

    /// Add a base slot matched by type. Granted slots are discarded first.
    pub fn push_enabled(&mut self, slot_type: &str) -> SlotIndex {
        self.push_base(Slot::new(slot_type, SlotKind::Enabled))
    }

    fn push_base(&mut self, slot: Slot) -> SlotIndex {
        self.reset_additional_slots();
        self.slots.push(slot);
        self.base_len = self.slots.len();
        SlotIndex(self.base_len - 1)
    }

    pub fn free_slots(&self) -> Vec<SlotIndex> {
        self.indices_where(|slot| matches!(slot.kind, SlotKind::Free { .. }))
    }

    pub fn enabled_slots(&self) -> Vec<SlotIndex> {
        self.indices_where(|slot| slot.kind == SlotKind::Enabled)
    }

    pub fn granted_slots(&self) -> Vec<SlotIndex> {
        (self.base_len..self.slots.len()).map(SlotIndex).collect()
    }

    fn indices_where(&self, predicate: impl Fn(&Slot) -> bool) -> Vec<SlotIndex> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| predicate(slot))
            .map(|(index, _)| SlotIndex(index))
            .collect()
    }

    /// Slot types a purchased card could be equipped into: enabled and granted slots.
    /// Free slots only take their own starting upgrade, so a bought copy of a
    /// starting upgrade with no enabled slot of its type is disabled while the
    /// built-in copy stays equipped under the same id.
    pub fn usable_slot_types(&self) -> BTreeSet<String> {
        self.slots
            .iter()
            .filter(|slot| !matches!(slot.kind, SlotKind::Free { .. }))
            .map(|slot| slot.slot_type.clone())
            .collect()
    }

    pub fn reset_additional_slots(&mut self) {
        self.slots.truncate(self.base_len);
    }

    pub fn add_additional_slot(&mut self, slot_type: &str) -> SlotIndex {
        self.slots.push(Slot::new(slot_type, SlotKind::Granted));
        SlotIndex(self.slots.len() - 1)
    }

    pub fn slot(&self, index: SlotIndex) -> Option<&Slot> {
        self.slots.get(index.0)
    }

    pub fn slot_mut(&mut self, index: SlotIndex) -> Option<&mut Slot> {
        self.slots.get_mut(index.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &Slot)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| (SlotIndex(index), slot))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
