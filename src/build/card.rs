//! Items that can occupy a slot: upgrade cards and pilot abilities.

use std::sync::Arc;

use crate::data::upgrade::ELITE_SLOT;
use crate::data::{Pilot, Upgrade};

/// Something equipped into a slot. Pilot abilities only ever fit Elite slots.
#[derive(Debug, Clone, PartialEq)]
pub enum Card {
    Upgrade(Arc<Upgrade>),
    Ability(Arc<Pilot>),
}

impl Card {
    pub fn id(&self) -> u32 {
        match self {
            Card::Upgrade(upgrade) => upgrade.id,
            Card::Ability(pilot) => pilot.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Card::Upgrade(upgrade) => upgrade.display_name(),
            Card::Ability(pilot) => &pilot.name,
        }
    }

    pub fn slot_type(&self) -> &str {
        match self {
            Card::Upgrade(upgrade) => &upgrade.slot,
            Card::Ability(_) => ELITE_SLOT,
        }
    }

    pub fn is_ability(&self) -> bool {
        matches!(self, Card::Ability(_))
    }
}

/// Catalog identity used for multiset bookkeeping. Two copies of the same
/// card compare equal; dual-sided faces do not.
pub trait CatalogId {
    fn catalog_id(&self) -> u32;
}

impl CatalogId for Upgrade {
    fn catalog_id(&self) -> u32 {
        self.id
    }
}

impl CatalogId for Pilot {
    fn catalog_id(&self) -> u32 {
        self.id
    }
}
