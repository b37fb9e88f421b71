//! Serialisable snapshot of a build, used by the CLI and the HTTP API.

use std::sync::Arc;

use serde::Serialize;

use crate::build::card::Card;
use crate::build::slots::SlotKind;
use crate::build::ShipBuild;
use crate::data::upgrade::ELITE_SLOT;
use crate::data::{Pilot, Upgrade};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildSummary {
    pub ship_id: String,
    pub ship_name: String,
    pub pilot_skill: u8,
    pub total_xp: i64,
    pub purchased: Vec<CardSummary>,
    pub purchased_abilities: Vec<CardSummary>,
    pub equipped_upgrades: Vec<CardSummary>,
    pub equipped_abilities: Vec<CardSummary>,
    pub disabled: Vec<CardSummary>,
    pub disabled_abilities: Vec<CardSummary>,
    pub unequipped: Vec<CardSummary>,
    pub unequipped_abilities: Vec<CardSummary>,
    pub slots: Vec<SlotSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSummary {
    pub id: u32,
    pub name: String,
    pub slot: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotSummary {
    pub index: usize,
    pub slot_type: String,
    #[serde(flatten)]
    pub kind: SlotKind,
    pub equipped: Option<CardSummary>,
}

impl From<&Card> for CardSummary {
    fn from(card: &Card) -> Self {
        CardSummary {
            id: card.id(),
            name: card.name().to_string(),
            slot: card.slot_type().to_string(),
        }
    }
}

fn upgrades(list: &[Arc<Upgrade>]) -> Vec<CardSummary> {
    list.iter()
        .map(|upgrade| CardSummary {
            id: upgrade.id,
            name: upgrade.display_name().to_string(),
            slot: upgrade.slot.clone(),
        })
        .collect()
}

fn abilities(list: &[Arc<Pilot>]) -> Vec<CardSummary> {
    list.iter()
        .map(|pilot| CardSummary {
            id: pilot.id,
            name: pilot.name.clone(),
            slot: ELITE_SLOT.to_string(),
        })
        .collect()
}

impl BuildSummary {
    pub fn of(build: &ShipBuild) -> Self {
        let model = build.upgrades();
        let ship = build.ship();
        BuildSummary {
            ship_id: ship.id.clone(),
            ship_name: ship.name.clone(),
            pilot_skill: build.pilot_skill(),
            total_xp: build.total_xp(),
            purchased: upgrades(model.purchased()),
            purchased_abilities: abilities(model.purchased_abilities()),
            equipped_upgrades: upgrades(model.equipped_upgrades()),
            equipped_abilities: abilities(model.equipped_abilities()),
            disabled: upgrades(model.disabled()),
            disabled_abilities: abilities(model.disabled_abilities()),
            unequipped: upgrades(model.unequipped()),
            unequipped_abilities: abilities(model.unequipped_abilities()),
            slots: build
                .slots()
                .iter()
                .map(|(index, slot)| SlotSummary {
                    index: index.get(),
                    slot_type: slot.slot_type.clone(),
                    kind: slot.kind.clone(),
                    equipped: slot.equipped.as_ref().map(CardSummary::from),
                })
                .collect(),
        }
    }
}
