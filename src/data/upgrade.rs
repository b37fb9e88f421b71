//! Upgrade cards: slot type, legality constraints, printed points and slot grants.

use serde::{Deserialize, Serialize};

/// Slot type reserved for pilot abilities (and elite talent upgrades).
pub const ELITE_SLOT: &str = "Elite";

/// Grant type that adds one extra slot when the upgrade is equipped.
pub const SLOT_GRANT: &str = "slot";

/// Upgrade card record as shipped in `upgrades.json` / `upgrades.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upgrade {
    pub id: u32,
    pub name: String,
    /// Card type; also the slot type the card is equipped into.
    pub slot: String,
    /// Ship names this card is restricted to. `None` means any ship.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship: Option<Vec<String>>,
    /// Ship sizes this card is restricted to. `None` means any size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Vec<String>>,
    #[serde(default)]
    pub points: i32,
    /// Cross-reference id shared by both faces of a dual-sided card.
    #[serde(default)]
    pub xws: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual_card_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grants: Vec<Grant>,
}

/// Effect printed on an upgrade. Only `slot` grants are interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    #[serde(rename = "type")]
    pub grant_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Grant {
    /// Slot type added by this grant, if it is a slot grant with a name.
    pub fn slot_type(&self) -> Option<&str> {
        if self.grant_type == SLOT_GRANT {
            self.name.as_deref()
        } else {
            None
        }
    }
}

impl Upgrade {
    /// Name shown to players; dual-sided cards use their combined name.
    pub fn display_name(&self) -> &str {
        self.dual_card_name.as_deref().unwrap_or(&self.name)
    }

    /// Slot types added to the ship when this upgrade is equipped, in card order.
    pub fn granted_slot_types(&self) -> impl Iterator<Item = &str> {
        self.grants.iter().filter_map(Grant::slot_type)
    }
}
