//! One entry of a pilot's experience history and its persisted `{key, value}` form.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::upgrade::ELITE_SLOT;
use crate::data::Catalog;

pub const SHIP_CHANGE_KEY: &str = "ST";
pub const STARTING_SHIP_KEY: &str = "SST";
pub const PILOT_SKILL_KEY: &str = "PS";
pub const MISSION_KEY: &str = "MIS";
pub const GAIN_XP_KEY: &str = "XP";
pub const BUY_UPGRADE_KEY: &str = "UP";
pub const BUY_PILOT_ABILITY_KEY: &str = "PA";
pub const LOSE_UPGRADE_KEY: &str = "LUP";
pub const LOSE_PILOT_ABILITY_KEY: &str = "LPA";

/// XP spent when changing ship mid-campaign.
const SHIP_CHANGE_COST: i64 = -5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XpItem {
    ShipChange { ship_id: String },
    StartingShip { ship_id: String },
    /// Raising pilot skill to `pilot_skill`.
    PilotSkillIncrease { pilot_skill: u8 },
    MissionCompleted { mission_id: u32 },
    GainXp { xp: i64 },
    BuyUpgrade { upgrade_id: u32 },
    BuyPilotAbility { pilot_id: u32 },
    LoseUpgrade { upgrade_id: u32 },
    LosePilotAbility { pilot_id: u32 },
    /// An entry whose key is not recognised or whose value does not parse.
    /// Exported again exactly as it was read.
    Unknown { key: String, value: ExportValue },
}

/// Persisted value: ship ids are strings, everything else is numeric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExportValue {
    Number(i64),
    Text(String),
    /// Anything else found in a stored file: null, booleans, floats, nesting.
    Other(serde_json::Value),
}

impl Default for ExportValue {
    fn default() -> Self {
        ExportValue::Other(serde_json::Value::Null)
    }
}

impl ExportValue {
    /// Integer reading of the value: the leading integer of its text, so
    /// `" 12abc"` reads as 12 and `2.5` as 2.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            ExportValue::Number(n) => Some(*n),
            ExportValue::Text(text) => leading_integer(text),
            ExportValue::Other(serde_json::Value::Number(n)) => leading_integer(&n.to_string()),
            ExportValue::Other(_) => None,
        }
    }

    /// Textual reading of the value, as used for ship ids.
    pub fn as_text(&self) -> Option<String> {
        match self {
            ExportValue::Number(n) => Some(n.to_string()),
            ExportValue::Text(text) => Some(text.clone()),
            ExportValue::Other(_) => None,
        }
    }
}

impl fmt::Display for ExportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportValue::Number(n) => write!(f, "{n}"),
            ExportValue::Text(text) => f.write_str(text),
            ExportValue::Other(value) => write!(f, "{value}"),
        }
    }
}

/// Integer prefix of `text` after leading whitespace and an optional sign.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let end = text.len() - unsigned.len() + digits;
    text[..end].parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub key: String,
    #[serde(default)]
    pub value: ExportValue,
}

impl XpItem {
    /// XP delta of this entry. Spending is negative.
    pub fn cost(&self, catalog: &Catalog) -> i64 {
        match self {
            XpItem::ShipChange { .. } => SHIP_CHANGE_COST,
            XpItem::StartingShip { ship_id } => catalog
                .ship(ship_id)
                .map(|ship| i64::from(ship.starting_xp))
                .unwrap_or(0),
            XpItem::PilotSkillIncrease { pilot_skill } => -2 * i64::from(*pilot_skill),
            XpItem::GainXp { xp } => *xp,
            XpItem::BuyUpgrade { upgrade_id } => match catalog.upgrade(*upgrade_id) {
                Some(upgrade) if upgrade.points == 0 => 0,
                // Elite cards cost double their printed points.
                Some(upgrade) if upgrade.slot == ELITE_SLOT => -2 * i64::from(upgrade.points),
                Some(upgrade) => -i64::from(upgrade.points),
                None => 0,
            },
            XpItem::BuyPilotAbility { pilot_id } => catalog
                .pilot(*pilot_id)
                .map(|pilot| -i64::from(pilot.skill))
                .unwrap_or(0),
            XpItem::MissionCompleted { .. }
            | XpItem::LoseUpgrade { .. }
            | XpItem::LosePilotAbility { .. }
            | XpItem::Unknown { .. } => 0,
        }
    }

    pub fn label(&self, catalog: &Catalog) -> String {
        match self {
            XpItem::ShipChange { ship_id } => format!("Change ship: {}", ship_name(catalog, ship_id)),
            XpItem::StartingShip { ship_id } => {
                format!("Starting ship: {}", ship_name(catalog, ship_id))
            }
            XpItem::PilotSkillIncrease { pilot_skill } => {
                format!("Upgrade pilot skill: PS {pilot_skill}")
            }
            XpItem::MissionCompleted { mission_id } => {
                let name = catalog
                    .mission(*mission_id)
                    .map(|mission| mission.name.clone())
                    .unwrap_or_else(|| format!("unknown mission #{mission_id}"));
                format!("Completed mission: {name}")
            }
            XpItem::GainXp { .. } => "Gain XP".to_string(),
            XpItem::BuyUpgrade { upgrade_id } => match catalog.upgrade(*upgrade_id) {
                Some(upgrade) => format!("{}: {}", upgrade.slot, upgrade.display_name()),
                None => format!("unknown upgrade #{upgrade_id}"),
            },
            XpItem::BuyPilotAbility { pilot_id } => {
                format!("Pilot Ability: {}", pilot_name(catalog, *pilot_id))
            }
            XpItem::LoseUpgrade { upgrade_id } => {
                let name = catalog
                    .upgrade(*upgrade_id)
                    .map(|upgrade| upgrade.display_name().to_string())
                    .unwrap_or_else(|| format!("unknown upgrade #{upgrade_id}"));
                format!("Lose upgrade: {name}")
            }
            XpItem::LosePilotAbility { pilot_id } => {
                format!("Lose pilot ability: {}", pilot_name(catalog, *pilot_id))
            }
            XpItem::Unknown { .. } => String::new(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            XpItem::ShipChange { .. } => SHIP_CHANGE_KEY,
            XpItem::StartingShip { .. } => STARTING_SHIP_KEY,
            XpItem::PilotSkillIncrease { .. } => PILOT_SKILL_KEY,
            XpItem::MissionCompleted { .. } => MISSION_KEY,
            XpItem::GainXp { .. } => GAIN_XP_KEY,
            XpItem::BuyUpgrade { .. } => BUY_UPGRADE_KEY,
            XpItem::BuyPilotAbility { .. } => BUY_PILOT_ABILITY_KEY,
            XpItem::LoseUpgrade { .. } => LOSE_UPGRADE_KEY,
            XpItem::LosePilotAbility { .. } => LOSE_PILOT_ABILITY_KEY,
            XpItem::Unknown { key, .. } => key,
        }
    }

    pub fn export_entry(&self) -> ExportEntry {
        let value = match self {
            XpItem::ShipChange { ship_id } | XpItem::StartingShip { ship_id } => {
                ExportValue::Text(ship_id.clone())
            }
            XpItem::PilotSkillIncrease { pilot_skill } => ExportValue::Number(i64::from(*pilot_skill)),
            XpItem::MissionCompleted { mission_id } => ExportValue::Number(i64::from(*mission_id)),
            XpItem::GainXp { xp } => ExportValue::Number(*xp),
            XpItem::BuyUpgrade { upgrade_id } | XpItem::LoseUpgrade { upgrade_id } => {
                ExportValue::Number(i64::from(*upgrade_id))
            }
            XpItem::BuyPilotAbility { pilot_id } | XpItem::LosePilotAbility { pilot_id } => {
                ExportValue::Number(i64::from(*pilot_id))
            }
            XpItem::Unknown { value, .. } => value.clone(),
        };
        ExportEntry {
            key: self.key().to_string(),
            value,
        }
    }

    /// Decode a `{key, value}` entry. Anything unrecognised becomes [`XpItem::Unknown`].
    pub fn parse_export_entry(entry: &ExportEntry) -> XpItem {
        let parsed = match entry.key.as_str() {
            SHIP_CHANGE_KEY => entry.value.as_text().map(|ship_id| XpItem::ShipChange { ship_id }),
            STARTING_SHIP_KEY => entry.value.as_text().map(|ship_id| XpItem::StartingShip { ship_id }),
            PILOT_SKILL_KEY => numeric::<u8>(&entry.value).map(|pilot_skill| XpItem::PilotSkillIncrease { pilot_skill }),
            MISSION_KEY => numeric::<u32>(&entry.value).map(|mission_id| XpItem::MissionCompleted { mission_id }),
            GAIN_XP_KEY => entry.value.as_number().map(|xp| XpItem::GainXp { xp }),
            BUY_UPGRADE_KEY => numeric::<u32>(&entry.value).map(|upgrade_id| XpItem::BuyUpgrade { upgrade_id }),
            BUY_PILOT_ABILITY_KEY => numeric::<u32>(&entry.value).map(|pilot_id| XpItem::BuyPilotAbility { pilot_id }),
            LOSE_UPGRADE_KEY => numeric::<u32>(&entry.value).map(|upgrade_id| XpItem::LoseUpgrade { upgrade_id }),
            LOSE_PILOT_ABILITY_KEY => {
                numeric::<u32>(&entry.value).map(|pilot_id| XpItem::LosePilotAbility { pilot_id })
            }
            _ => None,
        };
        parsed.unwrap_or_else(|| XpItem::Unknown {
            key: entry.key.clone(),
            value: entry.value.clone(),
        })
    }

    /// Decode the older `KEY=value` string form. The value ends at the next
    /// `=`, if any.
    pub fn parse_legacy(encoded: &str) -> XpItem {
        let mut parts = encoded.split('=');
        let key = parts.next().unwrap_or_default();
        let value = parts.next().unwrap_or_default();
        XpItem::parse_export_entry(&ExportEntry {
            key: key.to_string(),
            value: ExportValue::Text(value.to_string()),
        })
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, XpItem::Unknown { .. })
    }
}

fn numeric<T: TryFrom<i64>>(value: &ExportValue) -> Option<T> {
    value.as_number().and_then(|n| T::try_from(n).ok())
}

fn ship_name(catalog: &Catalog, ship_id: &str) -> String {
    catalog
        .ship(ship_id)
        .map(|ship| ship.name.clone())
        .unwrap_or_else(|| format!("unknown ship #{ship_id}"))
}

fn pilot_name(catalog: &Catalog, pilot_id: u32) -> String {
    catalog
        .pilot(pilot_id)
        .map(|pilot| pilot.name.clone())
        .unwrap_or_else(|| format!("unknown pilot #{pilot_id}"))
}
