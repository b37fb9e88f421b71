//! Pilot cards. A pilot's printed ability can be bought for a build and
//! occupies an Elite slot.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pilot {
    pub id: u32,
    pub name: String,
    /// Printed pilot skill; an ability cannot be used below this skill.
    pub skill: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship: Option<String>,
    #[serde(default)]
    pub xws: String,
    /// Only unique pilots carry a named ability worth buying.
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub points: i32,
}

/// Canonical listing order: skill ascending, then name, then id.
pub fn compare_pilots(a: &Pilot, b: &Pilot) -> Ordering {
    a.skill
        .cmp(&b.skill)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}
