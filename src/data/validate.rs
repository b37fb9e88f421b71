use std::collections::HashSet;
use std::fmt;

use crate::data::catalog::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }
}

/// Check catalog consistency: unique ids, resolvable starting upgrades and
/// well-formed slot grants.
pub fn validate_catalog(catalog: &Catalog) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut slot_types: HashSet<&str> = HashSet::new();

    let mut seen_upgrades = HashSet::new();
    for (index, upgrade) in catalog.upgrades().iter().enumerate() {
        let context = format!("upgrades[{index}] id={}", upgrade.id);
        if !seen_upgrades.insert(upgrade.id) {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("duplicate upgrade id {}", upgrade.id),
            );
        }
        if upgrade.slot.trim().is_empty() {
            report.push(ValidationSeverity::Error, context.clone(), "missing non-empty 'slot'");
        } else {
            slot_types.insert(upgrade.slot.as_str());
        }
        if upgrade.xws.trim().is_empty() {
            report.push(
                ValidationSeverity::Warning,
                context.clone(),
                "missing 'xws'; duplicate checks fall back to matching every other card without one",
            );
        }
        if upgrade.points < 0 {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("negative points {}", upgrade.points),
            );
        }
        for (grant_index, grant) in upgrade.grants.iter().enumerate() {
            if grant.grant_type == crate::data::upgrade::SLOT_GRANT && grant.name.is_none() {
                report.push(
                    ValidationSeverity::Error,
                    format!("{context}.grants[{grant_index}]"),
                    "slot grant without a slot 'name'",
                );
            }
        }
    }

    let mut seen_pilots = HashSet::new();
    for (index, pilot) in catalog.pilots().iter().enumerate() {
        if !seen_pilots.insert(pilot.id) {
            report.push(
                ValidationSeverity::Error,
                format!("pilots[{index}] id={}", pilot.id),
                format!("duplicate pilot id {}", pilot.id),
            );
        }
    }

    let mut seen_ships = HashSet::new();
    for (index, ship) in catalog.ships().iter().enumerate() {
        let context = format!("ships[{index}] id='{}'", ship.id);
        if !seen_ships.insert(ship.id.as_str()) {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("duplicate ship id '{}'", ship.id),
            );
        }
        if ship.upgrade_slots.is_empty() {
            report.push(ValidationSeverity::Warning, context.clone(), "ship has no upgrade slots");
        }
        for upgrade_id in &ship.starting_upgrades {
            if catalog.upgrade(*upgrade_id).is_none() {
                report.push(
                    ValidationSeverity::Error,
                    format!("{context}.starting_upgrades"),
                    format!("unknown starting upgrade id {upgrade_id}"),
                );
            }
        }
        for slot in &ship.upgrade_slots {
            if !slot_types.contains(slot.as_str()) && slot != crate::data::upgrade::ELITE_SLOT {
                report.push(
                    ValidationSeverity::Info,
                    format!("{context}.upgrade_slots"),
                    format!("no upgrade in the catalog fits slot type '{slot}'"),
                );
            }
        }
    }

    let mut seen_missions = HashSet::new();
    for (index, mission) in catalog.missions().iter().enumerate() {
        if !seen_missions.insert(mission.id) {
            report.push(
                ValidationSeverity::Error,
                format!("missions[{index}] id={}", mission.id),
                format!("duplicate mission id {}", mission.id),
            );
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ship::Ship;
    use crate::data::upgrade::{Grant, Upgrade};

    fn upgrade(id: u32, slot: &str, xws: &str) -> Upgrade {
        Upgrade {
            id,
            name: format!("upgrade {id}"),
            slot: slot.to_string(),
            ship: None,
            size: None,
            points: 2,
            xws: xws.to_string(),
            dual_card_name: None,
            grants: Vec::new(),
        }
    }

    #[test]
    fn reports_duplicates_and_broken_references() {
        let mut granting = upgrade(2, "Title", "title");
        granting.grants.push(Grant {
            grant_type: "slot".to_string(),
            name: None,
        });
        let catalog = Catalog::from_parts(
            vec![upgrade(1, "Torpedo", "torp"), upgrade(1, "Missile", "missile"), granting],
            Vec::new(),
            vec![Ship {
                id: "xwing".to_string(),
                name: "X-wing".to_string(),
                size: "small".to_string(),
                starting_xp: 0,
                starting_upgrades: vec![99],
                upgrade_slots: vec!["Torpedo".to_string()],
            }],
            Vec::new(),
        );

        let report = validate_catalog(&catalog);
        assert!(report.has_errors());
        let messages: Vec<&str> = report
            .diagnostics
            .iter()
            .map(|d| d.message.as_str())
            .collect();
        assert!(messages.contains(&"duplicate upgrade id 1"));
        assert!(messages.contains(&"slot grant without a slot 'name'"));
        assert!(messages.contains(&"unknown starting upgrade id 99"));
    }

    #[test]
    fn clean_catalog_has_no_errors() {
        let catalog = Catalog::from_parts(
            vec![upgrade(1, "Torpedo", "torp")],
            Vec::new(),
            vec![Ship {
                id: "xwing".to_string(),
                name: "X-wing".to_string(),
                size: "small".to_string(),
                starting_xp: 0,
                starting_upgrades: Vec::new(),
                upgrade_slots: vec!["Torpedo".to_string(), "Elite".to_string()],
            }],
            Vec::new(),
        );
        let report = validate_catalog(&catalog);
        assert!(!report.has_errors());
        assert!(report.diagnostics.is_empty());
    }
}
