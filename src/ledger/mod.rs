//! Experience ledger: the ordered history of a pilot's XP gains and spends.

pub mod report;
pub mod xp_item;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::Catalog;
use crate::error::Result;

pub use report::write_csv;
pub use xp_item::{ExportEntry, ExportValue, XpItem};

/// A history entry as found in stored files: the current `{key, value}`
/// object or the older `KEY=value` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredEntry {
    Entry(ExportEntry),
    Legacy(String),
}

impl StoredEntry {
    pub fn decode(&self) -> XpItem {
        match self {
            StoredEntry::Entry(entry) => XpItem::parse_export_entry(entry),
            StoredEntry::Legacy(encoded) => XpItem::parse_legacy(encoded),
        }
    }
}

/// One ledger line resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelledEntry {
    pub key: String,
    pub value: ExportValue,
    pub label: String,
    pub cost: i64,
    pub running_total: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XpLedger {
    items: Vec<XpItem>,
}

impl XpLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<XpItem>) -> Self {
        XpLedger { items }
    }

    pub fn from_stored(entries: &[StoredEntry]) -> Self {
        XpLedger {
            items: entries.iter().map(StoredEntry::decode).collect(),
        }
    }

    /// Read a JSON array of stored entries from disk.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let entries: Vec<StoredEntry> = serde_json::from_str(&raw)?;
        Ok(Self::from_stored(&entries))
    }

    pub fn push(&mut self, item: XpItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[XpItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// XP left to spend: the sum of every entry's cost.
    pub fn total_xp(&self, catalog: &Catalog) -> i64 {
        self.items.iter().map(|item| item.cost(catalog)).sum()
    }

    pub fn entries(&self) -> Vec<ExportEntry> {
        self.items.iter().map(XpItem::export_entry).collect()
    }

    pub fn labelled(&self, catalog: &Catalog) -> Vec<LabelledEntry> {
        let mut running_total = 0;
        self.items
            .iter()
            .map(|item| {
                let cost = item.cost(catalog);
                running_total += cost;
                let ExportEntry { key, value } = item.export_entry();
                LabelledEntry {
                    key,
                    value,
                    label: item.label(catalog),
                    cost,
                    running_total,
                }
            })
            .collect()
    }
}

impl FromIterator<XpItem> for XpLedger {
    fn from_iter<I: IntoIterator<Item = XpItem>>(iter: I) -> Self {
        XpLedger {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_entries_mix_current_and_legacy_forms() {
        let entries: Vec<StoredEntry> = serde_json::from_str(
            r#"[{"key": "SST", "value": "xwing"}, "XP=4", {"key": "PS", "value": 3}, "bogus"]"#,
        )
        .unwrap();
        let ledger = XpLedger::from_stored(&entries);
        assert_eq!(
            ledger.items(),
            &[
                XpItem::StartingShip { ship_id: "xwing".into() },
                XpItem::GainXp { xp: 4 },
                XpItem::PilotSkillIncrease { pilot_skill: 3 },
                XpItem::Unknown {
                    key: "bogus".into(),
                    value: ExportValue::Text(String::new())
                },
            ]
        );
    }

    #[test]
    fn odd_values_do_not_fail_the_whole_history() {
        let entries: Vec<StoredEntry> = serde_json::from_str(
            r#"[{"key": "SST", "value": "xwing"}, {"key": "ZZ", "value": null}, {"key": "XP", "value": 2.5}]"#,
        )
        .unwrap();
        let ledger = XpLedger::from_stored(&entries);
        assert_eq!(ledger.len(), 3);
        assert_eq!(
            ledger.items()[1],
            XpItem::Unknown {
                key: "ZZ".into(),
                value: ExportValue::Other(serde_json::Value::Null)
            }
        );
        assert_eq!(ledger.items()[2], XpItem::GainXp { xp: 2 });
    }

    #[test]
    fn labelled_keeps_a_running_total() {
        let catalog = Catalog::default();
        let ledger: XpLedger = vec![XpItem::GainXp { xp: 10 }, XpItem::ShipChange { ship_id: "x".into() }]
            .into_iter()
            .collect();
        let totals: Vec<i64> = ledger.labelled(&catalog).iter().map(|l| l.running_total).collect();
        assert_eq!(totals, vec![10, 5]);
        assert_eq!(ledger.total_xp(&catalog), 5);
    }
}
