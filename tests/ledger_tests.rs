use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use hotac::data::Catalog;
use hotac::ledger::{write_csv, ExportEntry, ExportValue, StoredEntry, XpItem, XpLedger};

fn sample_catalog() -> Arc<Catalog> {
    Catalog::load_dir(Path::new(env!("CARGO_MANIFEST_DIR")).join("data")).expect("sample data should load")
}

fn unique_temp_path(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("hotac-{name}-{stamp}.json"))
}

#[test]
fn upgrade_costs_follow_printed_points() {
    let catalog = sample_catalog();
    // Adaptability is printed at 0 points, even though it is an Elite card.
    assert_eq!(XpItem::BuyUpgrade { upgrade_id: 8 }.cost(&catalog), 0);
    // Push the Limit: 3-point Elite.
    assert_eq!(XpItem::BuyUpgrade { upgrade_id: 7 }.cost(&catalog), -6);
    assert_eq!(XpItem::BuyUpgrade { upgrade_id: 13 }.cost(&catalog), -7);
    assert_eq!(XpItem::BuyPilotAbility { pilot_id: 5 }.cost(&catalog), -9);
    assert_eq!(XpItem::StartingShip { ship_id: "hwk290".into() }.cost(&catalog), 3);
}

#[test]
fn labels_use_catalog_names() {
    let catalog = sample_catalog();
    let cases = [
        (XpItem::ShipChange { ship_id: "bwing".into() }, "Change ship: B-wing"),
        (XpItem::StartingShip { ship_id: "xwing".into() }, "Starting ship: X-wing"),
        (XpItem::PilotSkillIncrease { pilot_skill: 4 }, "Upgrade pilot skill: PS 4"),
        (XpItem::MissionCompleted { mission_id: 2 }, "Completed mission: Rescue Rebel Operatives"),
        (XpItem::GainXp { xp: 7 }, "Gain XP"),
        (XpItem::BuyUpgrade { upgrade_id: 9 }, "Elite: Adaptability"),
        (XpItem::BuyPilotAbility { pilot_id: 13 }, "Pilot Ability: Kyle Katarn"),
        (XpItem::LoseUpgrade { upgrade_id: 8 }, "Lose upgrade: Adaptability"),
        (XpItem::LosePilotAbility { pilot_id: 4 }, "Lose pilot ability: Luke Skywalker"),
    ];
    for (item, label) in cases {
        assert_eq!(item.label(&catalog), label);
    }
}

#[test]
fn gain_xp_round_trips_through_json() {
    let item = XpItem::GainXp { xp: 5 };
    let json = serde_json::to_string(&item.export_entry()).unwrap();
    assert_eq!(json, r#"{"key":"XP","value":5}"#);
    let entry: ExportEntry = serde_json::from_str(&json).unwrap();
    assert_eq!(XpItem::parse_export_entry(&entry), item);
}

#[test]
fn every_variant_survives_export_and_parse() {
    let items = vec![
        XpItem::StartingShip { ship_id: "ywing".into() },
        XpItem::ShipChange { ship_id: "awing".into() },
        XpItem::PilotSkillIncrease { pilot_skill: 7 },
        XpItem::MissionCompleted { mission_id: 3 },
        XpItem::GainXp { xp: -1 },
        XpItem::BuyUpgrade { upgrade_id: 21 },
        XpItem::BuyPilotAbility { pilot_id: 2 },
        XpItem::LoseUpgrade { upgrade_id: 21 },
        XpItem::LosePilotAbility { pilot_id: 2 },
    ];
    let ledger = XpLedger::from_items(items.clone());
    let stored: Vec<StoredEntry> = ledger.entries().into_iter().map(StoredEntry::Entry).collect();
    assert_eq!(XpLedger::from_stored(&stored).items(), items.as_slice());
}

#[test]
fn legacy_histories_load_from_disk() {
    let catalog = sample_catalog();
    let path = unique_temp_path("legacy-history");
    fs::write(&path, r#"["SST=hwk290", "MIS=1", "XP=6", {"key": "UP", "value": "21"}, "PA=12", "LEGACY"]"#)
        .expect("history should be written");

    let ledger = XpLedger::load_file(&path).expect("history should load");
    assert_eq!(ledger.len(), 6);
    assert_eq!(ledger.items()[3], XpItem::BuyUpgrade { upgrade_id: 21 });
    assert!(ledger.items()[5].is_unknown());
    // 3 starting XP + 6 gained - 5 Gunner - 4 Roark's ability
    assert_eq!(ledger.total_xp(&catalog), 0);

    let _ = fs::remove_file(path);
}

#[test]
fn unknown_entries_keep_their_raw_encoding() {
    let entry = ExportEntry {
        key: "UP".to_string(),
        value: ExportValue::Text("not-a-number".to_string()),
    };
    let item = XpItem::parse_export_entry(&entry);
    assert!(item.is_unknown());
    assert_eq!(item.export_entry(), entry);
    assert_eq!(item.cost(&Catalog::default()), 0);
}

#[test]
fn csv_report_lists_running_totals() {
    let catalog = sample_catalog();
    let ledger = XpLedger::from_items(vec![
        XpItem::StartingShip { ship_id: "ywing".into() },
        XpItem::GainXp { xp: 4 },
        XpItem::BuyUpgrade { upgrade_id: 7 },
    ]);
    let mut out = Vec::new();
    write_csv(&ledger, &catalog, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(
        rows,
        vec![
            "index,key,value,label,cost,running_total",
            "0,SST,ywing,Starting ship: Y-wing,2,2",
            "1,XP,4,Gain XP,4,6",
            "2,UP,7,Elite: Push the Limit,-6,0",
        ]
    );
}
