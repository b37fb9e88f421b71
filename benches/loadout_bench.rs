//! Loadout state derivation: full refresh cost with and without grant cascades.
//!
//! Run with: `cargo bench --bench loadout`

use std::path::Path;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hotac::build::{BuildContext, UpgradesModel};
use hotac::data::{Catalog, Grant, Ship, Upgrade};
use hotac::ledger::XpItem;
use hotac::parallel::{replay_histories, WorkerPool};

/// A chassis with one root slot and a chain of `depth` cards, each granting the next slot.
fn chain_catalog(depth: u32) -> (Arc<Catalog>, Vec<u32>) {
    let cards = (1..=depth)
        .map(|level| Upgrade {
            id: level,
            name: format!("Link {level}"),
            slot: format!("Link{level}"),
            ship: None,
            size: None,
            points: 1,
            xws: format!("link{level}"),
            dual_card_name: None,
            grants: vec![Grant {
                grant_type: "slot".to_string(),
                name: Some(format!("Link{}", level + 1)),
            }],
        })
        .collect();
    let ship = Ship {
        id: "chain".to_string(),
        name: "Chain".to_string(),
        size: "small".to_string(),
        starting_xp: 0,
        starting_upgrades: Vec::new(),
        upgrade_slots: vec!["Link1".to_string()],
    };
    let ids = (1..=depth).rev().collect();
    (Arc::new(Catalog::from_parts(cards, Vec::new(), vec![ship], Vec::new())), ids)
}

fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("refresh_upgrades_state");
    for depth in [1u32, 8, 32] {
        let (catalog, ids) = chain_catalog(depth);
        let ship = Arc::clone(catalog.ship("chain").expect("chain ship"));
        let mut context = BuildContext::new(&catalog, ship, 2);
        let mut model = UpgradesModel::new(Arc::clone(&catalog), &mut context, &ids, &ids, &[], &[]);

        group.throughput(Throughput::Elements(u64::from(depth)));
        group.bench_with_input(BenchmarkId::new("grant_chain", depth), &depth, |b, _| {
            b.iter(|| {
                model.refresh_upgrades_state(&mut context);
                black_box(model.equipped_upgrades().len())
            })
        });
    }
    group.finish();
}

fn bench_replay(c: &mut Criterion) {
    let catalog = Catalog::load_dir(Path::new(env!("CARGO_MANIFEST_DIR")).join("data")).expect("sample data");
    let history = vec![
        XpItem::StartingShip { ship_id: "awing".into() },
        XpItem::GainXp { xp: 20 },
        XpItem::BuyUpgrade { upgrade_id: 18 },
        XpItem::BuyUpgrade { upgrade_id: 10 },
        XpItem::BuyUpgrade { upgrade_id: 10 },
        XpItem::BuyPilotAbility { pilot_id: 8 },
        XpItem::PilotSkillIncrease { pilot_skill: 3 },
        XpItem::PilotSkillIncrease { pilot_skill: 4 },
        XpItem::ShipChange { ship_id: "xwing".into() },
        XpItem::BuyUpgrade { upgrade_id: 1 },
    ];

    let mut group = c.benchmark_group("replay_histories");
    group.sample_size(30);
    for count in [64usize, 512] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let histories = vec![history.clone(); count];
                black_box(replay_histories(&catalog, histories, &WorkerPool::default()))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_refresh, bench_replay);
criterion_main!(benches);
