//! Parallel replay of stored build histories.

use std::sync::Arc;

use rayon::prelude::*;

use crate::build::{BuildSummary, ShipBuild};
use crate::data::Catalog;
use crate::error::Result;
use crate::ledger::XpItem;
use crate::parallel::pool::WorkerPool;

/// Replay each history into its own build. Results keep the input order.
pub fn replay_histories(
    catalog: &Arc<Catalog>,
    histories: Vec<Vec<XpItem>>,
    pool: &WorkerPool,
) -> Vec<Result<BuildSummary>> {
    pool.install(|| {
        histories
            .into_par_iter()
            .map(|items| ShipBuild::from_history(Arc::clone(catalog), items).map(|build| build.summary()))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Ship;
    use crate::error::Error;

    #[test]
    fn results_follow_input_order() {
        let catalog = Arc::new(Catalog::from_parts(
            Vec::new(),
            Vec::new(),
            vec![Ship {
                id: "xwing".to_string(),
                name: "X-wing".to_string(),
                size: "small".to_string(),
                starting_xp: 5,
                starting_upgrades: Vec::new(),
                upgrade_slots: vec!["Torpedo".to_string()],
            }],
            Vec::new(),
        ));
        let start = XpItem::StartingShip { ship_id: "xwing".into() };
        let histories = vec![
            vec![start.clone(), XpItem::GainXp { xp: 1 }],
            vec![XpItem::GainXp { xp: 2 }],
            vec![start, XpItem::GainXp { xp: 3 }],
        ];

        let results = replay_histories(&catalog, histories, &WorkerPool::with_workers(2));
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().map(|s| s.total_xp).ok(), Some(6));
        assert!(matches!(results[1], Err(Error::MissingStartingShip)));
        assert_eq!(results[2].as_ref().map(|s| s.total_xp).ok(), Some(8));
    }
}
