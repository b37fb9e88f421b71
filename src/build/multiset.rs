//! Multiset helpers over card lists. Cards are compared by catalog id and
//! each operation consumes at most one instance per matching entry.

use std::sync::Arc;

use crate::build::card::CatalogId;

/// Items of `list` that have an unused counterpart in `pool`, in `list` order.
pub(crate) fn intersection_single<T: CatalogId>(list: &[Arc<T>], pool: &[Arc<T>]) -> Vec<Arc<T>> {
    let mut available: Vec<&Arc<T>> = pool.iter().collect();
    let mut kept = Vec::with_capacity(list.len());
    for item in list {
        if let Some(position) = available
            .iter()
            .position(|candidate| candidate.catalog_id() == item.catalog_id())
        {
            available.swap_remove(position);
            kept.push(Arc::clone(item));
        }
    }
    kept
}

/// `list` with one instance removed for every entry of `remove`.
pub(crate) fn difference_single<T: CatalogId>(list: &[Arc<T>], remove: &[Arc<T>]) -> Vec<Arc<T>> {
    let mut remaining = list.to_vec();
    for item in remove {
        remove_first(&mut remaining, item.catalog_id());
    }
    remaining
}

/// `list` with every copy of any card present in `remove` dropped.
pub(crate) fn difference_all<T: CatalogId>(list: &[Arc<T>], remove: &[Arc<T>]) -> Vec<Arc<T>> {
    list.iter()
        .filter(|item| !remove.iter().any(|r| r.catalog_id() == item.catalog_id()))
        .cloned()
        .collect()
}

/// Remove the first entry with `id`, returning it.
pub(crate) fn remove_first<T: CatalogId>(list: &mut Vec<Arc<T>>, id: u32) -> Option<Arc<T>> {
    let position = list.iter().position(|item| item.catalog_id() == id)?;
    Some(list.remove(position))
}
