//! Link-based deduplication and date ordering.

use crate::models::Item;
use itertools::Itertools;
use tracing::debug;

/// Keep the first item per non-empty link, then order by date, newest first.
///
/// The sort is stable, so items sharing a timestamp keep their input order.
pub fn dedup_and_sort(items: Vec<Item>) -> Vec<Item> {
    let before = items.len();
    let mut kept: Vec<Item> = items
        .into_iter()
        .filter(|item| !item.link.is_empty())
        .unique_by(|item| item.link.clone())
        .collect();
    kept.sort_by(|a, b| b.iso_date.cmp(&a.iso_date));
    debug!(before, after = kept.len(), "Deduplicated items by link");
    kept
}
