//! Combines store-list rows with their queue lookups.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use qdash_core::store::UNKNOWN_STATUS;
use qdash_core::{RawQueueEntry, RawStoreListEntry, Store};

/// Builds one [`Store`] per store-list row, in store-list order.
///
/// Queue data is supplementary: a row with no entry in `queues` (or a `None`
/// entry) still produces a store with an empty queue. The waiting-group count
/// prefers the queue feed, then the store list, then zero.
#[must_use]
pub fn merge_stores(
    stores: &[RawStoreListEntry],
    queues: &HashMap<i64, Option<RawQueueEntry>>,
    now: DateTime<Utc>,
) -> Vec<Store> {
    stores
        .iter()
        .map(|row| {
            let queue = queues.get(&row.id).and_then(Option::as_ref);
            merge_one(row, queue, now)
        })
        .collect()
}

fn merge_one(row: &RawStoreListEntry, queue: Option<&RawQueueEntry>, now: DateTime<Utc>) -> Store {
    let store_status = row
        .store_status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_STATUS)
        .to_string();

    let waiting_group = queue
        .and_then(|q| q.waiting_group)
        .or(row.waiting_group)
        .unwrap_or(0);

    Store {
        shop_id: row.id,
        name: row.name.clone().unwrap_or_default(),
        name_en: row.name_en.clone().unwrap_or_default(),
        address: row.address.clone().unwrap_or_default(),
        region: row.region.clone().unwrap_or_default(),
        area: row.area.clone().unwrap_or_default(),
        store_status,
        waiting_group,
        store_queue: queue.map(|q| q.store_queue.clone()).unwrap_or_default(),
        latitude: row.latitude,
        longitude: row.longitude,
        timestamp: now,
    }
}
