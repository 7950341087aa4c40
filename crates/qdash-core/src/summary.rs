//! Headline figures shown above the store grid.

use serde::Serialize;

use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_stores: usize,
    pub open_stores: usize,
    pub total_waiting: u64,
    pub total_queue_tickets: usize,
    /// Shop id with the largest waiting group; first wins on ties.
    pub busiest_store: Option<i64>,
}

impl DashboardSummary {
    #[must_use]
    pub fn from_stores(stores: &[Store]) -> Self {
        let mut busiest: Option<&Store> = None;
        for store in stores {
            if busiest.is_none_or(|b| store.waiting_group > b.waiting_group) {
                busiest = Some(store);
            }
        }

        Self {
            total_stores: stores.len(),
            open_stores: stores.iter().filter(|s| s.is_open()).count(),
            total_waiting: stores.iter().map(|s| u64::from(s.waiting_group)).sum(),
            total_queue_tickets: stores.iter().map(|s| s.store_queue.len()).sum(),
            busiest_store: busiest.map(|s| s.shop_id),
        }
    }
}
