//! Response-health classification.
//!
//! Losing queue data is never fatal; losing the store roster is.

/// What the store-list fetch produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreListOutcome {
    Unavailable,
    Fetched { stores: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Roster fetched and at least one store has queue data.
    Success { stores: usize, with_queue: usize },
    /// Roster fetched but no store has queue data.
    PartialSuccess { stores: usize },
    StoreListUnavailable,
    NoStoresFound,
}

#[must_use]
pub fn classify(store_list: StoreListOutcome, successful_queue_fetches: usize) -> Classification {
    match store_list {
        StoreListOutcome::Unavailable => Classification::StoreListUnavailable,
        StoreListOutcome::Fetched { stores: 0 } => Classification::NoStoresFound,
        StoreListOutcome::Fetched { stores } if successful_queue_fetches == 0 => {
            Classification::PartialSuccess { stores }
        }
        StoreListOutcome::Fetched { stores } => Classification::Success {
            stores,
            with_queue: successful_queue_fetches,
        },
    }
}

impl Classification {
    #[must_use]
    pub fn status_code(self) -> u16 {
        match self {
            Self::Success { .. } => 200,
            Self::PartialSuccess { .. } => 206,
            Self::NoStoresFound => 404,
            Self::StoreListUnavailable => 503,
        }
    }

    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Machine-readable code; absent for full success.
    #[must_use]
    pub fn error_code(self) -> Option<&'static str> {
        match self {
            Self::Success { .. } => None,
            Self::PartialSuccess { .. } => Some("QUEUE_DATA_UNAVAILABLE"),
            Self::NoStoresFound => Some("NO_STORES_FOUND"),
            Self::StoreListUnavailable => Some("STORE_DATA_UNAVAILABLE"),
        }
    }

    #[must_use]
    pub fn message(self) -> String {
        match self {
            Self::Success { stores, with_queue } => {
                let mut message = format!("Successfully fetched complete data for {stores} stores");
                if with_queue < stores {
                    message.push_str(" Note: Queue data may be incomplete for some stores.");
                }
                message
            }
            Self::PartialSuccess { stores } => format!(
                "Store data available but queue data is currently unavailable. \
                 Showing {stores} stores with limited information."
            ),
            Self::NoStoresFound => "No stores available for the specified parameters".to_string(),
            Self::StoreListUnavailable => {
                "Unable to fetch store information. Please try again later.".to_string()
            }
        }
    }
}
