use chrono::{DateTime, Utc};
use core_types::{CoreError, MerchantId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("Cannot order events in time: {0}")]
    Timestamp(#[from] CoreError),

    #[error("Inventory quantity of merchant '{merchant_id}' overflowed at {timestamp}")]
    QuantityOverflow {
        merchant_id: MerchantId,
        timestamp: DateTime<Utc>,
    },
}
