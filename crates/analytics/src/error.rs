use core_types::MerchantId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Events reference merchants missing from the mapping: {}", format_ids(.0))]
    UnknownMerchant(Vec<MerchantId>),

    #[error("The {metric} total of merchant '{merchant_id}' is not a finite number")]
    NonFiniteTotal {
        merchant_id: MerchantId,
        metric: &'static str,
    },
}

fn format_ids(ids: &[MerchantId]) -> String {
    ids.iter().map(MerchantId::as_str).collect::<Vec<_>>().join(", ")
}
