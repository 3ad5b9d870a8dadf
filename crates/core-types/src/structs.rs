use crate::error::CoreError;
use crate::time::parse_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// The opaque identifier of a merchant, stable across all event categories.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerchantId(String);

impl MerchantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MerchantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for MerchantId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MerchantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The dump's merchant id → display name lookup.
///
/// This is the reference set of merchants: summary rows are produced for
/// exactly these ids, in [`MerchantMapping::ranked`] order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerchantMapping(BTreeMap<MerchantId, String>);

impl MerchantMapping {
    pub fn name_of(&self, id: &MerchantId) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &MerchantId) -> bool {
        self.0.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &MerchantId> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merchants ordered by display name, ties broken by id.
    pub fn ranked(&self) -> Vec<(&MerchantId, &str)> {
        let mut ranked: Vec<_> = self.0.iter().map(|(id, name)| (id, name.as_str())).collect();
        ranked.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

impl From<String> for MerchantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<I: Into<MerchantId>, N: Into<String>> FromIterator<(I, N)> for MerchantMapping {
    fn from_iter<T: IntoIterator<Item = (I, N)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(id, name)| (id.into(), name.into())).collect())
    }
}

/// A consumer purchase (`buyOffer`). Quantity decrement and revenue source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseEvent {
    pub merchant_id: MerchantId,
    pub amount: i64,
    pub price: f64,
    pub timestamp: String,
    pub http_code: u16,
}

impl PurchaseEvent {
    /// `amount × price`, regardless of whether the purchase succeeded.
    pub fn revenue(&self) -> f64 {
        self.amount as f64 * self.price
    }

    pub fn succeeded(&self, success_code: u16) -> bool {
        self.http_code == success_code
    }
}

/// A replenishment order placed by a merchant (`producer`). Quantity increment and cost source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    pub merchant_id: MerchantId,
    pub amount: i64,
    pub billing_amount: f64,
    pub timestamp: String,
}

/// A holding cost billed to a merchant (`holding_cost`). No quantity effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingCostEvent {
    pub merchant_id: MerchantId,
    pub cost: f64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// An offer placement or update (`addOffer` / `updateOffer`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferEvent {
    pub merchant_id: MerchantId,
    pub offer_id: u64,
    pub price: f64,
    pub timestamp: String,
    pub http_code: u16,
}

impl OfferEvent {
    pub fn succeeded(&self, success_code: u16) -> bool {
        self.http_code == success_code
    }
}

/// Events that carry a point in time.
pub trait Timestamped {
    fn raw_timestamp(&self) -> &str;

    fn parsed_timestamp(&self) -> Result<DateTime<Utc>, CoreError> {
        parse_timestamp(self.raw_timestamp())
    }
}

impl Timestamped for PurchaseEvent {
    fn raw_timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl Timestamped for OrderEvent {
    fn raw_timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl Timestamped for OfferEvent {
    fn raw_timestamp(&self) -> &str {
        &self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranked_orders_by_display_name() {
        let mapping: MerchantMapping = [("m2", "Bolt"), ("m1", "Acme"), ("m3", "Acme")]
            .into_iter()
            .collect();
        let ranked: Vec<_> = mapping.ranked().into_iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ranked, vec!["m1", "m3", "m2"]);
    }

    #[test]
    fn mapping_deserializes_from_json_object() {
        let mapping: MerchantMapping =
            serde_json::from_str(r#"{"m1":"Acme","m2":"Bolt"}"#).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.name_of(&MerchantId::new("m2")), Some("Bolt"));
        assert!(!mapping.contains(&MerchantId::new("m9")));
    }

    #[test]
    fn purchase_ignores_unknown_fields() {
        let json = r#"{
            "merchant_id": "m1", "offer_id": 7, "amount": 2, "price": 5.5,
            "timestamp": "2018-01-12T09:41:07.251234Z", "http_code": 200,
            "consumer_id": "c42", "left_in_stock": 3
        }"#;
        let purchase: PurchaseEvent = serde_json::from_str(json).unwrap();
        assert_eq!(purchase.revenue(), 11.0);
        assert!(purchase.succeeded(200));
    }

    #[test]
    fn holding_cost_timestamp_is_optional() {
        let event: HoldingCostEvent =
            serde_json::from_str(r#"{"merchant_id": "m1", "cost": 1.25}"#).unwrap();
        assert_eq!(event.timestamp, None);
    }
}
