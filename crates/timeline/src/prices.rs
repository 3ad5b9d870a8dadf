use crate::error::TimelineError;
use crate::group::group_stable;
use chrono::{DateTime, Utc};
use core_types::{MerchantId, OfferEvent, Timestamped};

/// A successful offer placement or update with its timestamp parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedOffer {
    pub merchant_id: MerchantId,
    pub offer_id: u64,
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Every price a merchant set, across all of its offers.
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantPrices {
    pub merchant_id: MerchantId,
    pub points: Vec<PricePoint>,
}

/// The price history of a single offer.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferPrices {
    pub offer_id: u64,
    /// The merchant that placed the offer (taken from its first event).
    pub merchant_id: MerchantId,
    pub points: Vec<PricePoint>,
}

/// Collects the successful offer events of both categories into one time-ordered stream.
///
/// Placements come before updates in the concatenation, and the time sort is
/// stable, so a placement and an update at the same instant keep that order.
pub fn successful_offers(
    adds: &[OfferEvent],
    updates: &[OfferEvent],
    success_code: u16,
) -> Result<Vec<TimedOffer>, TimelineError> {
    let mut offers = adds
        .iter()
        .chain(updates)
        .filter(|offer| offer.succeeded(success_code))
        .map(|offer| -> Result<TimedOffer, TimelineError> {
            Ok(TimedOffer {
                merchant_id: offer.merchant_id.clone(),
                offer_id: offer.offer_id,
                timestamp: offer.parsed_timestamp()?,
                price: offer.price,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    offers.sort_by_key(|offer| offer.timestamp);
    Ok(offers)
}

/// One price series per merchant, merchants in order of their first offer event.
pub fn prices_by_merchant(offers: &[TimedOffer]) -> Vec<MerchantPrices> {
    group_stable(offers, |offer| offer.merchant_id.clone())
        .into_iter()
        .map(|(merchant_id, offers)| MerchantPrices {
            merchant_id,
            points: offers.into_iter().map(price_point).collect(),
        })
        .collect()
}

/// One price series per offer, offers in order of their first event.
pub fn prices_by_offer(offers: &[TimedOffer]) -> Vec<OfferPrices> {
    group_stable(offers, |offer| offer.offer_id)
        .into_iter()
        .map(|(offer_id, offers)| OfferPrices {
            offer_id,
            merchant_id: offers[0].merchant_id.clone(),
            points: offers.into_iter().map(price_point).collect(),
        })
        .collect()
}

fn price_point(offer: &TimedOffer) -> PricePoint {
    PricePoint {
        timestamp: offer.timestamp,
        price: offer.price,
    }
}
