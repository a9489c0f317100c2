//! Quote data model.
//!
//! A `Quote` is one priced item as delivered to the renderer: stable symbol id, a display
//! name, the last price and the signed 24h change in percent. Every fetch builds a fresh
//! value; quotes are never patched in place.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::CoinboardError;
use crate::result::Result;

/// Priced item for a single symbol.
///
/// Decoding goes through the same checks as [`Quote::new`], so quotes read from the wire or
/// the cache file are never negative or non-finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuoteFields")]
pub struct Quote {
    /// Stable symbol identifier (e.g., `BTC`).
    pub id: String,
    /// Human-readable name (e.g., `Bitcoin`).
    pub display_name: String,
    /// Last price, never negative.
    pub price: f64,
    /// Signed change over the last 24 hours, in percent.
    pub change_percent_24h: f64,
    /// UTC timestamp in milliseconds since Unix epoch at which the quote was fetched.
    pub fetched_at: i64,
}

impl Quote {
    /// Build a quote stamped with the current time.
    ///
    /// Fails with [`CoinboardError::Format`] if the price is negative or either number is
    /// not finite.
    pub fn new(id: &str, display_name: &str, price: f64, change_percent_24h: f64) -> Result<Self> {
        validate(id, price, change_percent_24h)?;
        Ok(Quote {
            id: id.to_string(),
            display_name: display_name.to_string(),
            price,
            change_percent_24h,
            fetched_at: Utc::now().timestamp_millis(),
        })
    }
}

fn validate(id: &str, price: f64, change_percent_24h: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(CoinboardError::Format(format!(
            "invalid price for {}: {}",
            id, price
        )));
    }
    if !change_percent_24h.is_finite() {
        return Err(CoinboardError::Format(format!(
            "invalid 24h change for {}: {}",
            id, change_percent_24h
        )));
    }
    Ok(())
}

/// Unchecked wire shape of [`Quote`].
#[derive(Deserialize)]
struct QuoteFields {
    id: String,
    display_name: String,
    price: f64,
    change_percent_24h: f64,
    fetched_at: i64,
}

impl TryFrom<QuoteFields> for Quote {
    type Error = CoinboardError;

    fn try_from(fields: QuoteFields) -> Result<Self> {
        validate(&fields.id, fields.price, fields.change_percent_24h)?;
        Ok(Quote {
            id: fields.id,
            display_name: fields.display_name,
            price: fields.price,
            change_percent_24h: fields.change_percent_24h,
            fetched_at: fields.fetched_at,
        })
    }
}
