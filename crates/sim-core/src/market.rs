//! Commodity market prices.

use crate::resources::ResourceKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

/// Price per unit, in credits, and its qualitative trend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketEntry {
    pub price: Decimal,
    pub trend: Trend,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        })
    }
}

/// Prices for the tradable resources. A resource without an entry cannot be traded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    pub prices: BTreeMap<ResourceKind, MarketEntry>,
}

impl Market {
    pub fn quote(&self, resource: ResourceKind) -> Option<&MarketEntry> {
        self.prices.get(&resource)
    }
}
