//! # Delivery-Date Filter
//!
//! Narrows the orders of a picking session by delivery date.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  Delivery date:  [ all ▾ ]  [ past ]  [ 2026-03-02 ]      │
//! │                                                           │
//! │  all         every order                                  │
//! │  past        delivery date strictly before today          │
//! │  YYYY-MM-DD  delivery date on that calendar day           │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! "Today" is always supplied by the caller; this module never reads the clock.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::Order;

/// Delivery-date bucket selected in the picking dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeliveryFilter {
    #[default]
    All,
    /// Overdue orders: delivery date strictly before today.
    Past,
    On(NaiveDate),
}

impl DeliveryFilter {
    /// Whether an order delivered on `date` passes the filter.
    pub fn matches(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            DeliveryFilter::All => true,
            DeliveryFilter::Past => date < today,
            DeliveryFilter::On(day) => date == *day,
        }
    }

    /// Returns the orders passing the filter, in their original order.
    pub fn apply(&self, orders: &[Order], today: NaiveDate) -> Vec<Order> {
        orders
            .iter()
            .filter(|order| self.matches(order.delivery_date, today))
            .cloned()
            .collect()
    }
}

impl fmt::Display for DeliveryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryFilter::All => write!(f, "all"),
            DeliveryFilter::Past => write!(f, "past"),
            DeliveryFilter::On(day) => write!(f, "{}", day.format("%Y-%m-%d")),
        }
    }
}

impl FromStr for DeliveryFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "all" | "" => Ok(DeliveryFilter::All),
            "past" | "overdue" => Ok(DeliveryFilter::Past),
            _ => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(DeliveryFilter::On)
                .map_err(|e| ValidationError::InvalidFormat {
                    field: "delivery filter".to_string(),
                    reason: format!("expected all, past or YYYY-MM-DD ({})", e),
                }),
        }
    }
}

impl TryFrom<String> for DeliveryFilter {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeliveryFilter> for String {
    fn from(filter: DeliveryFilter) -> Self {
        filter.to_string()
    }
}

/// Distinct delivery dates of the given orders, ascending.
///
/// Feeds the date selector next to the `all` / `past` buckets.
pub fn delivery_dates(orders: &[Order]) -> Vec<NaiveDate> {
    orders
        .iter()
        .map(|order| order.delivery_date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
