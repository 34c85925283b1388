//! # Domain Types
//!
//! Core domain types handed to a picking session by the order list.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Order       │   │   OrderItem     │   │  BinLocation    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  id             │   │  id             │       │
//! │  │  customer       │   │  article_number │   │  code (scan)    │       │
//! │  │  delivery_date  │   │  quantity       │   │  position       │       │
//! │  │  items          │   │  bin_ids ───────┼──►│                 │       │
//! │  │  bin_locations ─┼──►│  weight_grams   │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  OrderStatus    │   │ ArticleStatus   │   │  SyncStatus     │       │
//! │  │  Open           │   │  Active         │   │  Pending        │       │
//! │  │  InPicking      │   │  Inactive       │   │  Synced         │       │
//! │  │  Picked ...     │   │  Discontinued   │   │  Failed         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Weak Bin References
//! Items name their candidate bins by [`BinId`]. The bins themselves live on
//! the order and are resolved with [`Order::bin`]; an item never owns a bin.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export)]
        pub struct $name(String);

        impl $name {
            /// Returns the identifier as a string slice.
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                $name(value)
            }
        }
    };
}

string_id!(
    /// Backend identifier of an order.
    OrderId
);
string_id!(
    /// Identifier of an order line.
    ItemId
);
string_id!(
    /// Identifier of a storage bin.
    BinId
);

// =============================================================================
// Bin Location
// =============================================================================

/// A physical storage unit identified by a scannable code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BinLocation {
    pub id: BinId,

    /// Code printed on the bin label, compared against scans.
    pub code: String,

    /// Shelf / compartment / floor, free text.
    #[serde(default)]
    pub position: String,
}

impl BinLocation {
    pub fn new(id: impl Into<BinId>, code: impl Into<String>, position: impl Into<String>) -> Self {
        BinLocation {
            id: id.into(),
            code: code.into(),
            position: position.into(),
        }
    }

    /// Label shown to the picker, e.g. `A-01-03 (Shelf A / 1 / EG)`.
    pub fn describe(&self) -> String {
        if self.position.is_empty() {
            self.code.clone()
        } else {
            format!("{} ({})", self.code, self.position)
        }
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line of an order that has to be picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderItem {
    pub id: ItemId,

    /// Our article number.
    pub article_number: String,

    /// The customer's article number, when they use their own.
    #[serde(default)]
    pub customer_article_number: Option<String>,

    #[serde(default)]
    pub description: String,

    /// Total quantity to pick.
    pub quantity: u32,

    /// Weight of one unit in grams (used by scale picking).
    #[serde(default)]
    pub weight_grams: Option<u32>,

    /// Candidate bins in preference order.
    #[serde(default)]
    pub bin_ids: Vec<BinId>,
}

impl OrderItem {
    pub fn new(id: impl Into<ItemId>, article_number: impl Into<String>, quantity: u32) -> Self {
        OrderItem {
            id: id.into(),
            article_number: article_number.into(),
            customer_article_number: None,
            description: String::new(),
            quantity,
            weight_grams: None,
            bin_ids: Vec::new(),
        }
    }

    pub fn with_bins<I, B>(mut self, bins: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<BinId>,
    {
        self.bin_ids = bins.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_weight_grams(mut self, grams: u32) -> Self {
        self.weight_grams = Some(grams);
        self
    }

    /// Expected weight of the full line on the scale, if the unit weight is known.
    pub fn expected_weight_grams(&self) -> Option<u64> {
        self.weight_grams
            .map(|grams| u64::from(grams) * u64::from(self.quantity))
    }
}

// =============================================================================
// Order
// =============================================================================

/// A customer order as delivered by the order list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: String,
    pub customer_name: String,

    #[ts(as = "String")]
    pub delivery_date: NaiveDate,

    #[serde(default)]
    pub status: OrderStatus,

    pub items: Vec<OrderItem>,

    /// Bins referenced by the items of this order.
    #[serde(default)]
    pub bin_locations: Vec<BinLocation>,
}

impl Order {
    pub fn new(
        id: impl Into<OrderId>,
        customer_id: impl Into<String>,
        customer_name: impl Into<String>,
        delivery_date: NaiveDate,
    ) -> Self {
        Order {
            id: id.into(),
            customer_id: customer_id.into(),
            customer_name: customer_name.into(),
            delivery_date,
            status: OrderStatus::Open,
            items: Vec::new(),
            bin_locations: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: OrderItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_bin(mut self, bin: BinLocation) -> Self {
        self.bin_locations.push(bin);
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Resolves a bin reference held by one of the items.
    pub fn bin(&self, id: &BinId) -> Option<&BinLocation> {
        self.bin_locations.iter().find(|bin| &bin.id == id)
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Parses the order list payload (a JSON array of orders).
    pub fn list_from_json(json: &str) -> Result<Vec<Order>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// =============================================================================
// Picking Method
// =============================================================================

/// How quantities are confirmed at the picking station.
///
/// Only changes which auxiliary information the station shows; the cursor
/// logic is identical for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PickingMethod {
    /// Picker counts units by hand.
    #[default]
    Manual,
    /// Picker puts the line on a scale and compares against the expected weight.
    Scale,
}

impl fmt::Display for PickingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickingMethod::Manual => write!(f, "manual"),
            PickingMethod::Scale => write!(f, "scale"),
        }
    }
}

impl FromStr for PickingMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manual" => Ok(PickingMethod::Manual),
            "scale" | "weight" => Ok(PickingMethod::Scale),
            other => Err(ValidationError::InvalidFormat {
                field: "picking method".to_string(),
                reason: format!("unknown method '{}', expected manual or scale", other),
            }),
        }
    }
}

// =============================================================================
// Status Taxonomies
// =============================================================================

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OrderStatus {
    #[default]
    Open,
    InPicking,
    Picked,
    Shipped,
    Cancelled,
}

impl OrderStatus {
    /// Whether the order may be handed to a picking session.
    pub fn is_pickable(&self) -> bool {
        match self {
            OrderStatus::Open | OrderStatus::InPicking => true,
            OrderStatus::Picked | OrderStatus::Shipped | OrderStatus::Cancelled => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Open => "open",
            OrderStatus::InPicking => "in_picking",
            OrderStatus::Picked => "picked",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "open" | "new" => Ok(OrderStatus::Open),
            "in_picking" | "picking" => Ok(OrderStatus::InPicking),
            "picked" => Ok(OrderStatus::Picked),
            "shipped" | "delivered" => Ok(OrderStatus::Shipped),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            other => Err(ValidationError::InvalidFormat {
                field: "order status".to_string(),
                reason: format!("unknown status '{}'", other),
            }),
        }
    }
}

/// Status of an article in the article master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ArticleStatus {
    #[default]
    Active,
    Inactive,
    Discontinued,
}

impl ArticleStatus {
    pub fn is_orderable(&self) -> bool {
        matches!(self, ArticleStatus::Active)
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleStatus::Active => write!(f, "active"),
            ArticleStatus::Inactive => write!(f, "inactive"),
            ArticleStatus::Discontinued => write!(f, "discontinued"),
        }
    }
}

impl FromStr for ArticleStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(ArticleStatus::Active),
            "inactive" => Ok(ArticleStatus::Inactive),
            "discontinued" => Ok(ArticleStatus::Discontinued),
            other => Err(ValidationError::InvalidFormat {
                field: "article status".to_string(),
                reason: format!("unknown status '{}'", other),
            }),
        }
    }
}

/// Synchronisation state of a record with the accounting backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SyncStatus {
    #[default]
    Pending,
    Synced,
    Failed,
}

impl SyncStatus {
    /// Failed records are highlighted in the list screens.
    pub fn needs_attention(&self) -> bool {
        matches!(self, SyncStatus::Failed)
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Pending => write!(f, "pending"),
            SyncStatus::Synced => write!(f, "synced"),
            SyncStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for SyncStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(SyncStatus::Pending),
            "synced" | "success" => Ok(SyncStatus::Synced),
            "failed" | "error" => Ok(SyncStatus::Failed),
            other => Err(ValidationError::InvalidFormat {
                field: "sync status".to_string(),
                reason: format!("unknown status '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bin_resolution_is_by_id() {
        let order = Order::new("SO-1", "C-1", "Acme", date(2026, 3, 2))
            .with_bin(BinLocation::new("b1", "A-01", "Shelf A"))
            .with_item(OrderItem::new("i1", "ART-1", 2).with_bins(["b1", "b404"]));

        let item = &order.items[0];
        assert_eq!(order.bin(&item.bin_ids[0]).unwrap().code, "A-01");
        assert!(order.bin(&item.bin_ids[1]).is_none());
    }

    #[test]
    fn test_describe_bin() {
        assert_eq!(
            BinLocation::new("b1", "A-01-03", "Shelf A / 1 / EG").describe(),
            "A-01-03 (Shelf A / 1 / EG)"
        );
        assert_eq!(BinLocation::new("b2", "K-7", "").describe(), "K-7");
    }

    #[test]
    fn test_expected_weight() {
        let item = OrderItem::new("i1", "ART-1", 3).with_weight_grams(250);
        assert_eq!(item.expected_weight_grams(), Some(750));
        assert_eq!(OrderItem::new("i2", "ART-2", 3).expected_weight_grams(), None);
    }

    #[test]
    fn test_order_json_is_camel_case() {
        let json = r#"[{
            "id": "SO-7",
            "customerId": "C-9",
            "customerName": "Formenbau Nord",
            "deliveryDate": "2026-03-02",
            "status": "in_picking",
            "items": [{
                "id": "i1",
                "articleNumber": "M-200",
                "quantity": 4,
                "weightGrams": 120,
                "binIds": ["b1"]
            }],
            "binLocations": [{"id": "b1", "code": "R2-F3", "position": "Regal 2"}]
        }]"#;

        let orders = Order::list_from_json(json).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, OrderStatus::InPicking);
        assert_eq!(orders[0].items[0].bin_ids[0].as_str(), "b1");
        assert_eq!(orders[0].total_quantity(), 4);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("in-picking".parse::<OrderStatus>().unwrap(), OrderStatus::InPicking);
        assert_eq!("Canceled".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
        assert!("lost".parse::<OrderStatus>().is_err());

        assert_eq!("error".parse::<SyncStatus>().unwrap(), SyncStatus::Failed);
        assert!(SyncStatus::Failed.needs_attention());
        assert!(!ArticleStatus::Discontinued.is_orderable());
    }

    #[test]
    fn test_order_status_pickable() {
        assert!(OrderStatus::Open.is_pickable());
        assert!(OrderStatus::InPicking.is_pickable());
        assert!(!OrderStatus::Shipped.is_pickable());
    }

    #[test]
    fn test_picking_method_parsing() {
        assert_eq!("scale".parse::<PickingMethod>().unwrap(), PickingMethod::Scale);
        assert_eq!(PickingMethod::default(), PickingMethod::Manual);
        assert!("robot".parse::<PickingMethod>().is_err());
    }
}
