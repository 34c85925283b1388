//! # Picking Cursor
//!
//! Tracks where the picker is inside the nested orders → items → bins
//! traversal of a session.
//!
//! ## Traversal
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  orders:   SO-1                    SO-2               SO-3              │
//! │  items:    [i1] ─► [i2] ─► [i3] ─► [i1] ─► [i2] ─►    [i1] ─► EXHAUSTED │
//! │             ▲                                                           │
//! │             └── cursor (order 0, item 0, bin 0, picked 0)               │
//! │                                                                         │
//! │  advance()    ─►  next item, or next order's first item, or EXHAUSTED   │
//! │  retreat()    ◄─  previous item, or previous order's last item          │
//! │                   (no-op at the very first item: clamp, never wrap)     │
//! │  switch_bin() ⟳  next candidate bin of the current item (mod n)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - With a non-empty order set, `order_index` and `item_index` are always in
//!   bounds; orders without items are dropped when a set is installed.
//! - The picked quantity of an item never exceeds its required quantity.
//! - Moving onto an item resets its picked quantity and the bin index.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{BinLocation, Order, OrderItem};

/// Result of [`PickingCursor::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Advance {
    /// Moved to the next item of the same order.
    NextItem,
    /// Moved to the first item of the next order.
    NextOrder,
    /// There was nothing left; the workflow is complete.
    Exhausted,
}

/// Serialisable snapshot of the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CursorPosition {
    pub order_index: usize,
    pub item_index: usize,
    pub bin_index: usize,
    pub picked_quantity: u32,
}

/// Derived progress figures for the dialog header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Progress {
    pub orders_total: usize,
    pub items_total: usize,
    /// Items whose full quantity has been picked.
    pub items_done: usize,
    pub quantity_total: u64,
    pub quantity_picked: u64,
}

/// Position inside the filtered order set of a picking session.
#[derive(Debug, Clone, Default)]
pub struct PickingCursor {
    orders: Vec<Order>,
    /// Picked quantity per order, per item. Mirrors the shape of `orders`.
    picked: Vec<Vec<u32>>,
    order_index: usize,
    item_index: usize,
    bin_index: usize,
    exhausted: bool,
}

impl PickingCursor {
    /// Creates a cursor at `(0,0,0,0)` over the given orders.
    pub fn new(orders: Vec<Order>) -> Self {
        let mut cursor = PickingCursor::default();
        cursor.reset(orders);
        cursor
    }

    /// Installs a new order set and moves back to `(0,0,0,0)`.
    pub fn reset(&mut self, orders: Vec<Order>) {
        self.orders = orders
            .into_iter()
            .filter(|order| !order.items.is_empty())
            .collect();
        self.picked = self
            .orders
            .iter()
            .map(|order| vec![0; order.items.len()])
            .collect();
        self.order_index = 0;
        self.item_index = 0;
        self.bin_index = 0;
        self.exhausted = false;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// True once `advance` has run past the last item.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn current_order(&self) -> Option<&Order> {
        self.orders.get(self.order_index)
    }

    pub fn current_item(&self) -> Option<&OrderItem> {
        self.current_order()
            .and_then(|order| order.items.get(self.item_index))
    }

    /// The bin the picker should go to, resolved through the order.
    pub fn current_bin(&self) -> Option<&BinLocation> {
        let order = self.current_order()?;
        let bin_id = order.items.get(self.item_index)?.bin_ids.get(self.bin_index)?;
        order.bin(bin_id)
    }

    pub fn picked_quantity(&self) -> u32 {
        self.picked
            .get(self.order_index)
            .and_then(|items| items.get(self.item_index))
            .copied()
            .unwrap_or(0)
    }

    /// True when the current item has its full quantity.
    pub fn item_complete(&self) -> bool {
        self.current_item()
            .is_some_and(|item| self.picked_quantity() >= item.quantity)
    }

    pub fn position(&self) -> CursorPosition {
        CursorPosition {
            order_index: self.order_index,
            item_index: self.item_index,
            bin_index: self.bin_index,
            picked_quantity: self.picked_quantity(),
        }
    }

    pub fn progress(&self) -> Progress {
        let mut progress = Progress {
            orders_total: self.orders.len(),
            ..Progress::default()
        };

        for (order, picked) in self.orders.iter().zip(&self.picked) {
            for (item, &count) in order.items.iter().zip(picked) {
                progress.items_total += 1;
                progress.quantity_total += u64::from(item.quantity);
                progress.quantity_picked += u64::from(count);
                if count >= item.quantity {
                    progress.items_done += 1;
                }
            }
        }

        progress
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Moves to the next item, crossing into the next order when needed.
    pub fn advance(&mut self) -> Advance {
        let Some(items_in_order) = self.current_order().map(|order| order.items.len()) else {
            self.exhausted = true;
            return Advance::Exhausted;
        };
        if self.exhausted {
            return Advance::Exhausted;
        }

        if self.item_index + 1 < items_in_order {
            self.move_to(self.order_index, self.item_index + 1);
            Advance::NextItem
        } else if self.order_index + 1 < self.orders.len() {
            self.move_to(self.order_index + 1, 0);
            Advance::NextOrder
        } else {
            self.exhausted = true;
            Advance::Exhausted
        }
    }

    /// Moves to the previous item; clamps at the very first one.
    ///
    /// Returns whether the cursor changed.
    pub fn retreat(&mut self) -> bool {
        if self.exhausted {
            self.exhausted = false;
            return true;
        }

        if self.item_index > 0 {
            self.move_to(self.order_index, self.item_index - 1);
            true
        } else if self.order_index > 0 {
            let previous = self.order_index - 1;
            let last_item = self.orders[previous].items.len() - 1;
            self.move_to(previous, last_item);
            true
        } else {
            false
        }
    }

    /// Cycles to the next candidate bin. No-op with fewer than two candidates.
    pub fn switch_bin(&mut self) -> bool {
        let candidates = self.current_item().map_or(0, |item| item.bin_ids.len());
        if candidates < 2 {
            return false;
        }
        self.bin_index = (self.bin_index + 1) % candidates;
        true
    }

    /// Counts one unit of the current item, capped at its quantity.
    ///
    /// Returns the new picked quantity, or `None` without a current item.
    pub fn record_pick(&mut self) -> Option<u32> {
        let total = self.current_item()?.quantity;
        let slot = self
            .picked
            .get_mut(self.order_index)?
            .get_mut(self.item_index)?;
        *slot = (*slot + 1).min(total);
        Some(*slot)
    }

    fn move_to(&mut self, order_index: usize, item_index: usize) {
        self.order_index = order_index;
        self.item_index = item_index;
        self.bin_index = 0;
        self.picked[order_index][item_index] = 0;
    }
}
