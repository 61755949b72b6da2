use serde::{Deserialize, Serialize};

use crate::engine::Cart;
use crate::types::{CartItem, PendingAddition, RestaurantRef};

/// Point-in-time, read-only view of the cart as UI code consumes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub restaurant: Option<RestaurantRef>,
    pub items: Vec<CartItem>,
    pub item_count: i64,
    pub subtotal_micros: i64,
    pub show_restaurant_change_warning: bool,
    pub pending_add_item: Option<PendingAddition>,
}

impl CartSnapshot {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Cart {
    /// Clone the current state into a [`CartSnapshot`].
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            restaurant: self.restaurant().cloned(),
            items: self.items().cloned().collect(),
            item_count: self.item_count(),
            subtotal_micros: self.subtotal_micros(),
            show_restaurant_change_warning: self.show_restaurant_change_warning(),
            pending_add_item: self.pending_add_item().cloned(),
        }
    }
}
