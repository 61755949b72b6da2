//! fdc-cart
//!
//! Cart Reconciliation Engine
//! - One active cart, scoped to one restaurant at a time
//! - Lines deduplicated by an order-independent configuration key
//! - Cross-restaurant adds are staged behind an explicit confirmation gate
//! - Derived totals (item count, subtotal) recomputed from lines on read
//! - Pure deterministic logic (no IO, no wall-clock, no randomness)
//!
//! Money is integer micros (1e-6 of the currency unit) throughout.

mod command;
mod engine;
mod key;
mod outcome;
mod pricing;
mod snapshot;
mod types;

pub mod store;

pub use command::{CartCommand, LineRef};
pub use engine::{Cart, CartInvariantViolation, CartPhase};
pub use key::{configuration_key, configuration_key_from_ids, ConfigurationKey};
pub use outcome::{CartOutcome, IgnoreReason};
pub use pricing::{extras_total_micros, line_total_micros, price_per_item_micros};
pub use snapshot::CartSnapshot;
pub use store::{CartObserver, CartStore};
pub use types::{
    AddItemRequest, CartItem, Extra, ExtraId, LineId, MenuItem, MenuItemId, OptionGroupId,
    OptionGroupSelection, PendingAddition, PendingPolicy, RestaurantId, RestaurantRef,
};

/// Price/money scale: micros (1e-6).
pub const MICROS_SCALE: i64 = 1_000_000;
