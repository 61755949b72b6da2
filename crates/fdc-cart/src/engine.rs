//! Cart engine: the single source of truth for cart state.
//!
//! # Invariants
//!
//! - **One restaurant per cart**: every line belongs to `restaurant`. An add
//!   for a different restaurant never touches the lines; it is staged as the
//!   pending addition and the warning flag is raised.
//! - **Empty cart has no restaurant**: removing the last line (directly or
//!   through a zero quantity update) clears the restaurant reference. A
//!   restaurant conflict needs a non-empty cart, so the pending addition and
//!   warning are dropped along with it.
//! - **One line per configuration**: lines are keyed by
//!   [`ConfigurationKey`]; equal keys merge quantities.
//! - **Stable line ids**: ids come from a per-engine monotonic counter that
//!   is never reset, and quantity updates never change them.
//!
//! All logic is pure deterministic: no IO, no clock, no randomness.

use std::collections::BTreeSet;

use tracing::debug;

use crate::key::{configuration_key, ConfigurationKey};
use crate::outcome::{CartOutcome, IgnoreReason};
use crate::pricing::{line_total_micros, price_per_item_micros};
use crate::types::{
    AddItemRequest, CartItem, LineId, MenuItem, OptionGroupSelection, PendingAddition,
    PendingPolicy, RestaurantId, RestaurantRef,
};

// ---------------------------------------------------------------------------
// Lines and phase
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
struct CartLine {
    key: ConfigurationKey,
    item: CartItem,
}

/// Conceptual cart state.
///
/// | phase             | restaurant | lines     | pending |
/// |-------------------|------------|-----------|---------|
/// | `Empty`           | none       | none      | none    |
/// | `Active`          | set        | non-empty | none    |
/// | `PendingConflict` | set        | non-empty | set     |
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartPhase<'a> {
    Empty,
    Active {
        restaurant: &'a RestaurantRef,
    },
    PendingConflict {
        restaurant: &'a RestaurantRef,
        pending: &'a PendingAddition,
    },
}

// ---------------------------------------------------------------------------
// Invariant violations
// ---------------------------------------------------------------------------

/// Violations surfaced by [`Cart::check_invariants`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartInvariantViolation {
    /// Lines present but no restaurant set.
    ItemsWithoutRestaurant,
    /// Restaurant set but no lines.
    RestaurantWithoutItems,
    /// A line holds quantity <= 0.
    NonPositiveQuantity { line_id: LineId, quantity: i64 },
    /// Stored unit price differs from base + extras.
    UnitPriceDrift {
        line_id: LineId,
        expected: i64,
        actual: i64,
    },
    /// Stored line total differs from unit price * quantity.
    LineTotalDrift {
        line_id: LineId,
        expected: i64,
        actual: i64,
    },
    /// Two lines share one configuration key.
    DuplicateConfiguration { key: String },
    /// Two lines share one id.
    DuplicateLineId { line_id: LineId },
    /// Warning flag and pending addition disagree.
    WarningMismatch { warning: bool, pending: bool },
    /// A pending addition exists while the cart is empty.
    PendingOnEmptyCart,
}

impl std::fmt::Display for CartInvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemsWithoutRestaurant => {
                write!(f, "cart invariant: lines present without a restaurant")
            }
            Self::RestaurantWithoutItems => {
                write!(f, "cart invariant: restaurant set on an empty cart")
            }
            Self::NonPositiveQuantity { line_id, quantity } => write!(
                f,
                "cart invariant: line {line_id} quantity must be > 0, got {quantity}"
            ),
            Self::UnitPriceDrift {
                line_id,
                expected,
                actual,
            } => write!(
                f,
                "cart invariant: line {line_id} unit price {actual} != expected {expected}"
            ),
            Self::LineTotalDrift {
                line_id,
                expected,
                actual,
            } => write!(
                f,
                "cart invariant: line {line_id} total {actual} != expected {expected}"
            ),
            Self::DuplicateConfiguration { key } => {
                write!(f, "cart invariant: configuration {key} held by two lines")
            }
            Self::DuplicateLineId { line_id } => {
                write!(f, "cart invariant: line id {line_id} used twice")
            }
            Self::WarningMismatch { warning, pending } => write!(
                f,
                "cart invariant: warning={warning} but pending_present={pending}"
            ),
            Self::PendingOnEmptyCart => {
                write!(f, "cart invariant: pending addition on an empty cart")
            }
        }
    }
}

impl std::error::Error for CartInvariantViolation {}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

/// In-memory cart scoped to one restaurant, with a confirmation gate for
/// restaurant switches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cart {
    restaurant: Option<RestaurantRef>,
    lines: Vec<CartLine>,
    pending: Option<PendingAddition>,
    show_restaurant_change_warning: bool,
    policy: PendingPolicy,
    next_line_seq: u64,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Empty cart with the default (overwrite) pending policy.
    pub fn new() -> Self {
        Self::with_policy(PendingPolicy::default())
    }

    pub fn with_policy(policy: PendingPolicy) -> Self {
        Self {
            restaurant: None,
            lines: Vec::new(),
            pending: None,
            show_restaurant_change_warning: false,
            policy,
            next_line_seq: 1,
        }
    }

    pub fn policy(&self) -> PendingPolicy {
        self.policy
    }

    // -----------------------------------------------------------------------
    // Read surface
    // -----------------------------------------------------------------------

    pub fn restaurant(&self) -> Option<&RestaurantRef> {
        self.restaurant.as_ref()
    }

    /// Lines in insertion order.
    pub fn items(&self) -> impl ExactSizeIterator<Item = &CartItem> + '_ {
        self.lines.iter().map(|l| &l.item)
    }

    pub fn item(&self, line_id: &LineId) -> Option<&CartItem> {
        self.lines
            .iter()
            .find(|l| &l.item.id == line_id)
            .map(|l| &l.item)
    }

    pub fn item_at(&self, index: usize) -> Option<&CartItem> {
        self.lines.get(index).map(|l| &l.item)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Σ quantity over all lines.
    pub fn item_count(&self) -> i64 {
        self.lines
            .iter()
            .fold(0i64, |acc, l| acc.saturating_add(l.item.quantity))
    }

    /// Σ line totals, in micros.
    pub fn subtotal_micros(&self) -> i64 {
        self.lines
            .iter()
            .fold(0i64, |acc, l| acc.saturating_add(l.item.total_price_micros))
    }

    pub fn show_restaurant_change_warning(&self) -> bool {
        self.show_restaurant_change_warning
    }

    pub fn pending_add_item(&self) -> Option<&PendingAddition> {
        self.pending.as_ref()
    }

    pub fn phase(&self) -> CartPhase<'_> {
        match (&self.restaurant, &self.pending) {
            (None, _) => CartPhase::Empty,
            (Some(restaurant), None) => CartPhase::Active { restaurant },
            (Some(restaurant), Some(pending)) => CartPhase::PendingConflict {
                restaurant,
                pending,
            },
        }
    }

    // -----------------------------------------------------------------------
    // Write surface
    // -----------------------------------------------------------------------

    /// Add `quantity` of a configured menu item from `restaurant`.
    ///
    /// - quantity <= 0: ignored.
    /// - empty cart or same restaurant: merged in immediately; any staged
    ///   addition is dropped.
    /// - different restaurant: staged as the pending addition, warning
    ///   raised, lines untouched.
    pub fn add_item(
        &mut self,
        restaurant: RestaurantRef,
        menu_item: MenuItem,
        quantity: i64,
        selections: Vec<OptionGroupSelection>,
    ) -> CartOutcome {
        self.add(AddItemRequest {
            restaurant,
            menu_item,
            quantity,
            selections,
        })
    }

    /// [`Cart::add_item`] taking a prepared request.
    pub fn add(&mut self, request: AddItemRequest) -> CartOutcome {
        if request.quantity <= 0 {
            return CartOutcome::Ignored(IgnoreReason::NonPositiveQuantity);
        }

        if let Some(current) = &self.restaurant {
            if !self.lines.is_empty() && current.id != request.restaurant.id {
                let current = current.id;
                return self.stage_conflict(current, request);
            }
        }

        if self.lines.is_empty() {
            self.restaurant = Some(request.restaurant.clone());
        }
        self.drop_pending();

        let (line_id, merged, quantity) = self.merge(request);
        if merged {
            CartOutcome::Merged { line_id, quantity }
        } else {
            CartOutcome::Added { line_id }
        }
    }

    /// Apply the pending addition as a hard replacement of the cart.
    ///
    /// Clears the warning flag even when nothing is pending.
    pub fn confirm_restaurant_change(&mut self) -> CartOutcome {
        self.show_restaurant_change_warning = false;
        let Some(request) = self.pending.take() else {
            return CartOutcome::Ignored(IgnoreReason::NoPendingAddition);
        };

        let discarded_lines = self.lines.len();
        let restaurant = request.restaurant.id;
        debug!(
            from = ?self.restaurant.as_ref().map(|r| r.id.0),
            to = restaurant.0,
            discarded_lines,
            "restaurant change confirmed"
        );

        self.lines.clear();
        self.restaurant = Some(request.restaurant.clone());
        let (line_id, _, _) = self.merge(request);

        CartOutcome::Replaced {
            restaurant,
            line_id,
            discarded_lines,
        }
    }

    /// Discard the pending addition; the cart is left untouched.
    pub fn cancel_restaurant_change(&mut self) -> CartOutcome {
        self.show_restaurant_change_warning = false;
        match self.pending.take() {
            Some(_) => CartOutcome::ConflictCancelled,
            None => CartOutcome::Ignored(IgnoreReason::NoPendingAddition),
        }
    }

    /// Set a line's quantity; quantity <= 0 removes the line.
    pub fn update_item_quantity(&mut self, line_id: &LineId, quantity: i64) -> CartOutcome {
        let Some(pos) = self.position(line_id) else {
            return CartOutcome::Ignored(IgnoreReason::UnknownLine);
        };
        if quantity <= 0 {
            return self.remove_at(pos);
        }

        let item = &mut self.lines[pos].item;
        item.quantity = quantity;
        item.total_price_micros = line_total_micros(item.price_per_item_micros, quantity);

        CartOutcome::QuantityUpdated {
            line_id: item.id.clone(),
            quantity,
        }
    }

    pub fn remove_item(&mut self, line_id: &LineId) -> CartOutcome {
        match self.position(line_id) {
            Some(pos) => self.remove_at(pos),
            None => CartOutcome::Ignored(IgnoreReason::UnknownLine),
        }
    }

    /// Hard reset: no restaurant, no lines, nothing pending.
    pub fn clear_cart(&mut self) -> CartOutcome {
        self.restaurant = None;
        self.lines.clear();
        self.drop_pending();
        CartOutcome::Cleared
    }

    // -----------------------------------------------------------------------
    // Integrity
    // -----------------------------------------------------------------------

    /// Recheck every invariant from scratch. O(n) in lines; intended for
    /// tests and replay verification.
    pub fn check_invariants(&self) -> Result<(), CartInvariantViolation> {
        match (&self.restaurant, self.lines.is_empty()) {
            (None, false) => return Err(CartInvariantViolation::ItemsWithoutRestaurant),
            (Some(_), true) => return Err(CartInvariantViolation::RestaurantWithoutItems),
            _ => {}
        }

        if self.show_restaurant_change_warning != self.pending.is_some() {
            return Err(CartInvariantViolation::WarningMismatch {
                warning: self.show_restaurant_change_warning,
                pending: self.pending.is_some(),
            });
        }
        if self.pending.is_some() && self.lines.is_empty() {
            return Err(CartInvariantViolation::PendingOnEmptyCart);
        }

        let mut keys = BTreeSet::new();
        let mut ids = BTreeSet::new();
        for line in &self.lines {
            let item = &line.item;
            if item.quantity <= 0 {
                return Err(CartInvariantViolation::NonPositiveQuantity {
                    line_id: item.id.clone(),
                    quantity: item.quantity,
                });
            }

            let unit = price_per_item_micros(&item.menu_item, &item.selections);
            if unit != item.price_per_item_micros {
                return Err(CartInvariantViolation::UnitPriceDrift {
                    line_id: item.id.clone(),
                    expected: unit,
                    actual: item.price_per_item_micros,
                });
            }

            let total = line_total_micros(unit, item.quantity);
            if total != item.total_price_micros {
                return Err(CartInvariantViolation::LineTotalDrift {
                    line_id: item.id.clone(),
                    expected: total,
                    actual: item.total_price_micros,
                });
            }

            if !keys.insert(line.key.clone()) {
                return Err(CartInvariantViolation::DuplicateConfiguration {
                    key: line.key.to_string(),
                });
            }
            if !ids.insert(item.id.clone()) {
                return Err(CartInvariantViolation::DuplicateLineId {
                    line_id: item.id.clone(),
                });
            }
        }

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn stage_conflict(&mut self, current: RestaurantId, request: AddItemRequest) -> CartOutcome {
        let overwrote_previous = self.pending.is_some();
        if overwrote_previous && self.policy == PendingPolicy::KeepFirst {
            return CartOutcome::Ignored(IgnoreReason::PendingKept);
        }

        let requested = request.restaurant.id;
        debug!(
            current = current.0,
            requested = requested.0,
            overwrote_previous,
            "restaurant conflict staged"
        );
        self.pending = Some(request);
        self.show_restaurant_change_warning = true;

        CartOutcome::ConflictPending {
            current,
            requested,
            overwrote_previous,
        }
    }

    /// Merge a request into the lines. Returns (line id, merged?, new quantity).
    fn merge(&mut self, request: AddItemRequest) -> (LineId, bool, i64) {
        let key = configuration_key(request.menu_item.id, &request.selections);
        let unit = price_per_item_micros(&request.menu_item, &request.selections);

        if let Some(line) = self.lines.iter_mut().find(|l| l.key == key) {
            let item = &mut line.item;
            item.quantity = item.quantity.saturating_add(request.quantity);
            // Latest menu data wins so a price change is picked up.
            item.menu_item = request.menu_item;
            item.selections = request.selections;
            item.price_per_item_micros = unit;
            item.total_price_micros = line_total_micros(unit, item.quantity);
            return (item.id.clone(), true, item.quantity);
        }

        let line_id = LineId(format!("{}#{}", key, self.next_line_seq));
        self.next_line_seq += 1;

        let quantity = request.quantity;
        self.lines.push(CartLine {
            key,
            item: CartItem {
                id: line_id.clone(),
                menu_item: request.menu_item,
                selections: request.selections,
                quantity,
                price_per_item_micros: unit,
                total_price_micros: line_total_micros(unit, quantity),
            },
        });
        (line_id, false, quantity)
    }

    fn remove_at(&mut self, pos: usize) -> CartOutcome {
        let line = self.lines.remove(pos);
        let cart_emptied = self.lines.is_empty();
        if cart_emptied {
            self.restaurant = None;
            self.drop_pending();
        }
        CartOutcome::Removed {
            line_id: line.item.id,
            cart_emptied,
        }
    }

    fn position(&self, line_id: &LineId) -> Option<usize> {
        self.lines.iter().position(|l| &l.item.id == line_id)
    }

    fn drop_pending(&mut self) {
        self.pending = None;
        self.show_restaurant_change_warning = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
