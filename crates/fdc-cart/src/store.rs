//! Observable cart store: the injectable state object handed to UI code.
//!
//! # Contract
//! - The store exclusively owns its [`Cart`]; callers read through borrowed
//!   views and mutate only through the listed operations.
//! - After every operation that changed state, each subscribed
//!   [`CartObserver`] receives a fresh [`CartSnapshot`], in subscription
//!   order. `Ignored` outcomes do not notify.
//! - Every outcome is logged at `debug` level via `tracing`.

use tracing::debug;

use crate::command::CartCommand;
use crate::engine::Cart;
use crate::outcome::CartOutcome;
use crate::snapshot::CartSnapshot;
use crate::types::{
    CartItem, LineId, MenuItem, OptionGroupSelection, PendingAddition, PendingPolicy,
    RestaurantRef,
};

/// Receives the cart state after each change.
pub trait CartObserver {
    fn on_change(&mut self, snapshot: &CartSnapshot);
}

impl<F> CartObserver for F
where
    F: FnMut(&CartSnapshot),
{
    fn on_change(&mut self, snapshot: &CartSnapshot) {
        self(snapshot)
    }
}

/// A [`Cart`] plus change notification.
pub struct CartStore {
    cart: Cart,
    observers: Vec<Box<dyn CartObserver>>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    pub fn new() -> Self {
        Self::with_policy(PendingPolicy::default())
    }

    pub fn with_policy(policy: PendingPolicy) -> Self {
        Self {
            cart: Cart::with_policy(policy),
            observers: Vec::new(),
        }
    }

    pub fn subscribe<O>(&mut self, observer: O)
    where
        O: CartObserver + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Read-only access to the underlying cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    // -----------------------------------------------------------------------
    // Read surface
    // -----------------------------------------------------------------------

    pub fn restaurant(&self) -> Option<&RestaurantRef> {
        self.cart.restaurant()
    }

    pub fn items(&self) -> Vec<&CartItem> {
        self.cart.items().collect()
    }

    pub fn item_count(&self) -> i64 {
        self.cart.item_count()
    }

    pub fn subtotal_micros(&self) -> i64 {
        self.cart.subtotal_micros()
    }

    pub fn show_restaurant_change_warning(&self) -> bool {
        self.cart.show_restaurant_change_warning()
    }

    pub fn pending_add_item(&self) -> Option<&PendingAddition> {
        self.cart.pending_add_item()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        self.cart.snapshot()
    }

    // -----------------------------------------------------------------------
    // Write surface
    // -----------------------------------------------------------------------

    pub fn add_item(
        &mut self,
        restaurant: RestaurantRef,
        menu_item: MenuItem,
        quantity: i64,
        selections: Vec<OptionGroupSelection>,
    ) -> CartOutcome {
        let outcome = self
            .cart
            .add_item(restaurant, menu_item, quantity, selections);
        self.publish("add_item", outcome)
    }

    pub fn update_item_quantity(&mut self, line_id: &LineId, quantity: i64) -> CartOutcome {
        let outcome = self.cart.update_item_quantity(line_id, quantity);
        self.publish("update_item_quantity", outcome)
    }

    pub fn remove_item(&mut self, line_id: &LineId) -> CartOutcome {
        let outcome = self.cart.remove_item(line_id);
        self.publish("remove_item", outcome)
    }

    pub fn clear_cart(&mut self) -> CartOutcome {
        let outcome = self.cart.clear_cart();
        self.publish("clear_cart", outcome)
    }

    pub fn confirm_restaurant_change(&mut self) -> CartOutcome {
        let outcome = self.cart.confirm_restaurant_change();
        self.publish("confirm_restaurant_change", outcome)
    }

    pub fn cancel_restaurant_change(&mut self) -> CartOutcome {
        let outcome = self.cart.cancel_restaurant_change();
        self.publish("cancel_restaurant_change", outcome)
    }

    /// Dispatch a [`CartCommand`].
    pub fn apply(&mut self, command: CartCommand) -> CartOutcome {
        let op = command.op_name();
        let outcome = self.cart.apply(command);
        self.publish(op, outcome)
    }

    fn publish(&mut self, op: &'static str, outcome: CartOutcome) -> CartOutcome {
        if let CartOutcome::Ignored(reason) = &outcome {
            debug!(op, reason = reason.as_str(), "cart operation ignored");
            return outcome;
        }

        debug!(
            op,
            outcome = outcome.as_str(),
            item_count = self.cart.item_count(),
            subtotal_micros = self.cart.subtotal_micros(),
            "cart updated"
        );

        if !self.observers.is_empty() {
            let snapshot = self.cart.snapshot();
            for observer in &mut self.observers {
                observer.on_change(&snapshot);
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MICROS_SCALE;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn observers_see_every_change_but_not_ignored_ops() {
        let seen: Rc<RefCell<Vec<CartSnapshot>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut store = CartStore::new();
        store.subscribe(move |snap: &CartSnapshot| sink.borrow_mut().push(snap.clone()));

        store.add_item(

            RestaurantRef::new(1, "A"),

            MenuItem::new(5, "X", 10 * MICROS_SCALE),

            1,

            vec![],

        );
        store.cancel_restaurant_change(); // ignored: nothing pending
        store.add_item(
            RestaurantRef::new(2, "B"),
            MenuItem::new(6, "Y", 5 * MICROS_SCALE),
            1,
            vec![],
        );
        store.confirm_restaurant_change();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].subtotal_micros, 10 * MICROS_SCALE);
        assert!(seen[1].show_restaurant_change_warning);
        assert_eq!(seen[1].items, seen[0].items);
        assert_eq!(seen[2].restaurant.as_ref().map(|r| r.id.0), Some(2));
        assert_eq!(seen[2].subtotal_micros, 5 * MICROS_SCALE);
    }

    #[test]
    fn observers_are_called_in_subscription_order() {
        let order: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
        let a = Rc::clone(&order);
        let b = Rc::clone(&order);

        let mut store = CartStore::new();
        store.subscribe(move |_: &CartSnapshot| a.borrow_mut().push("a"));
        store.subscribe(move |_: &CartSnapshot| b.borrow_mut().push("b"));
        store.clear_cart();

        assert_eq!(*order.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn read_surface_mirrors_cart() {
        let mut store = CartStore::with_policy(PendingPolicy::KeepFirst);
        store.add_item(
            RestaurantRef::new(1, "A"),
            MenuItem::new(5, "X", 2 * MICROS_SCALE),
            3,
            vec![],
        );
        assert_eq!(store.item_count(), 3);
        assert_eq!(store.subtotal_micros(), 6 * MICROS_SCALE);
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.restaurant().map(|r| r.name.as_str()), Some("A"));
        assert!(!store.show_restaurant_change_warning());
        assert!(store.pending_add_item().is_none());
        assert_eq!(store.cart().policy(), PendingPolicy::KeepFirst);
        assert_eq!(store.snapshot(), store.cart().snapshot());
    }
}
