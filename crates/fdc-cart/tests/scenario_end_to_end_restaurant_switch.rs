use fdc_cart::*;

const M: i64 = MICROS_SCALE;

#[test]
fn scenario_end_to_end_restaurant_switch() {
    let restaurant_a = RestaurantRef::new(1, "Burger Barn");
    let restaurant_b = RestaurantRef::new(2, "Taco Town");
    let item_x = MenuItem::new(100, "Classic Burger", 10 * M);
    let item_y = MenuItem::new(200, "Fish Taco", 5 * M);

    // GIVEN: empty cart
    let mut cart = Cart::new();
    assert_eq!(cart.phase(), CartPhase::Empty);

    // X x1 from A
    cart.add_item(restaurant_a.clone(), item_x.clone(), 1, vec![]);
    let items: Vec<&CartItem> = cart.items().collect();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].menu_item.id, MenuItemId(100));
    assert_eq!(items[0].quantity, 1);
    assert_eq!(items[0].total_price_micros, 10 * M);
    assert_eq!(cart.subtotal_micros(), 10 * M);

    // X x1 again: merged into the same line
    cart.add_item(restaurant_a.clone(), item_x, 1, vec![]);
    assert_eq!(cart.len(), 1);
    let line = cart.item_at(0).expect("line exists");
    assert_eq!(line.quantity, 2);
    assert_eq!(line.total_price_micros, 20 * M);

    // Y from B: staged, cart untouched
    let before: Vec<CartItem> = cart.items().cloned().collect();
    let out = cart.add_item(restaurant_b.clone(), item_y.clone(), 1, vec![]);
    assert_eq!(out.as_str(), "CONFLICT_PENDING");
    assert_eq!(cart.items().cloned().collect::<Vec<_>>(), before);
    assert_eq!(cart.restaurant(), Some(&restaurant_a));
    assert!(cart.show_restaurant_change_warning());
    let pending = cart.pending_add_item().expect("pending set");
    assert_eq!(pending.restaurant, restaurant_b);
    assert_eq!(pending.menu_item, item_y);
    assert_eq!(pending.quantity, 1);

    // THEN: confirm replaces the cart with B's item
    cart.confirm_restaurant_change();
    assert_eq!(cart.restaurant(), Some(&restaurant_b));
    let items: Vec<&CartItem> = cart.items().collect();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].menu_item.id, MenuItemId(200));
    assert_eq!(items[0].quantity, 1);
    assert_eq!(items[0].total_price_micros, 5 * M);
    assert_eq!(cart.subtotal_micros(), 5 * M);
    assert!(!cart.show_restaurant_change_warning());
    assert!(cart.pending_add_item().is_none());
    assert!(cart.check_invariants().is_ok());
}

#[test]
fn scenario_cancel_restores_prior_state() {
    let mut cart = Cart::new();
    cart.add_item(
        RestaurantRef::new(1, "A"),
        MenuItem::new(1, "X", 4 * M),
        3,
        vec![],
    );
    let snap_before = cart.snapshot();

    cart.add_item(

        RestaurantRef::new(2, "B"),

        MenuItem::new(2, "Y", 6 * M),

        1,

        vec![],

    );
    assert!(cart.snapshot().show_restaurant_change_warning);

    cart.cancel_restaurant_change();
    assert_eq!(cart.snapshot(), snap_before);

    // Idempotent: a second cancel changes nothing.
    let out = cart.cancel_restaurant_change();
    assert_eq!(out, CartOutcome::Ignored(IgnoreReason::NoPendingAddition));
    assert_eq!(cart.snapshot(), snap_before);
}
