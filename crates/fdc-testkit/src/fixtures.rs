//! Terse builders for scenario tests. Prices are whole currency units.

use fdc_cart::{Extra, MenuItem, OptionGroupSelection, RestaurantRef, MICROS_SCALE};

pub fn restaurant(id: u64, name: &str) -> RestaurantRef {
    RestaurantRef::new(id, name)
}

pub fn menu_item(id: u64, name: &str, price_units: i64) -> MenuItem {
    MenuItem::new(id, name, price_units * MICROS_SCALE)
}

pub fn extra(id: u64, name: &str, price_units: i64) -> Extra {
    Extra::new(id, name, price_units * MICROS_SCALE)
}

pub fn group(id: u64, extras: Vec<Extra>) -> OptionGroupSelection {
    OptionGroupSelection::new(id, extras)
}
