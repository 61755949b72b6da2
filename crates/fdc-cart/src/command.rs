use serde::{Deserialize, Serialize};

use crate::engine::Cart;
use crate::outcome::{CartOutcome, IgnoreReason};
use crate::types::{LineId, MenuItem, OptionGroupSelection, RestaurantRef};

/// Reference to a cart line: by id (string) or by position in `items`
/// (number).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineRef {
    Index(usize),
    Id(LineId),
}

/// One cart operation as data, e.g. a step in a recorded session.
///
/// Serialized with an `op` tag: `{"op":"add_item", ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CartCommand {
    AddItem {
        restaurant: RestaurantRef,
        menu_item: MenuItem,
        quantity: i64,
        #[serde(default)]
        selections: Vec<OptionGroupSelection>,
    },
    UpdateItemQuantity {
        line: LineRef,
        quantity: i64,
    },
    RemoveItem {
        line: LineRef,
    },
    ClearCart,
    ConfirmRestaurantChange,
    CancelRestaurantChange,
}

impl CartCommand {
    pub fn op_name(&self) -> &'static str {
        match self {
            CartCommand::AddItem { .. } => "add_item",
            CartCommand::UpdateItemQuantity { .. } => "update_item_quantity",
            CartCommand::RemoveItem { .. } => "remove_item",
            CartCommand::ClearCart => "clear_cart",
            CartCommand::ConfirmRestaurantChange => "confirm_restaurant_change",
            CartCommand::CancelRestaurantChange => "cancel_restaurant_change",
        }
    }
}

impl Cart {
    /// Resolve a line reference against the current lines.
    pub fn resolve_line(&self, line: &LineRef) -> Option<LineId> {
        match line {
            LineRef::Index(i) => self.item_at(*i).map(|item| item.id.clone()),
            LineRef::Id(id) => self.item(id).map(|item| item.id.clone()),
        }
    }

    /// Dispatch one command to the matching operation.
    pub fn apply(&mut self, command: CartCommand) -> CartOutcome {
        match command {
            CartCommand::AddItem {
                restaurant,
                menu_item,
                quantity,
                selections,
            } => self.add_item(restaurant, menu_item, quantity, selections),
            CartCommand::UpdateItemQuantity { line, quantity } => match self.resolve_line(&line) {
                Some(id) => self.update_item_quantity(&id, quantity),
                None => CartOutcome::Ignored(IgnoreReason::UnknownLine),
            },
            CartCommand::RemoveItem { line } => match self.resolve_line(&line) {
                Some(id) => self.remove_item(&id),
                None => CartOutcome::Ignored(IgnoreReason::UnknownLine),
            },
            CartCommand::ClearCart => self.clear_cart(),
            CartCommand::ConfirmRestaurantChange => self.confirm_restaurant_change(),
            CartCommand::CancelRestaurantChange => self.cancel_restaurant_change(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MICROS_SCALE;

    #[test]
    fn parses_tagged_commands() {
        let raw = r#"[
            {"op": "add_item",
             "restaurant": {"id": 1, "name": "Noodle Bar"},
             "menu_item": {"id": 5, "name": "Ramen", "price_micros": 12000000},
             "quantity": 2,
             "selections": [{"group_id": 1, "extras": [{"id": 10, "name": "Egg", "price_micros": 1500000}]}]},
            {"op": "update_item_quantity", "line": 0, "quantity": 3},
            {"op": "remove_item", "line": "item:5|1:10#1"},
            {"op": "clear_cart"},
            {"op": "confirm_restaurant_change"},
            {"op": "cancel_restaurant_change"}
        ]"#;
        let cmds: Vec<CartCommand> = serde_json::from_str(raw).unwrap();
        assert_eq!(cmds.len(), 6);
        assert_eq!(cmds[0].op_name(), "add_item");
        assert_eq!(
            cmds[1],
            CartCommand::UpdateItemQuantity {
                line: LineRef::Index(0),
                quantity: 3
            }
        );
        assert_eq!(
            cmds[2],
            CartCommand::RemoveItem {
                line: LineRef::Id(LineId::new("item:5|1:10#1"))
            }
        );
    }

    #[test]
    fn selections_default_to_empty() {
        let raw = r#"{"op": "add_item",
            "restaurant": {"id": 1, "name": "A"},
            "menu_item": {"id": 5, "name": "X", "price_micros": 1},
            "quantity": 1}"#;
        let cmd: CartCommand = serde_json::from_str(raw).unwrap();
        match cmd {
            CartCommand::AddItem { selections, .. } => assert!(selections.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn apply_resolves_index_and_id() {
        let mut cart = Cart::new();
        cart.apply(CartCommand::AddItem {
            restaurant: RestaurantRef::new(1, "A"),
            menu_item: MenuItem::new(5, "X", 2 * MICROS_SCALE),
            quantity: 1,
            selections: vec![],
        });
        let id = cart.item_at(0).map(|i| i.id.clone()).unwrap();

        let out = cart.apply(CartCommand::UpdateItemQuantity {
            line: LineRef::Index(0),
            quantity: 4,
        });
        assert_eq!(
            out,
            CartOutcome::QuantityUpdated {
                line_id: id.clone(),
                quantity: 4
            }
        );

        let out = cart.apply(CartCommand::RemoveItem {
            line: LineRef::Index(3),
        });
        assert_eq!(out, CartOutcome::Ignored(IgnoreReason::UnknownLine));

        let out = cart.apply(CartCommand::RemoveItem {
            line: LineRef::Id(id.clone()),
        });
        assert_eq!(
            out,
            CartOutcome::Removed {
                line_id: id,
                cart_emptied: true
            }
        );
    }
}
