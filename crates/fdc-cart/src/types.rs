use serde::{Deserialize, Serialize};
use std::fmt;

/// Restaurant identity as supplied by the menu API.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(pub u64);

/// Menu item identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuItemId(pub u64);

/// Option group identity (e.g. "Sauces", "Size").
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionGroupId(pub u64);

/// Extra identity within an option group.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtraId(pub u64);

/// Cart line identity.
///
/// Assigned once when the line is created and never changed by quantity
/// updates. Unique for the lifetime of the owning [`Cart`](crate::Cart).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub String);

impl LineId {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Restaurant reference held by the cart. Matching is by `id` only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantRef {
    pub id: RestaurantId,
    pub name: String,
}

impl RestaurantRef {
    pub fn new<S: Into<String>>(id: u64, name: S) -> Self {
        Self {
            id: RestaurantId(id),
            name: name.into(),
        }
    }
}

/// Menu item definition (from the menu API).
///
/// price_micros is the base unit price, extras excluded. Constructors take
/// prices as given; validating menu data is the caller's job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub price_micros: i64,
}

impl MenuItem {
    pub fn new<S: Into<String>>(id: u64, name: S, price_micros: i64) -> Self {
        Self {
            id: MenuItemId(id),
            name: name.into(),
            description: None,
            image: None,
            price_micros,
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image<S: Into<String>>(mut self, image: S) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// A purchasable extra (topping, sauce, size upgrade, ...).
///
/// price_micros may be negative for removals priced as a discount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extra {
    pub id: ExtraId,
    pub name: String,
    pub price_micros: i64,
}

impl Extra {
    pub fn new<S: Into<String>>(id: u64, name: S, price_micros: i64) -> Self {
        Self {
            id: ExtraId(id),
            name: name.into(),
            price_micros,
        }
    }
}

/// The extras chosen from one option group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGroupSelection {
    pub group_id: OptionGroupId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group_name: String,
    #[serde(default)]
    pub extras: Vec<Extra>,
}

impl OptionGroupSelection {
    pub fn new(group_id: u64, extras: Vec<Extra>) -> Self {
        Self {
            group_id: OptionGroupId(group_id),
            group_name: String::new(),
            extras,
        }
    }

    pub fn named<S: Into<String>>(mut self, group_name: S) -> Self {
        self.group_name = group_name.into();
        self
    }
}

/// An add-item request: target restaurant, menu item, quantity, selections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItemRequest {
    pub restaurant: RestaurantRef,
    pub menu_item: MenuItem,
    pub quantity: i64,
    #[serde(default)]
    pub selections: Vec<OptionGroupSelection>,
}

/// An add-item request staged while a restaurant-conflict confirmation is
/// outstanding. At most one exists per cart.
pub type PendingAddition = AddItemRequest;

/// Public view of one cart line (the configuration key stays internal).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: LineId,
    pub menu_item: MenuItem,
    pub selections: Vec<OptionGroupSelection>,
    pub quantity: i64,
    /// menu_item.price_micros + Σ selected extras.
    pub price_per_item_micros: i64,
    /// price_per_item_micros * quantity.
    pub total_price_micros: i64,
}

/// What a second conflicting add does while one is already pending.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingPolicy {
    /// Replace the staged addition with the newer request.
    #[default]
    Overwrite,
    /// Keep the first staged addition and ignore the newer request.
    KeepFirst,
}

impl PendingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PendingPolicy::Overwrite => "overwrite",
            PendingPolicy::KeepFirst => "keep_first",
        }
    }
}
