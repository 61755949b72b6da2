use std::collections::BTreeSet;

use crate::types::{ExtraId, MenuItem, OptionGroupId, OptionGroupSelection};

fn i128_to_i64_clamp(x: i128) -> i64 {
    if x > i64::MAX as i128 {
        i64::MAX
    } else if x < i64::MIN as i128 {
        i64::MIN
    } else {
        x as i64
    }
}

/// Σ price of the selected extras across all groups.
///
/// Counts each `(group, extra)` pair once, the same set the configuration
/// key is built from. A repeated pair is priced by its first occurrence.
pub fn extras_total_micros(selections: &[OptionGroupSelection]) -> i64 {
    let mut seen: BTreeSet<(OptionGroupId, ExtraId)> = BTreeSet::new();
    let total: i128 = selections
        .iter()
        .flat_map(|s| s.extras.iter().map(move |e| (s.group_id, e)))
        .filter(|(group_id, e)| seen.insert((*group_id, e.id)))
        .map(|(_, e)| e.price_micros as i128)
        .sum();
    i128_to_i64_clamp(total)
}

/// Unit price = base price + extras.
pub fn price_per_item_micros(menu_item: &MenuItem, selections: &[OptionGroupSelection]) -> i64 {
    menu_item
        .price_micros
        .saturating_add(extras_total_micros(selections))
}

/// Line total = unit price * quantity (i128 intermediate, clamped).
pub fn line_total_micros(price_per_item_micros: i64, quantity: i64) -> i64 {
    i128_to_i64_clamp(price_per_item_micros as i128 * quantity as i128)
}
