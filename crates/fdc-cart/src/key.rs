use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::types::{ExtraId, MenuItemId, OptionGroupId, OptionGroupSelection};

/// Canonical identity of a purchasable configuration.
///
/// Format: `item:<id>` followed by `|<group>:<extra>,<extra>` per group that
/// has at least one extra selected. Groups ascend by id, extras ascend by id
/// within a group, duplicates collapse. Two selections that differ only in
/// ordering produce the same key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigurationKey(String);

impl ConfigurationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigurationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key for a menu item and its option-group selections.
pub fn configuration_key(
    item: MenuItemId,
    selections: &[OptionGroupSelection],
) -> ConfigurationKey {
    configuration_key_from_ids(
        item,
        selections
            .iter()
            .map(|s| (s.group_id, s.extras.iter().map(|e| e.id))),
    )
}

/// Key from raw ids, for callers that do not hold full extra definitions.
pub fn configuration_key_from_ids<G, E>(item: MenuItemId, groups: G) -> ConfigurationKey
where
    G: IntoIterator<Item = (OptionGroupId, E)>,
    E: IntoIterator<Item = ExtraId>,
{
    // Repeated group ids are unioned; empty groups vanish.
    let mut canonical: BTreeMap<OptionGroupId, BTreeSet<ExtraId>> = BTreeMap::new();
    for (group_id, extras) in groups {
        let set = canonical.entry(group_id).or_default();
        set.extend(extras);
    }
    canonical.retain(|_, extras| !extras.is_empty());

    let mut out = format!("item:{}", item.0);
    for (group_id, extras) in &canonical {
        let ids: Vec<String> = extras.iter().map(|e| e.0.to_string()).collect();
        out.push('|');
        out.push_str(&group_id.0.to_string());
        out.push(':');
        out.push_str(&ids.join(","));
    }
    ConfigurationKey(out)
}
