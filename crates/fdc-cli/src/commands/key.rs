use anyhow::Result;
use fdc_cart::{configuration_key_from_ids, ExtraId, MenuItemId, OptionGroupId};

use super::parse_group_arg;

/// Execute `fdc key`: print the canonical key for the given selection.
pub fn print_key(item: u64, groups: &[String]) -> Result<()> {
    let mut parsed = Vec::with_capacity(groups.len());
    for raw in groups {
        let (gid, extras) = parse_group_arg(raw)?;
        parsed.push((
            OptionGroupId(gid),
            extras.into_iter().map(ExtraId).collect::<Vec<_>>(),
        ));
    }

    let key = configuration_key_from_ids(MenuItemId(item), parsed);
    println!("configuration_key={}", key);
    Ok(())
}
