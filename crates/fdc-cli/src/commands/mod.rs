//! Command handler modules for fdc-cli.
//!
//! Shared parsing/formatting helpers live here.

pub mod key;
pub mod replay;

use anyhow::{bail, Context, Result};
use fdc_cart::MICROS_SCALE;
use fdc_config::UnusedKeyPolicy;

/// Parse a CLI `--unused-keys` string.
pub fn parse_unused_key_policy(raw: &str) -> Result<UnusedKeyPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "warn" => Ok(UnusedKeyPolicy::Warn),
        "fail" => Ok(UnusedKeyPolicy::Fail),
        other => bail!("invalid --unused-keys '{}'. expected one of: warn | fail", other),
    }
}

/// Parse `--group <gid>:<eid>,<eid>`. An empty extra list is allowed.
pub fn parse_group_arg(raw: &str) -> Result<(u64, Vec<u64>)> {
    let (gid, extras) = raw
        .split_once(':')
        .with_context(|| format!("invalid --group '{raw}'. expected <group_id>:<extra_id>,..."))?;

    let gid: u64 = gid
        .trim()
        .parse()
        .with_context(|| format!("invalid group id in --group '{raw}'"))?;

    let mut ids = Vec::new();
    for e in extras.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let id: u64 = e
            .parse()
            .with_context(|| format!("invalid extra id '{e}' in --group '{raw}'"))?;
        ids.push(id);
    }
    Ok((gid, ids))
}

/// Render micros as a decimal amount: at least two fraction digits, trailing
/// zeros beyond that trimmed. `12_500_000` -> `12.50`.
pub fn format_micros(micros: i64) -> String {
    let sign = if micros < 0 { "-" } else { "" };
    let abs = micros.unsigned_abs();
    let scale = MICROS_SCALE as u64;
    let whole = abs / scale;
    let mut frac = format!("{:06}", abs % scale);
    while frac.len() > 2 && frac.ends_with('0') {
        frac.pop();
    }
    format!("{sign}{whole}.{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_arg_parses() {
        assert_eq!(parse_group_arg("1:11,10").unwrap(), (1, vec![11, 10]));
        assert_eq!(parse_group_arg("3:").unwrap(), (3, vec![]));
        assert!(parse_group_arg("nope").is_err());
        assert!(parse_group_arg("1:x").is_err());
    }

    #[test]
    fn micros_formatting() {
        assert_eq!(format_micros(12_500_000), "12.50");
        assert_eq!(format_micros(0), "0.00");
        assert_eq!(format_micros(1_234_567), "1.234567");
        assert_eq!(format_micros(-500_000), "-0.50");
    }

    #[test]
    fn unused_key_policy_parses() {
        assert_eq!(parse_unused_key_policy("WARN").unwrap(), UnusedKeyPolicy::Warn);
        assert_eq!(parse_unused_key_policy("fail").unwrap(), UnusedKeyPolicy::Fail);
        assert!(parse_unused_key_policy("ignore").is_err());
    }
}
