//! `fdc replay`: run a session script through a fresh cart and report.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use fdc_config::{
    report_unused_keys, CartSettings, LoadedConfig, UnusedKeyPolicy, UnusedKeyReport,
};
use fdc_testkit::{replay, ReplayReport, Script};
use tracing::{info, warn};
use uuid::Uuid;

use super::format_micros;

/// Merged config (if any layers were given) plus the settings read from it.
pub struct ReplayConfig {
    pub loaded: Option<LoadedConfig>,
    pub settings: CartSettings,
    pub unused: Option<UnusedKeyReport>,
}

pub fn load_config(paths: &[String], policy: UnusedKeyPolicy) -> Result<ReplayConfig> {
    if paths.is_empty() {
        return Ok(ReplayConfig {
            loaded: None,
            settings: CartSettings::default(),
            unused: None,
        });
    }

    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    let loaded = fdc_config::load_layered_yaml(&path_refs)?;
    let unused = report_unused_keys(&loaded.config_json, policy)?;
    let settings = CartSettings::from_config_json(&loaded.config_json)
        .context("invalid cart settings in config")?;

    Ok(ReplayConfig {
        loaded: Some(loaded),
        settings,
        unused: Some(unused),
    })
}

pub fn run(script_path: &str, cfg: &ReplayConfig, json: bool) -> Result<()> {
    if let Some(report) = cfg.unused.as_ref().filter(|r| !r.is_clean()) {
        warn!(
            count = report.unused_leaf_pointers.len(),
            pointers = ?report.unused_leaf_pointers,
            "config has unused keys"
        );
    }

    let script = Script::load(script_path)?;
    let session_id = Uuid::new_v4();
    let config_hash = cfg
        .loaded
        .as_ref()
        .map(|l| l.config_hash.clone())
        .unwrap_or_else(|| "NONE".to_string());

    info!(%session_id, script = script_path, steps = script.steps.len(), "replay start");
    let report = replay(&script, &cfg.settings);

    if json {
        let envelope = serde_json::json!({
            "session_id": session_id.to_string(),
            "generated_at_utc": Utc::now().to_rfc3339(),
            "config_hash": config_hash,
            "currency": cfg.settings.currency,
            "report": report,
        });
        let out =
            serde_json::to_string_pretty(&envelope).context("serialize report json failed")?;
        println!("{}", out);
    } else {
        println!("session_id={}", session_id);
        println!("generated_at_utc={}", Utc::now().to_rfc3339());
        println!("script={}", script_path);
        println!("config_hash={}", config_hash);
        println!("pending_policy={}", report.pending_policy);
        print_report(&report, &cfg.settings.currency);
    }

    if let Some(f) = &report.integrity {
        bail!(
            "REPLAY_INTEGRITY_FAILED step={} violation={}",
            f.step,
            f.violation
        );
    }
    Ok(())
}

fn print_report(report: &ReplayReport, currency: &str) {
    for s in &report.steps {
        let mut line = format!("step={} op={} outcome={}", s.step, s.op, s.outcome);
        if let Some(id) = &s.line_id {
            line.push_str(&format!(" line_id={id}"));
        }
        if let Some(reason) = &s.reason {
            line.push_str(&format!(" reason={reason}"));
        }
        println!("{}", line);
    }

    let snap = &report.snapshot;
    match &snap.restaurant {
        Some(r) => println!("restaurant_id={} restaurant_name={}", r.id.0, r.name),
        None => println!("restaurant_id=NONE"),
    }
    for (i, item) in snap.items.iter().enumerate() {
        println!(
            "line={} id={} item={} quantity={} unit_micros={} total_micros={}",
            i,
            item.id,
            item.menu_item.id.0,
            item.quantity,
            item.price_per_item_micros,
            item.total_price_micros
        );
    }
    println!("item_count={}", snap.item_count);
    println!("subtotal_micros={}", snap.subtotal_micros);
    println!("subtotal={} {}", format_micros(snap.subtotal_micros), currency);
    println!(
        "show_restaurant_change_warning={}",
        snap.show_restaurant_change_warning
    );
    match &snap.pending_add_item {
        Some(p) => println!(
            "pending_restaurant_id={} pending_item={} pending_quantity={}",
            p.restaurant.id.0, p.menu_item.id.0, p.quantity
        ),
        None => println!("pending_restaurant_id=NONE"),
    }
    println!("notifications={}", report.notifications);
    println!("integrity={}", if report.is_clean() { "OK" } else { "FAILED" });
}
