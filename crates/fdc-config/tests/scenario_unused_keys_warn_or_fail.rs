use fdc_cart::PendingPolicy;
use fdc_config::{
    load_layered_yaml_from_strings, report_unused_keys, CartSettings, UnusedKeyPolicy,
};

/// Unused-key lint
///
/// 1) Unused keys are reported in Warn mode without error.
/// 2) Fail mode errors with CONFIG_UNUSED_KEYS.
/// 3) Consumed keys are never flagged.
/// 4) Unused pointers come back sorted.

#[test]
fn warn_mode_reports_unused_keys_without_error() {
    let yaml = r#"
cart:
  pending_policy: overwrite
  delivery_fee: 2.5

unused_section:
  foo: 123
  bar: 456
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).expect("config load must succeed");
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)
        .expect("warn mode must not error");

    assert!(!report.is_clean());
    assert_eq!(
        report.unused_leaf_pointers,
        vec![
            "/cart/delivery_fee".to_string(),
            "/unused_section/bar".to_string(),
            "/unused_section/foo".to_string(),
        ]
    );
}

#[test]
fn fail_mode_errors_on_unused_keys() {
    let yaml = r#"
cart:
  currency: USD
unused_section:
  foo: 1
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).expect("config load must succeed");
    let result = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail);

    let msg = format!("{:?}", result.err().expect("fail policy must error"));
    assert!(msg.contains("CONFIG_UNUSED_KEYS"), "{msg}");
    assert!(msg.contains("/unused_section/foo"), "{msg}");
}

#[test]
fn consumed_keys_are_clean_and_feed_settings() {
    let yaml = r#"
cart:
  pending_policy: keep_first
  currency: gbp
logging:
  filter: "fdc_cart=trace"
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).expect("config load must succeed");
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail)
        .expect("every key is consumed");
    assert!(report.is_clean());

    let settings = CartSettings::from_config_json(&loaded.config_json).unwrap();
    assert_eq!(settings.pending_policy, PendingPolicy::KeepFirst);
    assert_eq!(settings.currency, "GBP");
    assert_eq!(settings.log_filter, "fdc_cart=trace");
}

#[test]
fn deterministic_unused_pointer_ordering() {
    let yaml = r#"
unused:
  b: 2
  a: 1
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).expect("config load must succeed");
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)
        .expect("warn mode must not error");

    assert_eq!(
        report.unused_leaf_pointers,
        vec!["/unused/a".to_string(), "/unused/b".to_string()]
    );
}
