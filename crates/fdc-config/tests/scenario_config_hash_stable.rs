//! Config hash stability
//!
//! GREEN when:
//! - Same inputs hash identically across calls.
//! - Key order inside YAML does not affect the hash.
//! - Different values produce different hashes.
//! - Overlay layers override base values and stay stable.

use fdc_config::load_layered_yaml_from_strings;

const BASE_YAML: &str = r#"
cart:
  pending_policy: "overwrite"
  currency: "USD"
logging:
  filter: "info"
menu_api:
  key_env: "FDC_MENU_API_KEY"
"#;

const BASE_YAML_REORDERED: &str = r#"
menu_api:
  key_env: "FDC_MENU_API_KEY"
logging:
  filter: "info"
cart:
  currency: "USD"
  pending_policy: "overwrite"
"#;

const OVERLAY_YAML: &str = r#"
cart:
  pending_policy: "keep_first"
logging:
  filter: "fdc_cart=debug"
"#;

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();

    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
}

#[test]
fn reordered_keys_produce_same_hash() {
    let original = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let reordered = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();

    assert_eq!(
        original.config_hash, reordered.config_hash,
        "reordering keys in YAML must not change the hash"
    );
    assert_eq!(original.canonical_json, reordered.canonical_json);
}

#[test]
fn different_values_produce_different_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML, "cart:\n  currency: EUR\n"]).unwrap();

    assert_ne!(a.config_hash, b.config_hash);
}

#[test]
fn overlay_takes_effect_and_hash_is_stable() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);

    let policy = a
        .config_json
        .pointer("/cart/pending_policy")
        .and_then(|v| v.as_str())
        .unwrap();
    assert_eq!(policy, "keep_first");

    // Untouched sibling survives the merge.
    let currency = a
        .config_json
        .pointer("/cart/currency")
        .and_then(|v| v.as_str())
        .unwrap();
    assert_eq!(currency, "USD");
}

#[test]
fn hash_is_64_hex_chars() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(loaded.config_hash.len(), 64);
    assert!(loaded.config_hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn empty_config_produces_stable_hash() {
    let a = load_layered_yaml_from_strings(&["{}"]).unwrap();
    let b = load_layered_yaml_from_strings(&["{}"]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, "{}");
}
