//! Config hashing determinism.
//!
//! GREEN when:
//! - the same layers hash identically across calls
//! - reordering keys inside a document does not change the hash
//! - a changed value changes the hash

use hqm_config::load_layered_yaml_from_strings;

const BASE_YAML: &str = r#"
universe:
  path: "data/sp_500_stocks.csv"
selection:
  top_n: 50
api:
  token_env: "IEX_TOKEN"
  base_url: "https://sandbox.iexapis.com/stable"
"#;

const BASE_YAML_REORDERED: &str = r#"
api:
  base_url: "https://sandbox.iexapis.com/stable"
  token_env: "IEX_TOKEN"
selection:
  top_n: 50
universe:
  path: "data/sp_500_stocks.csv"
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
        "key order inside a document must not change the hash"
    );
}

#[test]
fn different_values_produce_different_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML, "selection:\n  top_n: 25\n"]).unwrap();

    assert_ne!(a.config_hash, b.config_hash);
}

#[test]
fn hash_is_hex_sha256() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(a.config_hash.len(), 64);
    assert!(a.config_hash.chars().all(|c| c.is_ascii_hexdigit()));
}
