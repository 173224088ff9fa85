//! Scenario: ledger configuration from environment lookups.
//!
//! GREEN when:
//! - An empty environment yields the documented defaults.
//! - Every variable overrides its field.
//! - Invalid values fail with an error naming the variable.

use std::collections::HashMap;

use rqe_config::{
    LedgerConfig, DEFAULT_DB_PATH, DEFAULT_FILLS_LIMIT, ENV_API_HOST, ENV_API_PORT,
    ENV_AUTO_MIGRATE, ENV_DB_PATH, ENV_FILLS_LIMIT, ENV_LOG, ENV_STRICT_STORE_ERRORS,
};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |k| map.get(k).cloned()
}

#[test]
fn empty_env_yields_defaults() {
    let cfg = LedgerConfig::from_lookup(lookup_from(&[])).unwrap();

    assert_eq!(cfg.db_path.to_str(), Some(DEFAULT_DB_PATH));
    assert_eq!(cfg.api_port, 8080);
    assert_eq!(cfg.bind_addr().to_string(), "0.0.0.0:8080");
    assert_eq!(cfg.fills_limit, DEFAULT_FILLS_LIMIT);
    assert_eq!(cfg.fills_limit, 50);
    assert!(!cfg.strict_store_errors, "lenient /status is the default");
    assert!(!cfg.auto_migrate);
    assert!(cfg.log_filter.is_none());
}

#[test]
fn every_variable_overrides_its_field() {
    let cfg = LedgerConfig::from_lookup(lookup_from(&[
        (ENV_DB_PATH, "./rqe.sqlite"),
        (ENV_API_HOST, "127.0.0.1"),
        (ENV_API_PORT, "9191"),
        (ENV_FILLS_LIMIT, "200"),
        (ENV_STRICT_STORE_ERRORS, "true"),
        (ENV_AUTO_MIGRATE, "1"),
        (ENV_LOG, "rqe_daemon=debug"),
    ]))
    .unwrap();

    assert_eq!(cfg.db_path.to_str(), Some("./rqe.sqlite"));
    assert_eq!(cfg.bind_addr().to_string(), "127.0.0.1:9191");
    assert_eq!(cfg.fills_limit, 200);
    assert!(cfg.strict_store_errors);
    assert!(cfg.auto_migrate);
    assert_eq!(cfg.log_filter.as_deref(), Some("rqe_daemon=debug"));
}

#[test]
fn invalid_port_is_rejected_with_variable_name() {
    let err = LedgerConfig::from_lookup(lookup_from(&[(ENV_API_PORT, "80808")])).unwrap_err();
    assert!(
        format!("{err:#}").contains(ENV_API_PORT),
        "error should name the variable: {err:#}"
    );
}

#[test]
fn out_of_range_fills_limit_is_rejected() {
    for bad in ["0", "10001", "-5", "lots"] {
        let err = LedgerConfig::from_lookup(lookup_from(&[(ENV_FILLS_LIMIT, bad)])).unwrap_err();
        assert!(
            format!("{err:#}").contains(ENV_FILLS_LIMIT),
            "limit {bad:?} should be rejected naming the variable: {err:#}"
        );
    }
}

#[test]
fn invalid_flag_is_rejected() {
    let err = LedgerConfig::from_lookup(lookup_from(&[(ENV_STRICT_STORE_ERRORS, "sometimes")]))
        .unwrap_err();
    assert!(format!("{err:#}").contains(ENV_STRICT_STORE_ERRORS));
}
