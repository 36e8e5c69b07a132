#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashMap;

use chrono::NaiveDate;
use listenchart_server::config;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |k| map.get(k).cloned()
}

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
store:
  adr: "redis:6379" # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_CONFIG");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:8000");
    assert_eq!(cfg.store.addr, "127.0.0.1:6379");
    assert_eq!(cfg.store.max_in_flight, 8);
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
server:
  listen: "127.0.0.1:9000"
  static_dir: "web"
store:
  addr: "redis:6380"
  db: 2
  max_in_flight: 4
chart:
  start: "2024-01-15"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.server.static_dir, "web");
    assert_eq!(cfg.store.redis_url(), "redis://redis:6380/2");
    assert_eq!(cfg.chart.start, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
}

#[test]
fn rejects_out_of_range_values() {
    for bad in [
        "version: 2\n",
        "version: 1\nserver: { listen: \"nope\" }\n",
        "version: 1\nstore: { max_in_flight: 0 }\n",
        "version: 1\nstore: { addr: \"\" }\n",
        "version: 1\nstore: { connect_timeout_ms: 0 }\n",
        "version: 1\nstore: { response_timeout_ms: 600000 }\n",
        "version: 1\nchart: { start: \"27-03-2024\" }\n",
    ] {
        let err = config::load_from_str(bad).expect_err(bad);
        assert_eq!(err.code().as_str(), "BAD_CONFIG", "{bad}");
    }
}

#[test]
fn missing_file_uses_defaults() {
    let cfg = config::load_with("does/not/exist.yaml", env(&[])).expect("defaults");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:8000");
    assert_eq!(cfg.chart.start, NaiveDate::from_ymd_opt(2024, 3, 27).unwrap());
}

#[test]
fn env_overrides() {
    let cfg = config::load_with(
        "does/not/exist.yaml",
        env(&[
            ("API_PORT", "9100"),
            ("STORE_ADDR", "cache.internal:6379"),
            ("CHART_START", "2024-02-01"),
        ]),
    )
    .expect("overrides");
    assert_eq!(cfg.server.listen, "0.0.0.0:9100");
    assert_eq!(cfg.store.addr, "cache.internal:6379");
    assert_eq!(cfg.chart.start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
}

#[test]
fn legacy_port_variable() {
    let cfg = config::load_with("does/not/exist.yaml", env(&[("APIPort", "8081")])).unwrap();
    assert_eq!(cfg.server.listen_addr().unwrap().port(), 8081);

    let cfg = config::load_with(
        "does/not/exist.yaml",
        env(&[("API_PORT", "8082"), ("APIPort", "8081")]),
    )
    .unwrap();
    assert_eq!(cfg.server.listen_addr().unwrap().port(), 8082);
}

#[test]
fn bad_env_values_fail() {
    let err = config::load_with("does/not/exist.yaml", env(&[("API_PORT", "http")])).unwrap_err();
    assert_eq!(err.code().as_str(), "BAD_CONFIG");

    let err = config::load_with("does/not/exist.yaml", env(&[("CHART_START", "yesterday")]))
        .unwrap_err();
    assert_eq!(err.code().as_str(), "BAD_CONFIG");
}
