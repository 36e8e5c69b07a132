//! Server config loader.
//!
//! Defaults, then an optional strict YAML file, then environment overrides.
//! A missing file is not an error; a malformed one is.

pub mod schema;

use std::{fs, io};

use listenchart_core::error::{ListenChartError, Result};

pub use schema::{ChartSection, ListenChartConfig, ServerSection, StoreSection};

pub const DEFAULT_PATH: &str = "listenchart.yaml";

/// Load `path` and apply overrides from the process environment.
pub fn load(path: &str) -> Result<ListenChartConfig> {
    load_with(path, |k| std::env::var(k).ok())
}

pub fn load_with<F>(path: &str, lookup: F) -> Result<ListenChartConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!(%path, "no config file found, using defaults");
            ListenChartConfig::default()
        }
        Err(e) => {
            return Err(ListenChartError::BadConfig(format!("read config failed: {e}")));
        }
    };

    cfg.apply_overrides(lookup)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_str(s: &str) -> Result<ListenChartConfig> {
    let cfg: ListenChartConfig = serde_yaml::from_str(s)
        .map_err(|e| ListenChartError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
