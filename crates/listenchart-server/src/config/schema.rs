use std::net::SocketAddr;

use chrono::NaiveDate;
use listenchart_core::error::{ListenChartError, Result};
use listenchart_core::range::parse_storage_key;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListenChartConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub chart: ChartSection,
}

impl Default for ListenChartConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            store: StoreSection::default(),
            chart: ChartSection::default(),
        }
    }
}

impl ListenChartConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ListenChartError::BadConfig(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.store.validate()?;

        Ok(())
    }

    /// Apply environment overrides. `lookup` is `std::env::var` outside tests.
    ///
    /// - `API_PORT` (or legacy `APIPort`): listen port
    /// - `STORE_ADDR`: store `host:port`
    /// - `CHART_START`: first charted day, `YYYY-MM-DD`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("API_PORT").or_else(|| lookup("APIPort")) {
            let port: u16 = port.trim().parse().map_err(|_| {
                ListenChartError::BadConfig(format!("API_PORT must be a port number, got {port:?}"))
            })?;
            let mut addr = self.server.listen_addr()?;
            addr.set_port(port);
            self.server.listen = addr.to_string();
        }

        if let Some(addr) = lookup("STORE_ADDR") {
            self.store.addr = addr.trim().to_string();
        }

        if let Some(start) = lookup("CHART_START") {
            self.chart.start = parse_storage_key(&start).ok_or_else(|| {
                ListenChartError::BadConfig(format!(
                    "CHART_START must be YYYY-MM-DD, got {start:?}"
                ))
            })?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Directory holding `index.html`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            static_dir: default_static_dir(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            ListenChartError::BadConfig(format!(
                "server.listen must be a valid socket address, got {:?}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}
fn default_static_dir() -> String {
    "static".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    /// Redis `host:port`.
    #[serde(default = "default_store_addr")]
    pub addr: String,

    #[serde(default)]
    pub db: i64,

    /// Upper bound on concurrent lookups while building one chart.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            addr: default_store_addr(),
            db: 0,
            max_in_flight: default_max_in_flight(),
            connect_timeout_ms: default_connect_timeout_ms(),
            response_timeout_ms: default_response_timeout_ms(),
        }
    }
}

impl StoreSection {
    pub fn validate(&self) -> Result<()> {
        if self.addr.trim().is_empty() {
            return Err(ListenChartError::BadConfig("store.addr must not be empty".into()));
        }
        if self.db < 0 {
            return Err(ListenChartError::BadConfig("store.db must not be negative".into()));
        }
        if !(1..=64).contains(&self.max_in_flight) {
            return Err(ListenChartError::BadConfig(
                "store.max_in_flight must be between 1 and 64".into(),
            ));
        }
        if !(100..=60000).contains(&self.connect_timeout_ms) {
            return Err(ListenChartError::BadConfig(
                "store.connect_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        if !(100..=60000).contains(&self.response_timeout_ms) {
            return Err(ListenChartError::BadConfig(
                "store.response_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn redis_url(&self) -> String {
        format!("redis://{}/{}", self.addr, self.db)
    }
}

fn default_store_addr() -> String {
    "127.0.0.1:6379".into()
}
fn default_max_in_flight() -> usize {
    8
}
fn default_connect_timeout_ms() -> u64 {
    2000
}
fn default_response_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartSection {
    /// First charted day (`YYYY-MM-DD`); the range always ends today.
    #[serde(default = "default_start")]
    pub start: NaiveDate,
}

impl Default for ChartSection {
    fn default() -> Self {
        Self { start: default_start() }
    }
}

fn default_start() -> NaiveDate {
    // First day the collector wrote a blob.
    NaiveDate::from_ymd_opt(2024, 3, 27).unwrap_or(NaiveDate::MIN)
}
