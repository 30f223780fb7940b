//! Dashboard configuration.
//!
//! A JSON file maps onto [`DashboardConfig`]; every field has a default, so an
//! empty object is a valid file. [`DashboardConfig::validate`] turns the raw
//! values into a [`ValidatedConfig`] and is the only fatal step at startup.
//!
//! ```json
//! {
//!   "title": "ETF & ETC Dashboard",
//!   "quote_refresh_secs": 45,
//!   "history_refresh_secs": 1800,
//!   "lookback": "1 year",
//!   "instruments": [
//!     { "symbol": "EUNL.DE", "name": "iShares Core MSCI World", "identifier": "IE00B4L5Y983" }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{InstrumentMeta, LookbackPeriod, Symbol, ValidationError};

pub const DEFAULT_TITLE: &str = "ETF & ETC Dashboard";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config file '{path}' is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("'{field}' must be greater than zero")]
    ZeroInterval { field: &'static str },
    #[error("at least one instrument must be configured")]
    NoInstruments,
    #[error("symbol '{symbol}' is configured more than once")]
    DuplicateSymbol { symbol: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub identifier: String,
}

impl InstrumentConfig {
    fn new(symbol: &str, name: &str, identifier: &str) -> Self {
        Self {
            symbol: symbol.to_owned(),
            name: name.to_owned(),
            identifier: identifier.to_owned(),
        }
    }
}

/// Raw, unvalidated settings as read from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_quote_refresh_secs")]
    pub quote_refresh_secs: u64,
    #[serde(default = "default_history_refresh_secs")]
    pub history_refresh_secs: u64,
    #[serde(default = "default_lookback")]
    pub lookback: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
    #[serde(default = "default_instruments")]
    pub instruments: Vec<InstrumentConfig>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            quote_refresh_secs: default_quote_refresh_secs(),
            history_refresh_secs: default_history_refresh_secs(),
            lookback: default_lookback(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            tick_millis: default_tick_millis(),
            instruments: default_instruments(),
        }
    }
}

impl DashboardConfig {
    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        let quote_interval = positive_secs("quote_refresh_secs", self.quote_refresh_secs)?;
        let history_interval = positive_secs("history_refresh_secs", self.history_refresh_secs)?;
        let fetch_timeout = positive_secs("fetch_timeout_secs", self.fetch_timeout_secs)?;
        if self.tick_millis == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "tick_millis",
            });
        }
        let lookback = self.lookback.parse::<LookbackPeriod>()?;

        if self.instruments.is_empty() {
            return Err(ConfigError::NoInstruments);
        }

        let mut seen = HashSet::with_capacity(self.instruments.len());
        let mut instruments = Vec::with_capacity(self.instruments.len());
        for entry in &self.instruments {
            let symbol = Symbol::parse(&entry.symbol)?;
            if !seen.insert(symbol.clone()) {
                return Err(ConfigError::DuplicateSymbol {
                    symbol: symbol.to_string(),
                });
            }
            instruments.push(InstrumentMeta::new(symbol, &entry.name, &entry.identifier)?);
        }

        Ok(ValidatedConfig {
            title: self.title.trim().to_owned(),
            quote_interval,
            history_interval,
            lookback,
            fetch_timeout,
            tick_interval: Duration::from_millis(self.tick_millis),
            instruments,
        })
    }
}

/// Settings the dashboard runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    pub title: String,
    pub quote_interval: Duration,
    pub history_interval: Duration,
    pub lookback: LookbackPeriod,
    pub fetch_timeout: Duration,
    pub tick_interval: Duration,
    pub instruments: Vec<InstrumentMeta>,
}

fn positive_secs(field: &'static str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::ZeroInterval { field });
    }
    Ok(Duration::from_secs(secs))
}

fn default_title() -> String {
    String::from(DEFAULT_TITLE)
}

fn default_quote_refresh_secs() -> u64 {
    45
}

fn default_history_refresh_secs() -> u64 {
    30 * 60
}

fn default_lookback() -> String {
    String::from("1 year")
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_tick_millis() -> u64 {
    1000
}

fn default_instruments() -> Vec<InstrumentConfig> {
    vec![
        InstrumentConfig::new("EUNL.DE", "iShares Core MSCI World", "IE00B4L5Y983"),
        InstrumentConfig::new("SXR8.DE", "iShares Core S&P 500", "IE00B5BMR087"),
        InstrumentConfig::new("IS3N.DE", "iShares Core MSCI EM IMI", "IE00BKM4GZ66"),
        InstrumentConfig::new("VWCE.DE", "Vanguard FTSE All-World", "IE00BK5BQT80"),
        InstrumentConfig::new("4GLD.DE", "Xetra-Gold", "DE000A0S9GB0"),
    ]
}
