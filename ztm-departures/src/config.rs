//! Process configuration from environment variables.
//!
//! Read once at start-up. The resolved values are passed down explicitly;
//! nothing below `main` looks at the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use chrono_tz::Tz;

use crate::ztm::ZtmConfig;

/// Zone used when `TIMEZONE` is unset.
pub const DEFAULT_TIMEZONE: &str = "CET";

const DEFAULT_PORT: u16 = 5000;

/// Error returned for missing or unusable settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing API key: set the ZTM_API_KEY environment variable")]
    MissingApiKey,

    #[error("invalid {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(name: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            name,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Everything the service needs to start.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Upstream client settings (`ZTM_API_KEY`, `ZTM_BASE_URL`, `ZTM_TIMEOUT_SECS`).
    pub ztm: ZtmConfig,

    /// Zone for "now" and day rollover (`TIMEZONE`).
    pub zone: Tz,

    /// Shared secret expected in `X-Auth-Token` (`AUTH_TOKEN`); `None` disables the check.
    pub auth_token: Option<String>,

    /// Listen address (`HOST`, `PORT`).
    pub listen: SocketAddr,

    /// Serve canned timetables from this directory instead of the API (`ZTM_MOCK_DIR`).
    pub mock_dir: Option<PathBuf>,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mock_dir = var("ZTM_MOCK_DIR").map(PathBuf::from);

        // The key is only optional when the API is never called.
        let api_key = match (var("ZTM_API_KEY"), &mock_dir) {
            (Some(key), _) => key,
            (None, Some(_)) => String::new(),
            (None, None) => return Err(ConfigError::MissingApiKey),
        };

        let mut ztm = ZtmConfig::new(api_key);
        if let Some(url) = var("ZTM_BASE_URL") {
            ztm = ztm.with_base_url(url);
        }
        if let Some(raw) = var("ZTM_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid("ZTM_TIMEOUT_SECS", &raw, e))?;
            ztm = ztm.with_timeout(secs);
        }

        let zone_name = var("TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let zone: Tz = zone_name
            .trim()
            .parse()
            .map_err(|e| ConfigError::invalid("TIMEZONE", &zone_name, e))?;

        let host = match var("HOST") {
            Some(raw) => raw
                .trim()
                .parse::<IpAddr>()
                .map_err(|e| ConfigError::invalid("HOST", &raw, e))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid("PORT", &raw, e))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            ztm,
            zone,
            auth_token: var("AUTH_TOKEN"),
            listen: SocketAddr::new(host, port),
            mock_dir,
        })
    }
}
