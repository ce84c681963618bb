// Configuration loading and management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

pub const PROD: &str = "prod";
pub const TEST: &str = "test";

const DEFAULT_PREFIX: &str = "/api";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_SYNC_BATCH: usize = 1000;
const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(35);
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 3600);
const DEFAULT_PREVIEW_LEN: usize = 10;

/// Language used for month labels in the year-over-year trend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    De,
    En,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Dashboard {
    #[serde(rename = "dashboard")]
    pub dashboard: DashboardBox,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardBox {
    pub env: String,
    pub logs: Option<Logs>,
    pub api: Option<Api>,
    #[serde(default)]
    pub devices: Vec<Device>,
    pub upstream: Option<Upstream>,
    pub data: Option<Data>,
    pub cache: Option<Cache>,
    #[serde(default)]
    pub locale: Locale,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logs {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Api {
    pub name: Option<String>,
    pub port: Option<String>,
    pub prefix: Option<String>,
    #[serde(default, rename = "request_timeout", with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
}

/// A press known to the registry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Upstream {
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
    #[serde(rename = "sync_batch")]
    pub sync_batch: Option<usize>,
    /// Pause between background sync runs.
    #[serde(default, rename = "sync_interval", with = "humantime_serde")]
    pub sync_interval: Option<Duration>,
    /// Starts the background sync with the application.
    #[serde(default, rename = "auto_sync")]
    pub auto_sync: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Mock {
    pub enabled: bool,
    #[serde(rename = "jobs_per_device")]
    pub jobs_per_device: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Data {
    pub mock: Option<Mock>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Cache {
    pub enabled: bool,
    #[serde(default, with = "humantime_serde")]
    pub ttl: Option<Duration>,
    #[serde(rename = "preview_len")]
    pub preview_len: Option<usize>,
    #[serde(default, rename = "sweep_interval", with = "humantime_serde")]
    pub sweep_interval: Option<Duration>,
}

// Config trait
pub trait ConfigTrait {
    fn logs(&self) -> Option<&Logs>;
    fn is_prod(&self) -> bool;
    fn is_test(&self) -> bool;
    fn api(&self) -> Option<&Api>;
    fn prefix(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn devices(&self) -> &[Device];
    fn upstream_timeout(&self) -> Duration;
    fn sync_batch(&self) -> usize;
    fn sync_interval(&self) -> Duration;
    fn auto_sync(&self) -> bool;
    fn mock(&self) -> Option<&Mock>;
    fn cache_enabled(&self) -> bool;
    fn cache_ttl(&self) -> Duration;
    fn cache_preview_len(&self) -> usize;
    fn cache_sweep_interval(&self) -> Option<Duration>;
    fn locale(&self) -> Locale;
}

// Config type alias for convenience
pub type Config = Dashboard;

impl ConfigTrait for Config {
    fn logs(&self) -> Option<&Logs> {
        self.dashboard.logs.as_ref()
    }

    fn is_prod(&self) -> bool {
        self.dashboard.env == PROD
    }

    fn is_test(&self) -> bool {
        self.dashboard.env == TEST
    }

    fn api(&self) -> Option<&Api> {
        self.dashboard.api.as_ref()
    }

    fn prefix(&self) -> &str {
        self.dashboard
            .api
            .as_ref()
            .and_then(|api| api.prefix.as_deref())
            .unwrap_or(DEFAULT_PREFIX)
    }

    fn request_timeout(&self) -> Duration {
        self.dashboard
            .api
            .as_ref()
            .and_then(|api| api.request_timeout)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    fn devices(&self) -> &[Device] {
        &self.dashboard.devices
    }

    fn upstream_timeout(&self) -> Duration {
        self.dashboard
            .upstream
            .as_ref()
            .and_then(|u| u.timeout)
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT)
    }

    fn sync_batch(&self) -> usize {
        self.dashboard
            .upstream
            .as_ref()
            .and_then(|u| u.sync_batch)
            .unwrap_or(DEFAULT_SYNC_BATCH)
            .max(1)
    }

    fn sync_interval(&self) -> Duration {
        self.dashboard
            .upstream
            .as_ref()
            .and_then(|u| u.sync_interval)
            .unwrap_or(DEFAULT_SYNC_INTERVAL)
    }

    fn auto_sync(&self) -> bool {
        self.dashboard.upstream.as_ref().is_some_and(|u| u.auto_sync)
    }

    fn mock(&self) -> Option<&Mock> {
        self.dashboard.data.as_ref().and_then(|d| d.mock.as_ref())
    }

    fn cache_enabled(&self) -> bool {
        self.dashboard.cache.as_ref().map(|c| c.enabled).unwrap_or(true)
    }

    fn cache_ttl(&self) -> Duration {
        self.dashboard
            .cache
            .as_ref()
            .and_then(|c| c.ttl)
            .unwrap_or(DEFAULT_CACHE_TTL)
    }

    fn cache_preview_len(&self) -> usize {
        self.dashboard
            .cache
            .as_ref()
            .and_then(|c| c.preview_len)
            .unwrap_or(DEFAULT_PREVIEW_LEN)
    }

    fn cache_sweep_interval(&self) -> Option<Duration> {
        self.dashboard.cache.as_ref().and_then(|c| c.sweep_interval)
    }

    fn locale(&self) -> Locale {
        self.dashboard.locale
    }
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let abs_path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve absolute config filepath: {:?}", path))?;

        let data = std::fs::read_to_string(&abs_path)
            .with_context(|| format!("read config yaml file {:?}", abs_path))?;

        Self::from_yaml(&data).with_context(|| format!("load config from {:?}", abs_path))
    }

    /// Parses and validates configuration from a YAML document.
    pub fn from_yaml(data: &str) -> Result<Self> {
        let cfg: Dashboard = serde_yaml::from_str(data).context("unmarshal yaml")?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.dashboard.devices.is_empty() {
            anyhow::bail!("no devices configured");
        }

        let mut seen = HashSet::new();
        for device in &self.dashboard.devices {
            if device.id.trim().is_empty() {
                anyhow::bail!("device with empty id configured");
            }
            if device.id == "all" {
                anyhow::bail!("device id \"all\" is reserved");
            }
            if !seen.insert(device.id.as_str()) {
                anyhow::bail!("duplicate device id {}", device.id);
            }
        }

        if self.sync_interval().is_zero() {
            anyhow::bail!("upstream.sync_interval must be greater than zero");
        }

        if self.cache_ttl().is_zero() {
            anyhow::bail!("cache.ttl must be greater than zero");
        }

        let prefix = self.prefix();
        if !prefix.is_empty() && (!prefix.starts_with('/') || prefix.ends_with('/')) {
            anyhow::bail!("api.prefix must start with '/' and must not end with '/'");
        }

        Ok(())
    }
}

// Test config is always available for integration tests
mod test_config;
pub use test_config::new_test_config;
