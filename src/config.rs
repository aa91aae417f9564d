use crate::catalog::{default_bot_entries, validate_entries, BotCatalog, BotEntry};
use crate::command::DispatchSettings;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "dialer.yaml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorKind {
    #[default]
    Http,
    Simulate,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub executor: ExecutorKind,
    #[serde(default = "default_simulate_delay_ms")]
    pub simulate_delay_ms: u64,
    #[serde(default)]
    pub dispatch: DispatchSettings,
    #[serde(default = "default_bot_entries")]
    pub bots: Vec<BotEntry>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            executor: ExecutorKind::default(),
            simulate_delay_ms: default_simulate_delay_ms(),
            dispatch: DispatchSettings::default(),
            bots: default_bot_entries(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:5000/execute".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_simulate_delay_ms() -> u64 {
    1000
}

impl AppConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg: AppConfig = serde_yaml::from_str(s).context("parsing dialer config")?;
        validate_app_config(&cfg).map_err(|e| anyhow!(e))?;
        Ok(cfg)
    }

    pub fn catalog(&self) -> Result<BotCatalog> {
        BotCatalog::from_entries(self.bots.clone()).map_err(|e| anyhow!(e))
    }
}

pub(crate) fn validate_app_config(cfg: &AppConfig) -> Result<(), String> {
    if cfg.endpoint.trim().is_empty() {
        return Err("endpoint must not be empty".to_string());
    }
    if cfg.timeout_secs == 0 {
        return Err("timeout_secs must be greater than zero".to_string());
    }
    validate_entries(&cfg.bots)
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let s = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
    AppConfig::from_yaml_str(&s).with_context(|| format!("loading {path:?}"))
}

/// Locate a config file: `$DIALER_CONFIG_DIR`, then CWD, `.tui/` in CWD and
/// its ancestors, then `~/.tui/`.
pub fn discover_config_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("DIALER_CONFIG_DIR") {
        let p = PathBuf::from(base).join(CONFIG_FILE);
        if p.exists() {
            return Some(p);
        }
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let candidates = [cwd.join(CONFIG_FILE), cwd.join(".tui").join(CONFIG_FILE)];
    if let Some(p) = candidates.into_iter().find(|p| p.exists()) {
        return Some(p);
    }
    let mut cur = cwd.as_path();
    while let Some(parent) = cur.parent() {
        let p = parent.join(".tui").join(CONFIG_FILE);
        if p.exists() {
            return Some(p);
        }
        cur = parent;
    }
    std::env::var("HOME")
        .ok()
        .or_else(|| std::env::var("USERPROFILE").ok())
        .map(|home| PathBuf::from(home).join(".tui").join(CONFIG_FILE))
        .filter(|p| p.exists())
}

/// Load the configuration. An explicit path must exist; otherwise discovery
/// falls back to built-in defaults when no file is found.
pub fn load_config(explicit: Option<&Path>) -> Result<(AppConfig, Option<PathBuf>)> {
    if let Some(p) = explicit {
        return Ok((read_config(p)?, Some(p.to_path_buf())));
    }
    match discover_config_path() {
        Some(p) => {
            let cfg = read_config(&p)?;
            Ok((cfg, Some(p)))
        }
        None => Ok((AppConfig::default(), None)),
    }
}
