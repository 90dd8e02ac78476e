use anyhow::Context;
use directories::BaseDirs;
use serde::Deserialize;
use std::{env, fs, path::Path, path::PathBuf};
use term_core::exec::DEFAULT_ENDPOINT;
use tracing::warn;
use url::{Host, Url};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BackendFileConfig {
    pub endpoint: Option<String>,
    pub proxy: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    pub endpoint: String,
    pub proxy: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            proxy: None,
        }
    }
}

impl BackendConfig {
    pub fn for_endpoint(endpoint: &str) -> anyhow::Result<Self> {
        Url::parse(endpoint).with_context(|| format!("invalid endpoint url: {}", endpoint))?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            proxy: None,
        })
    }

    /// Defaults, then the config file (if any), then proxy variables.
    /// Read once at startup.
    pub fn from_env_and_file() -> Self {
        let mut cfg = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path).unwrap_or_else(|e| {
                warn!(target: "providers::backend", "ignoring config {}: {:#}", path.display(), e);
                Self::default()
            }),
            _ => Self::default(),
        };
        if cfg.proxy.is_none() {
            cfg.proxy = env::var("HTTPS_PROXY")
                .ok()
                .or_else(|| env::var("HTTP_PROXY").ok());
        }
        cfg
    }

    /// True when the endpoint resolves to this machine. Such requests never
    /// go through a proxy.
    pub fn is_loopback(&self) -> bool {
        let Ok(url) = Url::parse(&self.endpoint) else {
            return false;
        };
        match url.host() {
            Some(Host::Ipv4(ip)) => ip.is_loopback(),
            Some(Host::Ipv6(ip)) => ip.is_loopback(),
            Some(Host::Domain(d)) => d.eq_ignore_ascii_case("localhost"),
            None => false,
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config file: {}", path.display()))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let file_cfg: BackendFileConfig = toml::from_str(text).context("parse config toml")?;
        let mut cfg = match file_cfg.endpoint.as_deref() {
            Some(e) => Self::for_endpoint(e)?,
            None => Self::default(),
        };
        cfg.proxy = file_cfg.proxy;
        Ok(cfg)
    }

    pub fn config_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        let p = if cfg!(target_os = "windows") {
            base.home_dir().join(".codemate").join("config.toml")
        } else {
            base.config_dir().join("codemate").join("config.toml")
        };
        Some(p)
    }
}
