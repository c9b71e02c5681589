//! Server configuration.
//!
//! Sources merge in increasing precedence: built-in defaults, the optional
//! YAML file, `RBAC_WIZARD_*` environment variables (nested keys joined with
//! `__`, e.g. `RBAC_WIZARD_SERVER__PORT`), then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use rbac_graph::config::KubeClientConfig;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "RBAC_WIZARD_";

const SECTIONS: [&str; 4] = ["server", "logging", "cors", "kube"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
    pub kube: KubeClientConfig,
}

impl AppConfig {
    /// Load and merge every configuration source.
    ///
    /// # Errors
    ///
    /// Fails when `file` is given but missing, or when any source holds an
    /// unknown key or a value of the wrong type.
    pub fn load(file: Option<&Path>, port: Option<u16>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = file {
            if !path.is_file() {
                bail!("config file {} does not exist", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        // Only configuration sections are read; build-time variables such as
        // RBAC_WIZARD_BUILD_COMMIT share the prefix.
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .filter(|key| {
                    SECTIONS
                        .iter()
                        .any(|section| key.starts_with(&format!("{section}__")))
                })
                .split("__"),
        );

        if let Some(port) = port {
            figment = figment.merge(Serialized::default("server.port", port));
        }

        figment.extract().context("invalid configuration")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_host: String,
    pub port: u16,
    /// Directory holding the built web UI. Only the API is served when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_owned(),
            port: 8080,
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`, `off`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins. Empty means `http://localhost:<port>` and
    /// `http://localhost:3000`. `https://<Host>` is always accepted.
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
    /// Max age for preflight caching in seconds
    pub max_age_seconds: u64,
}

impl CorsConfig {
    /// Origins accepted regardless of the request's `Host`.
    #[must_use]
    pub fn effective_origins(&self, port: u16) -> Vec<String> {
        if self.allowed_origins.is_empty() {
            vec![
                format!("http://localhost:{port}"),
                "http://localhost:3000".to_owned(),
            ]
        } else {
            self.allowed_origins.clone()
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: vec!["GET".to_owned(), "POST".to_owned(), "OPTIONS".to_owned()],
            allowed_headers: vec![
                "Accept".to_owned(),
                "Content-Type".to_owned(),
                "X-CSRF-Token".to_owned(),
            ],
            allow_credentials: true,
            max_age_seconds: 600,
        }
    }
}
