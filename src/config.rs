//! Layered configuration.
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file,
//! `RPCREST_*` environment variables, then CLI flags that were actually
//! passed.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "rpcrest.toml";
pub const ENV_PREFIX: &str = "RPCREST_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind: SocketAddr,
    pub verbose: bool,
    /// Emit logs as JSON lines.
    pub json_logs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            verbose: false,
            json_logs: false,
        }
    }
}

impl AppConfig {
    /// Build the configuration. `config_file` defaults to
    /// [`DEFAULT_CONFIG_FILE`] and may be absent on disk. `overrides` should
    /// skip serializing unset fields so they do not mask lower layers.
    pub fn new<T: Serialize>(
        config_file: Option<&Path>,
        overrides: Option<&T>,
    ) -> Result<Self, figment::Error> {
        let config_file = config_file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX));

        if let Some(overrides) = overrides {
            figment = figment.merge(Serialized::defaults(overrides));
        }

        figment.extract()
    }
}
