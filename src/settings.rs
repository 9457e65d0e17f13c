use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::MentorlinkError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// IP address and port to bind to
    pub bind: String,
    /// Path to the sqlite database file
    pub database: String,
    /// API authentication token
    pub auth: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bind: "127.0.0.1:8080".to_owned(),
            database: "mentorlink.sqlite".to_owned(),
            auth: String::new(),
        }
    }
}

impl Settings {
    /// Defaults, overridden by the config file if present, overridden by
    /// MENTORLINK_* environment variables.
    pub fn load(config: Option<&Path>) -> Result<Self, MentorlinkError> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        if let Some(path) = config {
            figment = figment.merge(Toml::file(path));
        }
        let settings = figment.merge(Env::prefixed("MENTORLINK_")).extract()?;
        Ok(settings)
    }
}
