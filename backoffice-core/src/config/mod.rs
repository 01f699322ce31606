//! Server configuration shared by the back office services.
//!
//! Values merge from an optional `configuration` file and `APP__`-prefixed
//! environment variables, with the environment taking precedence.

use crate::error::AppError;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP listener binds to. 0 asks the OS for a free port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let merged = config::Config::builder()
            .add_source(config::File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(merged.try_deserialize()?)
    }
}
