mod app_config;
mod config;
mod lead;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use lead::{
    AggregatorFlags, CellValue, FlagMode, Lead, Rating, YesNo, DEFAULT_LOCATION_LINK,
    DEFAULT_TEXT, JUSTDIAL_DOMAIN, TRIPADVISOR_DOMAIN,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
