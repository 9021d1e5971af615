//! Shared configuration and warehouse row types for the ETL jobs.

pub mod app_config;
pub mod config;
pub mod rows;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, MAX_BATCH_SIZE};
pub use rows::{CategoryDimRow, ChannelDimRow, ChannelFactRow, VideoDimRow, VideoFactRow};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
