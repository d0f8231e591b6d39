//! Layered configuration and logging setup for stubwright

pub mod config;
pub mod logging;

pub use config::{AppConfig, LogFormat, LoggingConfig, TestingConfig};
