// src/core/mod.rs
//! Configuration and file system services shared by the CLI and the API

pub mod config_manager;
pub mod fs_ops;

pub use config_manager::{
    ConfigManager, EnvironmentConfig, LlmConfig, OcrConfig, ScraperConfig, ServerConfig,
};
pub use fs_ops::FsOps;
