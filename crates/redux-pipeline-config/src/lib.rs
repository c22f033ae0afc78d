//! Configuration for redux-pipeline stores
//!
//! This crate provides:
//! - Configuration file lookup (TOML, CWD first, then home directory)
//! - Store configuration (StoreConfig) with defaults for every field

pub mod config_file;
pub mod store_config;

pub use config_file::ConfigFile;
pub use store_config::StoreConfig;
