pub mod app;
pub mod cli;
pub mod config;
pub mod store;
pub mod ui;

pub use config::{AppConfig, ConfigLoader, ConfigPaths};
