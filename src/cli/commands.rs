use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::Result;

use crate::app::App;
use crate::config::{AppConfig, ConfigPaths};

pub fn run_tui(config: Arc<AppConfig>) -> Result<()> {
    let mut app = App::new(config);
    tracing::info!("starting note board");
    let result = app.run();
    if let Err(err) = &result {
        tracing::error!(?err, "note board exited with an error");
    }
    result
}

pub fn print_config(paths: &ConfigPaths, config: &AppConfig) -> Result<()> {
    print!("{}", show_config(paths, config)?);
    Ok(())
}

/// Renders the resolved config location followed by the effective settings.
fn show_config(paths: &ConfigPaths, config: &AppConfig) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "# config file: {}", paths.config_file.display())?;
    writeln!(out, "# log file: {}", paths.log_file().display())?;
    out.push_str(&config.to_toml()?);
    Ok(out)
}
