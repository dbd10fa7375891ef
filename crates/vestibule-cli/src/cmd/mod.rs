pub mod check;
pub mod layout;
pub mod simulate;

use anyhow::Context;
use std::path::Path;
use vestibule_core::config::WelcomeConfig;

/// Load the config file when one was given, otherwise the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<WelcomeConfig> {
    match path {
        Some(path) => WelcomeConfig::load(path)
            .with_context(|| format!("could not load config from {}", path.display())),
        None => Ok(WelcomeConfig::default()),
    }
}
