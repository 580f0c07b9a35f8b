//! Settings management for CLI set/unset commands.
//!
//! Each configuration key has a [`SettingHandler`] registered in the
//! [`SettingRegistry`]. Handlers validate input and edit a [`Config`] in
//! memory; [`set_in_file`] and [`unset_in_file`] wrap them with a load and an
//! atomic save.

pub mod error;
pub mod handlers;
pub mod registry;

use std::path::Path;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::config::data::Config;

/// Trait for handling a configuration setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Set the configuration value from the words after the key.
    ///
    /// Returns the success message to display.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Unset (clear) the configuration value.
    fn unset(&self, config: &mut Config) -> Result<String, SettingError>;

    /// Format the current value for display in `nmapai set` output.
    fn format(&self, config: &Config) -> String;
}

pub fn set_in_file(
    registry: &SettingRegistry,
    path: &Path,
    key: &str,
    args: &[String],
) -> Result<String, SettingError> {
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    let mut config = load(path)?;
    let message = handler.set(args, &mut config)?;
    save(&config, path)?;
    Ok(message)
}

pub fn unset_in_file(
    registry: &SettingRegistry,
    path: &Path,
    key: &str,
) -> Result<String, SettingError> {
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    let mut config = load(path)?;
    let message = handler.unset(&mut config)?;
    save(&config, path)?;
    Ok(message)
}

fn load(path: &Path) -> Result<Config, SettingError> {
    Config::load_from_path(path).map_err(|e| SettingError::ConfigError(e.to_string()))
}

fn save(config: &Config, path: &Path) -> Result<(), SettingError> {
    config
        .save_to_path(path)
        .map_err(|e| SettingError::ConfigError(e.to_string()))
}
