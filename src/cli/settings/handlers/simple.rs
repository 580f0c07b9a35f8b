//! Handlers for single-value string settings.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::SettingHandler;
use crate::core::config::data::{is_valid_timestamp_format, Config, DEFAULT_AGENT_URL};
use crate::core::conversation::DEFAULT_TIMESTAMP_FORMAT;
use crate::utils::url::parse_agent_url;

fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}

fn success_unset(key: &str) -> String {
    format!("✅ Unset {key}")
}

fn format_value(key: &str, value: Option<&str>, default: &str) -> String {
    match value {
        Some(value) => format!("  {key}: {value}"),
        None => format!("  {key}: (unset, using {default})"),
    }
}

/// Handler for the `agent-url` setting.
pub struct AgentUrlHandler;

impl SettingHandler for AgentUrlHandler {
    fn key(&self) -> &'static str {
        "agent-url"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let [input] = args else {
            return Err(SettingError::MissingArgs {
                hint: "To set the agent address, specify a single URL:",
                example: "nmapai set agent-url http://localhost:8000",
            });
        };

        let normalized = parse_agent_url(input).map_err(|reason| SettingError::InvalidValue {
            key: "agent-url",
            input: input.clone(),
            reason,
        })?;

        let message = success_set(self.key(), &normalized);
        config.agent_url = Some(normalized);
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        config.agent_url = None;
        Ok(success_unset(self.key()))
    }

    fn format(&self, config: &Config) -> String {
        format_value(self.key(), config.agent_url.as_deref(), DEFAULT_AGENT_URL)
    }
}

/// Handler for the `timestamp-format` setting.
pub struct TimestampFormatHandler;

impl SettingHandler for TimestampFormatHandler {
    fn key(&self) -> &'static str {
        "timestamp-format"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To set the timestamp format, specify a strftime pattern:",
                example: "nmapai set timestamp-format %H:%M:%S",
            });
        }

        let format = args.join(" ");
        if !is_valid_timestamp_format(&format) {
            return Err(SettingError::InvalidValue {
                key: "timestamp-format",
                input: format,
                reason: "not a valid strftime pattern".to_string(),
            });
        }

        let message = success_set(self.key(), &format);
        config.timestamp_format = Some(format);
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        config.timestamp_format = None;
        Ok(success_unset(self.key()))
    }

    fn format(&self, config: &Config) -> String {
        format_value(
            self.key(),
            config.timestamp_format.as_deref(),
            DEFAULT_TIMESTAMP_FORMAT,
        )
    }
}
