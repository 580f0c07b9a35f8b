//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod health;
pub mod scan;
pub mod settings;


use std::error::Error;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::cli::health::run_health;
use crate::cli::scan::run_scan;
use crate::cli::settings::{set_in_file, unset_in_file, SettingError, SettingRegistry};
use crate::core::config::data::AGENT_URL_ENV;
use crate::core::config::{Config, ResolvedSettings};
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::{init_logging, LogTarget};
use crate::utils::url::parse_agent_url;

#[derive(Parser)]
#[command(name = "nmapai")]
#[command(version)]
#[command(about = "Operator console for the NMAP-AI scan planning agent")]
#[command(
    long_about = "NMAP-AI is a full-screen terminal console for the NMAP-AI agent service. \
Describe what you want to learn about a target in plain language; the agent replies with \
an nmap command, the category of agent that planned it, and whether the command passed \
validation.\n\n\
Environment Variables:\n\
  NMAPAI_AGENT_URL  Agent service address (overrides the config file)\n\
  NMAPAI_LOG        Log filter, e.g. nmapai=debug (default nmapai=info)\n\n\
Controls:\n\
  Type              Enter text in the focused input (TARGET or INTENT)\n\
  Enter             Submit the intent for the target\n\
  Tab               Switch between TARGET and INTENT\n\
  Ctrl+L            Clear the intent\n\
  Up/Down/PgUp/PgDn Scroll the transcript\n\
  End               Follow the newest entry\n\
  Ctrl+C/Esc        Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Agent service address, e.g. http://localhost:8000
    #[arg(long, global = true, value_name = "URL")]
    pub agent_url: Option<String>,

    /// Enable logging to specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the operator console (default)
    Chat,
    /// Submit one intent without the console and print the transcript
    Scan {
        /// Host, address or CIDR range to scan
        target: String,
        /// What to find out about the target (may be several words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        intent: Vec<String>,
    },
    /// Check that the agent service answers
    Health,
    /// Set configuration values, or show them when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

impl Commands {
    fn is_interactive(&self) -> bool {
        matches!(self, Commands::Chat)
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Chat);

    init_logging(LogTarget::select(args.log, command.is_interactive()))?;

    match command {
        Commands::Set { key, value } => {
            let registry = SettingRegistry::new();
            let path = Config::get_config_path()?;
            match key {
                Some(key) => report_setting(set_in_file(&registry, &path, &key, &value)),
                None => registry.print_all(&Config::load_from_path(&path)?),
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let registry = SettingRegistry::new();
            let path = Config::get_config_path()?;
            report_setting(unset_in_file(&registry, &path, &key));
            Ok(())
        }
        command => {
            let settings = load_settings(args.agent_url.as_deref())?;
            match command {
                Commands::Scan { target, intent } => run_scan(settings, target, intent).await,
                Commands::Health => run_health(settings).await,
                _ => run_chat(settings).await,
            }
        }
    }
}

fn load_settings(cli_agent_url: Option<&str>) -> Result<ResolvedSettings, Box<dyn Error>> {
    let config = Config::load()?;
    let env_agent_url = std::env::var(AGENT_URL_ENV).ok();
    match checked_settings(&config, cli_agent_url, env_agent_url.as_deref()) {
        Ok(settings) => {
            debug!(agent_url = %settings.agent_url, "resolved settings");
            Ok(settings)
        }
        Err(err) => {
            err.print();
            std::process::exit(2);
        }
    }
}

/// Resolves settings and rejects an agent address that is not an http(s) URL,
/// whichever source it came from.
fn checked_settings(
    config: &Config,
    cli_agent_url: Option<&str>,
    env_agent_url: Option<&str>,
) -> Result<ResolvedSettings, SettingError> {
    let mut settings = config.resolve(cli_agent_url, env_agent_url);
    let agent_url =
        parse_agent_url(&settings.agent_url).map_err(|reason| SettingError::InvalidValue {
            key: "agent-url",
            input: settings.agent_url.clone(),
            reason,
        })?;
    settings.agent_url = agent_url;
    Ok(settings)
}

fn report_setting(result: Result<String, SettingError>) {
    match result {
        Ok(message) => println!("{message}"),
        Err(err) => {
            err.print();
            std::process::exit(err.exit_code());
        }
    }
}
