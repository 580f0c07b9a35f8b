//! NMAP-AI is a terminal operator console for an nmap-planning agent service.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation store, submission lifecycle, agent
//!   dispatch and configuration.
//! - [`ui`] renders the transcript and runs the interactive event loop that
//!   drives operator input and display updates.
//! - [`api`] defines the `/chat` payloads and the HTTP calls to the agent.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which resolves settings and dispatches into
//! [`ui::chat_loop`] for interactive sessions or the one-shot subcommands.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
