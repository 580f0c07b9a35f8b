//! Terminal UI layer for the operator console.
//!
//! - [`chat_loop`]: the interaction loop that routes keys into
//!   [`crate::core::app`] actions and runs submissions in the background.
//! - [`renderer`] and [`title`]: frame layout and the status header.
//! - [`transcript`]: transcript lines shared with the one-shot `scan` output.
//! - [`wrap`]: word wrapping that keeps the scroll bounds equal to the drawn rows.
//!
//! This layer presents and captures interaction state, while [`crate::core`]
//! owns the conversation and the agent calls.

pub mod chat_loop;
pub mod renderer;
pub mod title;
pub mod transcript;
pub mod wrap;
