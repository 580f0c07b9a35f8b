//! Interactive operator console loop.
//!
//! [`run_chat`] owns the terminal for the session: it reads key events, turns
//! them into [`AppAction`](crate::core::app::AppAction)s, hands submissions to
//! the [`ScanService`](crate::core::dispatch::ScanService) and redraws
//! whenever the conversation changes.

mod event_loop;
mod keybindings;
mod lifecycle;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::core::app::App;

pub use event_loop::run_chat;

/// Shared access to the [`App`] for the loop and its helpers.
#[derive(Clone)]
pub struct AppHandle {
    inner: Arc<Mutex<App>>,
}

impl AppHandle {
    pub fn new(inner: Arc<Mutex<App>>) -> Self {
        Self { inner }
    }

    pub async fn read<R>(&self, f: impl FnOnce(&App) -> R) -> R {
        let guard = self.inner.lock().await;
        f(&guard)
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut App) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }
}
