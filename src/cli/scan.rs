//! TUI-less "scan" command

use std::error::Error;
use std::io::{self, Write};

use tracing::debug;

use crate::core::app::{apply_actions, App, AppAction, AppCommand};
use crate::core::config::ResolvedSettings;
use crate::core::dispatch::{ScanMessage, ScanService};
use crate::core::message::SubmissionStatus;
use crate::ui::transcript::{build_transcript_lines, plain_lines};

pub async fn run_scan(
    settings: ResolvedSettings,
    target: String,
    intent: Vec<String>,
) -> Result<(), Box<dyn Error>> {
    let intent = intent.join(" ");
    if intent.trim().is_empty() || target.trim().is_empty() {
        eprintln!("Usage: nmapai scan <target> <intent...>");
        std::process::exit(2);
    }

    let app = submit_once(settings, intent, target).await;

    let mut stdout = io::stdout().lock();
    for line in plain_lines(&build_transcript_lines(app.conversation.messages())) {
        writeln!(stdout, "{line}")?;
    }
    writeln!(stdout, "SYSTEM_STATUS: {}", app.conversation.status())?;
    stdout.flush()?;

    if app.conversation.status() == SubmissionStatus::Error {
        std::process::exit(1);
    }
    Ok(())
}

/// Drives one submission through the store and dispatcher until it settles.
pub(crate) async fn submit_once(settings: ResolvedSettings, intent: String, target: String) -> App {
    let mut app = App::new(settings);
    let (scan_service, mut rx) = ScanService::new();

    let commands = apply_actions(&mut app, [AppAction::SubmitScan { intent, target }]);
    if commands.is_empty() {
        return app;
    }
    for cmd in commands {
        match cmd {
            AppCommand::DispatchScan(params) => {
                scan_service.spawn_scan(params);
            }
        }
    }
    drop(scan_service);

    while let Some((ScanMessage::Settled(outcome), submission_id)) = rx.recv().await {
        debug!(submission_id, "one-shot submission settled");
        apply_actions(
            &mut app,
            [AppAction::ScanSettled {
                submission_id,
                outcome,
            }],
        );
        if !app.conversation.status().is_processing() {
            break;
        }
    }
    app
}
