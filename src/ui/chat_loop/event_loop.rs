//! Event polling, dispatching, and UI rendering loop.
//!
//! Terminal input is read on a blocking task and forwarded over a channel.
//! Each iteration routes pending key events, turns settled scans into
//! actions, applies queued actions to the shared [`App`], spawns any
//! resulting scan and redraws when something changed.

use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::app::{apply_actions, App, AppAction, AppActionDispatcher, AppCommand};
use crate::core::config::ResolvedSettings;
use crate::core::dispatch::{ScanMessage, ScanService};
use crate::ui::renderer::ui;

use super::keybindings::{handle_key_event, handle_paste, KeyResult};
use super::lifecycle::{restore_terminal, setup_terminal, SharedTerminal};
use super::AppHandle;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

async fn is_exit_requested(app: &AppHandle) -> bool {
    app.read(|app| app.ui.exit_requested).await
}

async fn try_draw_frame(
    app: &AppHandle,
    terminal: &SharedTerminal,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    let mut terminal_guard = terminal.lock().await;
    app.update(|app| terminal_guard.draw(|f| ui(f, app))).await?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

struct EventProcessingOutcome {
    events_processed: bool,
    request_redraw: bool,
    exit_requested: bool,
}

async fn process_ui_events(
    app: &AppHandle,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    dispatcher: &AppActionDispatcher,
) -> EventProcessingOutcome {
    let mut outcome = EventProcessingOutcome {
        events_processed: false,
        request_redraw: false,
        exit_requested: false,
    };

    while let Ok(ev) = event_rx.try_recv() {
        outcome.events_processed = true;
        match ev {
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                let result = app
                    .update(|app| handle_key_event(app, dispatcher, &key))
                    .await;
                match result {
                    KeyResult::Exit => {
                        app.update(|app| app.ui.exit_requested = true).await;
                        outcome.exit_requested = true;
                        outcome.request_redraw = true;
                        break;
                    }
                    KeyResult::Handled => outcome.request_redraw = true,
                    KeyResult::NotHandled => {}
                }
            }
            UiEvent::Crossterm(Event::Paste(text)) => {
                app.update(|app| handle_paste(app, &text)).await;
                outcome.request_redraw = true;
            }
            UiEvent::Crossterm(Event::Resize(_, _)) => {
                outcome.request_redraw = true;
            }
            UiEvent::Crossterm(_) => {}
        }
    }

    outcome
}

/// Forwards settled scans as actions, skipping ids other than
/// `current_submission_id`.
fn process_scan_updates(
    dispatcher: &AppActionDispatcher,
    rx: &mut mpsc::UnboundedReceiver<(ScanMessage, u64)>,
    current_submission_id: u64,
) -> bool {
    let mut received_any = false;

    while let Ok((message, submission_id)) = rx.try_recv() {
        if submission_id != current_submission_id {
            debug!(submission_id, "skipping outcome for a superseded submission");
            continue;
        }

        match message {
            ScanMessage::Settled(outcome) => dispatcher.dispatch(AppAction::ScanSettled {
                submission_id,
                outcome,
            }),
        }
        received_any = true;
    }

    received_any
}

async fn drain_action_queue(
    app: &AppHandle,
    scan_service: &ScanService,
    action_rx: &mut mpsc::UnboundedReceiver<AppAction>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(action) = action_rx.try_recv() {
        pending.push(action);
    }

    if pending.is_empty() {
        return false;
    }

    let commands = app.update(|app| apply_actions(app, pending)).await;
    for cmd in commands {
        match cmd {
            AppCommand::DispatchScan(params) => {
                scan_service.spawn_scan(params);
            }
        }
    }
    true
}

fn spawn_event_reader(
    event_tx: mpsc::UnboundedSender<UiEvent>,
    shutdown: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !shutdown.is_cancelled() {
            match event::poll(Duration::from_millis(50)) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                },
                Ok(false) => {}
                Err(_) => break,
            }
        }
    })
}

pub async fn run_chat(settings: ResolvedSettings) -> Result<(), Box<dyn Error>> {
    info!(agent_url = %settings.agent_url, "starting operator console");
    let app = AppHandle::new(Arc::new(Mutex::new(App::new(settings))));

    let terminal = setup_terminal()?;

    let (event_tx, event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let shutdown = CancellationToken::new();
    let event_reader_handle = spawn_event_reader(event_tx, shutdown.clone());

    let result = run_loop(&app, &terminal, event_rx).await;

    // Outcomes that arrive after teardown are discarded.
    app.update(|app| apply_actions(app, [AppAction::CancelSubmission]))
        .await;
    shutdown.cancel();
    let _ = event_reader_handle.await;
    restore_terminal(&terminal).await?;

    let (messages, status) = app
        .read(|app| (app.conversation.len(), app.conversation.status()))
        .await;
    info!(messages, %status, "operator console closed");

    result
}

async fn run_loop(
    app: &AppHandle,
    terminal: &SharedTerminal,
    mut event_rx: mpsc::UnboundedReceiver<UiEvent>,
) -> Result<(), Box<dyn Error>> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();
    let action_dispatcher = AppActionDispatcher::new(action_tx);
    let (scan_service, mut scan_rx) = ScanService::new();

    const MAX_FPS: u64 = 60;
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;

    loop {
        if is_exit_requested(app).await {
            return Ok(());
        }

        try_draw_frame(
            app,
            terminal,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        )
        .await?;

        let event_outcome = process_ui_events(app, &mut event_rx, &action_dispatcher).await;
        if event_outcome.exit_requested {
            return Ok(());
        }
        if event_outcome.request_redraw {
            request_redraw = true;
        }

        let current_submission_id = app.read(|app| app.session.current_submission_id).await;
        let received_any =
            process_scan_updates(&action_dispatcher, &mut scan_rx, current_submission_id);

        let actions_applied = drain_action_queue(app, &scan_service, &mut action_rx).await;

        if !app.read(App::is_view_current).await {
            request_redraw = true;
        }
        if actions_applied {
            request_redraw = true;
        }

        let idle = !event_outcome.events_processed && !received_any && !request_redraw;
        if idle {
            tokio::time::sleep(Duration::from_millis(16)).await;
        } else {
            tokio::task::yield_now().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::service::DispatchError;
    use crate::core::message::{MessageKind, SubmissionStatus};
    use crate::utils::test_utils::{create_test_app, spawn_agent_stub};
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn new_app_handle() -> AppHandle {
        AppHandle::new(Arc::new(Mutex::new(create_test_app())))
    }

    fn press(code: KeyCode) -> UiEvent {
        UiEvent::Crossterm(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[tokio::test]
    async fn key_events_reach_inputs_and_exit() {
        let app = new_app_handle();
        let (action_tx, _action_rx) = mpsc::unbounded_channel();
        let dispatcher = AppActionDispatcher::new(action_tx);
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();

        event_tx.send(press(KeyCode::Char('o'))).expect("send");
        event_tx.send(press(KeyCode::Esc)).expect("send");
        event_tx.send(press(KeyCode::Char('x'))).expect("send");

        let outcome = process_ui_events(&app, &mut event_rx, &dispatcher).await;

        assert!(outcome.exit_requested);
        assert!(is_exit_requested(&app).await);
        assert_eq!(app.read(|app| app.ui.intent_text()).await, "o");
    }

    #[tokio::test]
    async fn stale_scan_updates_are_skipped() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let dispatcher = AppActionDispatcher::new(action_tx);
        let (service, mut rx) = ScanService::new();

        service.send_for_test(
            ScanMessage::Settled(Err(DispatchError::MalformedResponse("old".into()))),
            1,
        );
        assert!(!process_scan_updates(&dispatcher, &mut rx, 2));
        assert!(action_rx.try_recv().is_err());

        service.send_for_test(
            ScanMessage::Settled(Err(DispatchError::MalformedResponse("new".into()))),
            2,
        );
        assert!(process_scan_updates(&dispatcher, &mut rx, 2));
        assert!(matches!(
            action_rx.try_recv(),
            Ok(AppAction::ScanSettled {
                submission_id: 2,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn submission_round_trip_through_queue() {
        let stub = spawn_agent_stub(
            "200 OK",
            r#"{"category":"Network","command":"nmap -p1-1000 10.0.0.5","is_valid":true}"#,
        )
        .await;
        let app = new_app_handle();
        app.update(|app| {
            app.session.agent_url = stub.base_url.clone();
            app.ui.set_intent_text("scan ports 1-1000");
            app.ui.set_target_text("10.0.0.5");
        })
        .await;

        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let dispatcher = AppActionDispatcher::new(action_tx);
        let (service, mut scan_rx) = ScanService::new();

        let submit = app.read(App::submit_action).await.expect("submit allowed");
        dispatcher.dispatch(submit);
        assert!(drain_action_queue(&app, &service, &mut action_rx).await);
        assert_eq!(
            app.read(|app| app.conversation.status()).await,
            SubmissionStatus::Processing
        );

        let (message, submission_id) = tokio::time::timeout(Duration::from_secs(5), scan_rx.recv())
            .await
            .expect("scan settles")
            .expect("outcome");
        dispatcher.dispatch(match message {
            ScanMessage::Settled(outcome) => AppAction::ScanSettled {
                submission_id,
                outcome,
            },
        });
        assert!(drain_action_queue(&app, &service, &mut action_rx).await);

        let (kinds, status, intent, target) = app
            .read(|app| {
                (
                    app.conversation
                        .messages()
                        .iter()
                        .map(|m| m.kind.clone())
                        .collect::<Vec<_>>(),
                    app.conversation.status(),
                    app.ui.intent_text(),
                    app.ui.target_text(),
                )
            })
            .await;
        assert_eq!(kinds.len(), 2);
        assert!(matches!(kinds[0], MessageKind::User { .. }));
        assert!(matches!(
            &kinds[1],
            MessageKind::AgentResult { command, is_valid: true, .. } if command == "nmap -p1-1000 10.0.0.5"
        ));
        assert_eq!(status, SubmissionStatus::Ready);
        assert_eq!(intent, "");
        assert_eq!(target, "10.0.0.5");
    }
}
