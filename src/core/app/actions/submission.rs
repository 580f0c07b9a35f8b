use tracing::{debug, info, warn};

use super::{App, AppAction, AppCommand};
use crate::api::ScanRequest;
use crate::core::message::SubmissionStatus;

pub(super) fn handle_submission_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitScan { intent, target } => submit_scan(app, intent, target),
        AppAction::ScanSettled {
            submission_id,
            outcome,
        } => {
            if !app.session.finish_submission(submission_id) {
                debug!(submission_id, "dropping outcome for a stale submission");
                return None;
            }

            match outcome {
                Ok(reply) => {
                    info!(
                        submission_id,
                        category = reply.category(),
                        "agent replied"
                    );
                    app.conversation.append_agent_result(reply);
                    app.conversation.set_status(SubmissionStatus::Ready);
                }
                Err(err) => {
                    warn!(submission_id, error = %err, "submission failed");
                    app.conversation.append_transport_error();
                    app.conversation.set_status(SubmissionStatus::Error);
                }
            }
            app.ui.clear_intent();
            app.ui.follow_latest();
            None
        }
        AppAction::CancelSubmission => {
            app.session.cancel_current_submission();
            None
        }
        _ => unreachable!("non-submission action routed to submission handler"),
    }
}

fn submit_scan(app: &mut App, intent: String, target: String) -> Option<AppCommand> {
    if intent.is_empty() || target.is_empty() {
        debug!("submission refused: intent and target are both required");
        return None;
    }
    if app.session.pending_submission.is_some() {
        warn!("submission refused: another scan is still in flight");
        return None;
    }

    app.conversation.set_status(SubmissionStatus::Processing);
    app.conversation.append_user(&intent, &target);
    app.ui.follow_latest();

    let (cancel_token, submission_id) = app.session.start_new_submission();
    info!(submission_id, scan_target = %target, "submitting scan intent");
    let request = ScanRequest { intent, target };
    Some(AppCommand::DispatchScan(app.session.build_scan_params(
        request,
        cancel_token,
        submission_id,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::service::DispatchError;
    use crate::api::AgentReply;
    use crate::core::message::{MessageKind, TRANSPORT_ERROR_TEXT};
    use crate::utils::test_utils::create_test_app;
    use reqwest::StatusCode;

    fn submit(app: &mut App, intent: &str, target: &str) -> Option<u64> {
        let command = handle_submission_action(
            app,
            AppAction::SubmitScan {
                intent: intent.into(),
                target: target.into(),
            },
        );
        match command {
            Some(AppCommand::DispatchScan(params)) => Some(params.submission_id),
            None => None,
        }
    }

    fn settle(app: &mut App, submission_id: u64, outcome: Result<AgentReply, DispatchError>) {
        let command = handle_submission_action(
            app,
            AppAction::ScanSettled {
                submission_id,
                outcome,
            },
        );
        assert!(command.is_none());
    }

    #[test]
    fn network_plan_lands_after_user_entry() {
        let mut app = create_test_app();
        app.ui.set_intent_text("scan ports 1-1000");
        app.ui.set_target_text("10.0.0.5");

        let id = submit(&mut app, "scan ports 1-1000", "10.0.0.5").expect("dispatch");
        assert_eq!(app.conversation.status(), SubmissionStatus::Processing);
        assert_eq!(app.conversation.len(), 1);
        assert_eq!(app.conversation.outstanding_submissions(), 1);

        settle(
            &mut app,
            id,
            Ok(AgentReply::Plan {
                category: "Network".into(),
                command: "nmap -p1-1000 10.0.0.5".into(),
                is_valid: true,
            }),
        );

        let messages = app.conversation.messages();
        assert_eq!(messages.len(), 2);
        assert!(matches!(
            &messages[0].kind,
            MessageKind::User { intent, target }
                if intent == "scan ports 1-1000" && target == "10.0.0.5"
        ));
        assert!(matches!(
            &messages[1].kind,
            MessageKind::AgentResult { category, command, is_valid: true, error_detail: None }
                if category == "Network" && command == "nmap -p1-1000 10.0.0.5"
        ));
        assert_eq!(app.conversation.status(), SubmissionStatus::Ready);
        assert_eq!(app.conversation.outstanding_submissions(), 0);
    }

    #[test]
    fn out_of_scope_reply_is_not_an_error() {
        let mut app = create_test_app();
        let id = submit(&mut app, "bake a cake", "10.0.0.5").expect("dispatch");

        settle(
            &mut app,
            id,
            Ok(AgentReply::OutOfScope {
                error: "Not a scanning request".into(),
            }),
        );

        let last = app.conversation.messages().last().expect("response");
        assert!(last.is_out_of_scope());
        assert!(matches!(
            &last.kind,
            MessageKind::AgentResult { error_detail: Some(detail), .. }
                if detail == "Not a scanning request"
        ));
        assert_eq!(app.conversation.status(), SubmissionStatus::Ready);
    }

    #[test]
    fn failure_appends_fixed_diagnostic() {
        let mut app = create_test_app();
        let id = submit(&mut app, "ping sweep", "192.168.1.0/24").expect("dispatch");

        settle(
            &mut app,
            id,
            Err(DispatchError::HttpStatus {
                status: StatusCode::BAD_GATEWAY,
                body: String::new(),
            }),
        );

        let messages = app.conversation.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_user());
        assert!(matches!(
            &messages[1].kind,
            MessageKind::TransportError { text } if text == TRANSPORT_ERROR_TEXT
        ));
        assert_eq!(app.conversation.status(), SubmissionStatus::Error);

        // The session stays usable after an error.
        assert!(submit(&mut app, "ping sweep", "192.168.1.0/24").is_some());
        assert_eq!(app.conversation.status(), SubmissionStatus::Processing);
    }

    #[test]
    fn empty_field_changes_nothing() {
        let mut app = create_test_app();
        let revision = app.conversation.revision();

        assert!(submit(&mut app, "scan ports 1-1000", "").is_none());
        assert!(submit(&mut app, "", "10.0.0.5").is_none());

        assert!(app.conversation.is_empty());
        assert_eq!(app.conversation.status(), SubmissionStatus::Ready);
        assert_eq!(app.conversation.revision(), revision);
        assert!(app.session.pending_submission.is_none());
    }

    #[test]
    fn intent_cleared_and_target_kept_on_any_outcome() {
        for outcome in [
            Ok(AgentReply::OutOfScope {
                error: "nope".into(),
            }),
            Err(DispatchError::MalformedResponse("invalid JSON".into())),
        ] {
            let mut app = create_test_app();
            app.ui.set_intent_text("os detection");
            app.ui.set_target_text("scanme.nmap.org");
            let id = submit(&mut app, "os detection", "scanme.nmap.org").expect("dispatch");

            settle(&mut app, id, outcome);

            assert_eq!(app.ui.intent_text(), "");
            assert_eq!(app.ui.target_text(), "scanme.nmap.org");
        }
    }

    #[test]
    fn stale_and_duplicate_outcomes_are_dropped() {
        let mut app = create_test_app();
        let id = submit(&mut app, "scan ports 1-1000", "10.0.0.5").expect("dispatch");

        settle(
            &mut app,
            id + 1,
            Err(DispatchError::MalformedResponse("late".into())),
        );
        assert_eq!(app.conversation.len(), 1);
        assert_eq!(app.conversation.status(), SubmissionStatus::Processing);

        let reply = || AgentReply::Plan {
            category: "Network".into(),
            command: "nmap 10.0.0.5".into(),
            is_valid: true,
        };
        settle(&mut app, id, Ok(reply()));
        settle(&mut app, id, Ok(reply()));

        assert_eq!(app.conversation.len(), 2);
        assert_eq!(app.conversation.outstanding_submissions(), 0);
    }

    #[test]
    fn second_submission_waits_for_first() {
        let mut app = create_test_app();
        assert!(submit(&mut app, "scan ports 1-1000", "10.0.0.5").is_some());
        assert!(submit(&mut app, "ping sweep", "10.0.0.6").is_none());

        assert_eq!(app.conversation.len(), 1);
        assert_eq!(app.conversation.outstanding_submissions(), 1);
    }

    #[test]
    fn cancelled_submission_ignores_late_outcome() {
        let mut app = create_test_app();
        let command = handle_submission_action(
            &mut app,
            AppAction::SubmitScan {
                intent: "scan ports 1-1000".into(),
                target: "10.0.0.5".into(),
            },
        );
        let Some(AppCommand::DispatchScan(params)) = command else {
            panic!("expected dispatch");
        };

        handle_submission_action(&mut app, AppAction::CancelSubmission);
        assert!(params.cancel_token.is_cancelled());

        settle(
            &mut app,
            params.submission_id,
            Err(DispatchError::MalformedResponse("late".into())),
        );
        assert_eq!(app.conversation.len(), 1);
    }
}
