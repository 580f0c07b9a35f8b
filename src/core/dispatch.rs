use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::service::{post_scan, DispatchError};
use crate::api::{AgentReply, ScanRequest};

/// Outcome of one submission, tagged with the submission id on the channel.
#[derive(Debug)]
pub enum ScanMessage {
    Settled(Result<AgentReply, DispatchError>),
}

pub struct ScanParams {
    pub client: reqwest::Client,
    pub base_url: String,
    pub request: ScanRequest,
    pub cancel_token: CancellationToken,
    pub submission_id: u64,
}

/// Runs agent calls as background tasks and reports each outcome exactly once.
#[derive(Clone)]
pub struct ScanService {
    tx: mpsc::UnboundedSender<(ScanMessage, u64)>,
}

impl ScanService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(ScanMessage, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_scan(&self, params: ScanParams) -> tokio::task::JoinHandle<()> {
        let tx_clone = self.tx.clone();
        tokio::spawn(async move {
            let ScanParams {
                client,
                base_url,
                request,
                cancel_token,
                submission_id,
            } = params;

            tokio::select! {
                biased;
                _ = cancel_token.cancelled() => {
                    debug!(submission_id, "scan submission discarded");
                }
                outcome = post_scan(&client, &base_url, &request) => {
                    if let Err(err) = &outcome {
                        warn!(submission_id, error = %err, "scan submission failed");
                    } else {
                        debug!(submission_id, "scan submission settled");
                    }
                    let _ = tx_clone.send((ScanMessage::Settled(outcome), submission_id));
                }
            }
        })
    }

    #[cfg(test)]
    pub fn send_for_test(&self, message: ScanMessage, submission_id: u64) {
        let _ = self.tx.send((message, submission_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{spawn_agent_stub, unused_local_url};

    fn params(base_url: String, submission_id: u64) -> ScanParams {
        ScanParams {
            client: reqwest::Client::new(),
            base_url,
            request: ScanRequest {
                intent: "scan ports 1-1000".into(),
                target: "10.0.0.5".into(),
            },
            cancel_token: CancellationToken::new(),
            submission_id,
        }
    }

    #[tokio::test]
    async fn posts_json_and_reports_plan() {
        let stub = spawn_agent_stub(
            "200 OK",
            r#"{"status":"success","category":"Network","command":"nmap -p1-1000 10.0.0.5","is_valid":true,"error":null}"#,
        )
        .await;
        let (service, mut rx) = ScanService::new();
        service
            .spawn_scan(params(stub.base_url.clone(), 7))
            .await
            .expect("task");

        let (message, id) = rx.recv().await.expect("outcome");
        assert_eq!(id, 7);
        match message {
            ScanMessage::Settled(Ok(reply)) => assert_eq!(
                reply,
                AgentReply::Plan {
                    category: "Network".into(),
                    command: "nmap -p1-1000 10.0.0.5".into(),
                    is_valid: true,
                }
            ),
            other => panic!("expected plan, got {other:?}"),
        }

        let request = stub.request.await.expect("request captured");
        assert!(request.starts_with("POST /chat HTTP/1.1"), "{request}");
        assert!(request
            .to_ascii_lowercase()
            .contains("content-type: application/json"));
        let body = request.split("\r\n\r\n").nth(1).expect("body");
        let value: serde_json::Value = serde_json::from_str(body).expect("json body");
        assert_eq!(
            value,
            serde_json::json!({"intent": "scan ports 1-1000", "target": "10.0.0.5"})
        );
    }

    #[tokio::test]
    async fn non_success_status_is_a_failure() {
        let stub = spawn_agent_stub("500 Internal Server Error", r#"{"detail":"boom"}"#).await;
        let (service, mut rx) = ScanService::new();
        service
            .spawn_scan(params(stub.base_url.clone(), 1))
            .await
            .expect("task");

        match rx.recv().await.expect("outcome") {
            (ScanMessage::Settled(Err(DispatchError::HttpStatus { status, .. })), 1) => {
                assert_eq!(status.as_u16(), 500);
            }
            other => panic!("expected status failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let stub = spawn_agent_stub("200 OK", "definitely not json").await;
        let (service, mut rx) = ScanService::new();
        service
            .spawn_scan(params(stub.base_url.clone(), 2))
            .await
            .expect("task");

        assert!(matches!(
            rx.recv().await.expect("outcome"),
            (ScanMessage::Settled(Err(DispatchError::MalformedResponse(_))), 2)
        ));
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        let base_url = unused_local_url().await;
        let (service, mut rx) = ScanService::new();
        service.spawn_scan(params(base_url, 3)).await.expect("task");

        assert!(matches!(
            rx.recv().await.expect("outcome"),
            (ScanMessage::Settled(Err(DispatchError::NetworkUnreachable(_))), 3)
        ));
    }

    #[tokio::test]
    async fn cancelled_submission_reports_nothing() {
        let stub = spawn_agent_stub("200 OK", r#"{"category":"Easy"}"#).await;
        let (service, mut rx) = ScanService::new();
        let params = params(stub.base_url.clone(), 4);
        params.cancel_token.cancel();
        service.spawn_scan(params).await.expect("task");

        drop(service);
        assert!(rx.recv().await.is_none());
    }
}
