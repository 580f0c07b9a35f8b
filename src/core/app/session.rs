use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::api::ScanRequest;
use crate::core::dispatch::ScanParams;

/// Connection details plus the bookkeeping for the submission in flight.
pub struct SessionContext {
    pub client: Client,
    pub agent_url: String,
    /// Id handed to the most recent submission; ids only grow.
    pub current_submission_id: u64,
    /// Set while a submission waits for its outcome.
    pub pending_submission: Option<u64>,
    pub submission_cancel_token: Option<CancellationToken>,
}

impl SessionContext {
    pub fn new(agent_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            agent_url: agent_url.into(),
            current_submission_id: 0,
            pending_submission: None,
            submission_cancel_token: None,
        }
    }

    pub fn start_new_submission(&mut self) -> (CancellationToken, u64) {
        self.current_submission_id += 1;
        let token = CancellationToken::new();
        self.submission_cancel_token = Some(token.clone());
        self.pending_submission = Some(self.current_submission_id);
        (token, self.current_submission_id)
    }

    /// Claims the outcome for `submission_id`. Returns false for anything
    /// other than the pending submission, so an outcome is applied once.
    pub fn finish_submission(&mut self, submission_id: u64) -> bool {
        if self.pending_submission != Some(submission_id) {
            return false;
        }
        self.pending_submission = None;
        self.submission_cancel_token = None;
        true
    }

    pub fn cancel_current_submission(&mut self) {
        if let Some(token) = self.submission_cancel_token.take() {
            token.cancel();
        }
        self.pending_submission = None;
    }

    pub fn build_scan_params(
        &self,
        request: ScanRequest,
        cancel_token: CancellationToken,
        submission_id: u64,
    ) -> ScanParams {
        ScanParams {
            client: self.client.clone(),
            base_url: self.agent_url.clone(),
            request,
            cancel_token,
            submission_id,
        }
    }
}
