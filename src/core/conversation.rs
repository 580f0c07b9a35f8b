//! Transcript and submission status for the single active conversation.
//!
//! The store is append-only: messages keep their insertion order and the
//! transcript only grows. Every mutation bumps [`ConversationStore::revision`],
//! which the view watches to decide when to redraw and follow the newest entry.

use std::fmt::Write;

use chrono::Local;
use tracing::{debug, warn};

use crate::api::AgentReply;
use crate::core::message::{Message, SubmissionStatus};

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%H:%M:%S";

pub struct ConversationStore {
    messages: Vec<Message>,
    status: SubmissionStatus,
    revision: u64,
    timestamp_format: String,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_FORMAT)
    }
}

impl ConversationStore {
    /// `timestamp_format` must already be a valid strftime pattern.
    pub fn new(timestamp_format: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            status: SubmissionStatus::Ready,
            revision: 0,
            timestamp_format: timestamp_format.into(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// User entries not yet matched by a response. Always 0 or 1.
    pub fn outstanding_submissions(&self) -> usize {
        let users = self.messages.iter().filter(|m| m.is_user()).count();
        let responses = self.messages.len() - users;
        users.saturating_sub(responses)
    }

    /// Appends a user entry. Does nothing when either field is empty.
    pub fn append_user(&mut self, intent: &str, target: &str) -> bool {
        if intent.is_empty() || target.is_empty() {
            debug!("ignoring submission with an empty field");
            return false;
        }
        let message = Message::user(intent, target, self.timestamp());
        self.push(message);
        true
    }

    pub fn append_agent_result(&mut self, reply: AgentReply) {
        let message = Message::agent_result(reply, self.timestamp());
        self.push(message);
    }

    pub fn append_transport_error(&mut self) {
        let message = Message::transport_error(self.timestamp());
        self.push(message);
    }

    pub fn set_status(&mut self, status: SubmissionStatus) {
        if self.status != status {
            debug!(from = %self.status, to = %status, "submission status changed");
            self.status = status;
            self.revision += 1;
        }
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.revision += 1;
    }

    fn timestamp(&self) -> String {
        let now = Local::now();
        let mut stamp = String::new();
        if write!(stamp, "{}", now.format(&self.timestamp_format)).is_err() {
            warn!(format = %self.timestamp_format, "timestamp format failed, using default");
            stamp.clear();
            let _ = write!(stamp, "{}", now.format(DEFAULT_TIMESTAMP_FORMAT));
        }
        stamp
    }
}
