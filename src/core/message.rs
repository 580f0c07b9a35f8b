use crate::api::{AgentReply, IRRELEVANT_CATEGORY};

/// Diagnostic shown whenever a submission could not be completed.
pub const TRANSPORT_ERROR_TEXT: &str = "SYSTEM_ERROR: API_UNREACHABLE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    User {
        intent: String,
        target: String,
    },
    AgentResult {
        category: String,
        command: String,
        is_valid: bool,
        /// Only populated for out-of-scope replies.
        error_detail: Option<String>,
    },
    TransportError {
        text: String,
    },
}

/// A single transcript entry. Entries are never edited once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub timestamp: String,
}

impl Message {
    pub fn user(
        intent: impl Into<String>,
        target: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            kind: MessageKind::User {
                intent: intent.into(),
                target: target.into(),
            },
            timestamp: timestamp.into(),
        }
    }

    pub fn agent_result(reply: AgentReply, timestamp: impl Into<String>) -> Self {
        let kind = match reply {
            AgentReply::Plan {
                category,
                command,
                is_valid,
            } => MessageKind::AgentResult {
                category,
                command,
                is_valid,
                error_detail: None,
            },
            AgentReply::OutOfScope { error } => MessageKind::AgentResult {
                category: IRRELEVANT_CATEGORY.to_string(),
                command: String::new(),
                is_valid: false,
                error_detail: Some(error),
            },
        };
        Self {
            kind,
            timestamp: timestamp.into(),
        }
    }

    pub fn transport_error(timestamp: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::TransportError {
                text: TRANSPORT_ERROR_TEXT.to_string(),
            },
            timestamp: timestamp.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self.kind, MessageKind::User { .. })
    }

    /// Agent results and transport errors both settle a submission.
    pub fn is_response(&self) -> bool {
        !self.is_user()
    }

    pub fn is_out_of_scope(&self) -> bool {
        matches!(
            &self.kind,
            MessageKind::AgentResult { category, .. } if category == IRRELEVANT_CATEGORY
        )
    }
}

/// Lifecycle of the most recent submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Ready,
    Processing,
    Error,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Ready => "READY",
            SubmissionStatus::Processing => "PROCESSING",
            SubmissionStatus::Error => "ERROR",
        }
    }

    pub fn is_processing(self) -> bool {
        self == SubmissionStatus::Processing
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
