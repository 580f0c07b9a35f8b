use serde::{Deserialize, Serialize};

pub mod service;

/// Category sentinel the agent service uses for intents it refuses to plan.
pub const IRRELEVANT_CATEGORY: &str = "Irrelevant";

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ScanRequest {
    pub intent: String,
    pub target: String,
}

/// Body returned by `POST /chat`, before shape validation.
///
/// Every field is optional here so that absence and wrong typing can be told
/// apart: serde rejects a wrongly typed field, while absent fields fall back to
/// empty values when the reply is built.
#[derive(Deserialize, Debug, Default)]
pub struct ChatResponse {
    pub category: Option<String>,
    pub command: Option<String>,
    pub is_valid: Option<bool>,
    pub error: Option<String>,
}

/// A decoded agent reply, tagged by shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgentReply {
    /// The intent was classified and a command was generated.
    Plan {
        category: String,
        command: String,
        is_valid: bool,
    },
    /// The service classified the intent as unrelated to scanning.
    OutOfScope { error: String },
}

impl AgentReply {
    pub fn category(&self) -> &str {
        match self {
            AgentReply::Plan { category, .. } => category,
            AgentReply::OutOfScope { .. } => IRRELEVANT_CATEGORY,
        }
    }

    pub fn is_out_of_scope(&self) -> bool {
        matches!(self, AgentReply::OutOfScope { .. })
    }

    /// Decode a raw response body into a reply.
    pub fn from_body(body: &str) -> Result<Self, String> {
        let response = serde_json::from_str::<ChatResponse>(body.trim())
            .map_err(|e| format!("invalid JSON: {e}"))?;
        Self::try_from(response)
    }
}

impl TryFrom<ChatResponse> for AgentReply {
    type Error = String;

    fn try_from(response: ChatResponse) -> Result<Self, Self::Error> {
        let ChatResponse {
            category,
            command,
            is_valid,
            error,
        } = response;

        let category = category.ok_or_else(|| "response has no category".to_string())?;
        if category == IRRELEVANT_CATEGORY {
            return Ok(AgentReply::OutOfScope {
                error: error.unwrap_or_default(),
            });
        }

        Ok(AgentReply::Plan {
            category,
            command: command.unwrap_or_default(),
            is_valid: is_valid.unwrap_or(false),
        })
    }
}

/// Body returned by `GET /`.
#[derive(Deserialize, Debug)]
pub struct ServiceBanner {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_shape_ignores_extra_fields() {
        let body = r#"{"status":"success","category":"Easy","command":"nmap -sn 10.0.0.0/24","is_valid":true,"error":null}"#;
        let reply = AgentReply::from_body(body).expect("plan");
        assert_eq!(
            reply,
            AgentReply::Plan {
                category: "Easy".into(),
                command: "nmap -sn 10.0.0.0/24".into(),
                is_valid: true,
            }
        );
        assert!(!reply.is_out_of_scope());
    }

    #[test]
    fn irrelevant_category_becomes_out_of_scope() {
        let body = r#"{"category":"Irrelevant","error":"Not a scanning request"}"#;
        let reply = AgentReply::from_body(body).expect("out of scope");
        assert_eq!(
            reply,
            AgentReply::OutOfScope {
                error: "Not a scanning request".into()
            }
        );
        assert_eq!(reply.category(), IRRELEVANT_CATEGORY);
    }

    #[test]
    fn absent_plan_fields_decode_as_empty() {
        let reply = AgentReply::from_body(r#"{"category":"Hard"}"#).expect("plan");
        assert_eq!(
            reply,
            AgentReply::Plan {
                category: "Hard".into(),
                command: String::new(),
                is_valid: false,
            }
        );
    }

    #[test]
    fn missing_category_is_rejected() {
        let err = AgentReply::from_body(r#"{"detail":"Internal Server Error"}"#).unwrap_err();
        assert_eq!(err, "response has no category");
    }

    #[test]
    fn wrongly_typed_fields_are_rejected() {
        let err = AgentReply::from_body(r#"{"category":"Easy","is_valid":"yes"}"#).unwrap_err();
        assert!(err.starts_with("invalid JSON"), "{err}");
    }

    #[test]
    fn non_json_body_is_rejected() {
        assert!(AgentReply::from_body("<html>502 Bad Gateway</html>").is_err());
        assert!(AgentReply::from_body("").is_err());
    }

    #[test]
    fn scan_request_serializes_both_fields() {
        let request = ScanRequest {
            intent: "scan ports 1-1000".into(),
            target: "10.0.0.5".into(),
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({"intent": "scan ports 1-1000", "target": "10.0.0.5"})
        );
    }
}
