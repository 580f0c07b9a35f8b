use std::error::Error as StdError;
use std::fmt;

use reqwest::StatusCode;
use tracing::debug;

use crate::api::{AgentReply, ScanRequest, ServiceBanner};
use crate::utils::url::construct_api_url;

/// Ways a single `POST /chat` call can fail.
///
/// The operator only ever sees one fixed transport error; the variants exist so
/// diagnostics can tell the causes apart.
#[derive(Debug)]
pub enum DispatchError {
    /// The request never produced a response (refused, reset, DNS, TLS).
    NetworkUnreachable(reqwest::Error),

    /// The service answered with a non-success status.
    HttpStatus {
        status: StatusCode,
        body: String,
    },

    /// The body was not JSON, or not a recognized reply shape.
    MalformedResponse(String),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::NetworkUnreachable(source) => {
                write!(f, "agent service unreachable: {source}")
            }
            DispatchError::HttpStatus { status, body } => {
                let body = body.trim();
                if body.is_empty() {
                    write!(f, "agent service returned {status}")
                } else {
                    write!(f, "agent service returned {status}: {body}")
                }
            }
            DispatchError::MalformedResponse(detail) => {
                write!(f, "malformed agent response: {detail}")
            }
        }
    }
}

impl StdError for DispatchError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            DispatchError::NetworkUnreachable(source) => Some(source),
            _ => None,
        }
    }
}

pub async fn post_scan(
    client: &reqwest::Client,
    base_url: &str,
    request: &ScanRequest,
) -> Result<AgentReply, DispatchError> {
    let chat_url = construct_api_url(base_url, "chat");
    debug!(url = %chat_url, scan_target = %request.target, "posting scan intent");

    let response = client
        .post(chat_url)
        .header("Content-Type", "application/json")
        .json(request)
        .send()
        .await
        .map_err(DispatchError::NetworkUnreachable)?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(DispatchError::NetworkUnreachable)?;

    if !status.is_success() {
        return Err(DispatchError::HttpStatus { status, body });
    }

    AgentReply::from_body(&body).map_err(DispatchError::MalformedResponse)
}

pub async fn fetch_banner(
    client: &reqwest::Client,
    base_url: &str,
) -> Result<ServiceBanner, Box<dyn StdError>> {
    let root_url = construct_api_url(base_url, "");
    let response = client.get(root_url).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(format!("Agent service returned status {status}: {error_text}").into());
    }

    let banner = response.json::<ServiceBanner>().await?;
    Ok(banner)
}
