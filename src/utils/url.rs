//! URL helpers for building agent service endpoints.

use reqwest::Url;

/// Strip trailing slashes from a base URL.
///
/// # Examples
///
/// ```
/// use nmapai::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8000"), "http://localhost:8000");
/// assert_eq!(normalize_base_url("http://localhost:8000///"), "http://localhost:8000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash.
///
/// An empty endpoint addresses the service root.
///
/// # Examples
///
/// ```
/// use nmapai::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8000/", "/chat"),
///     "http://localhost:8000/chat"
/// );
/// assert_eq!(construct_api_url("http://localhost:8000", ""), "http://localhost:8000/");
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Normalize an agent address and require an absolute http(s) URL.
///
/// Returns the normalized address, or the reason it was rejected.
pub fn parse_agent_url(input: &str) -> Result<String, String> {
    let normalized = normalize_base_url(input.trim());
    let parsed = Url::parse(&normalized).map_err(|err| err.to_string())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err("expected an http:// or https:// address".to_string());
    }
    Ok(normalized)
}
