use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::config::AviationConfig;
use crate::constants::upstream::ACCESS_KEY_PARAM;
use crate::domain::{Endpoint, Params};

/// Failure modes of an upstream call, in the order they are detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AviationError {
    /// Connection refused, DNS failure, timeout.
    #[error("flight data service unreachable: {0}")]
    Unavailable(String),

    #[error("flight data service returned HTTP {status}: {reason}")]
    UpstreamStatus { status: u16, reason: String },

    #[error("flight data service returned an unreadable body: {0}")]
    MalformedResponse(String),

    /// The body carried a top-level `error` object.
    #[error("flight data service rejected the request: {message}")]
    Upstream {
        code: Option<i64>,
        kind: Option<String>,
        message: String,
        details: Option<String>,
    },
}

impl AviationError {
    /// HTTP status returned to the caller for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unavailable(_) => 503,
            Self::UpstreamStatus { status, .. } => *status,
            Self::MalformedResponse(_) => 500,
            Self::Upstream { .. } => 400,
        }
    }

    /// Message safe to show to the caller.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Unavailable(_) => {
                "Flight data service is temporarily unavailable. Please try again later."
                    .to_string()
            }
            Self::UpstreamStatus { status, reason } => {
                format!("Flight data service returned HTTP {status}: {reason}")
            }
            Self::MalformedResponse(_) => {
                "Received an invalid response from the flight data service.".to_string()
            }
            Self::Upstream { message, .. } => message.clone(),
        }
    }

    /// Drops raw upstream information so it never reaches callers outside
    /// verbose mode.
    #[must_use]
    pub fn without_details(self) -> Self {
        match self {
            Self::Upstream {
                code,
                kind,
                message,
                ..
            } => Self::Upstream {
                code,
                kind,
                message,
                details: None,
            },
            other => other,
        }
    }
}

/// User-facing message for a known upstream error code.
#[must_use]
pub const fn error_message_for_code(code: i64) -> Option<&'static str> {
    Some(match code {
        101 => "Invalid API access key. Please check the server configuration.",
        102 => "The API account is inactive. Please contact the administrator.",
        103 => "This feature requires a paid subscription plan.",
        104 => "Monthly API request limit reached. Please try again next month.",
        105 => "HTTPS access requires a paid subscription plan.",
        301 => "Invalid or missing search parameters.",
        302 => "Invalid date format. Please use YYYY-MM-DD.",
        303 => "No results found for your search.",
        _ => return None,
    })
}

/// Some upstream revisions send the symbolic type in `code` instead of the
/// numeric value.
fn code_for_type(kind: &str) -> Option<i64> {
    Some(match kind {
        "invalid_access_key" | "missing_access_key" => 101,
        "inactive_user" => 102,
        "function_access_restricted" => 103,
        "usage_limit_reached" => 104,
        "https_access_restricted" => 105,
        "validation_error" | "invalid_parameters" | "missing_parameters" => 301,
        "invalid_date" => 302,
        "no_results" => 303,
        _ => return None,
    })
}

fn translate_error_object(error: &Value) -> AviationError {
    let raw_code = error.get("code");
    let mut kind = error
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut code = raw_code.and_then(|c| {
        c.as_i64()
            .or_else(|| c.as_str().and_then(|s| s.trim().parse().ok()))
    });

    if code.is_none()
        && let Some(symbolic) = raw_code.and_then(Value::as_str)
    {
        code = code_for_type(symbolic);
        kind.get_or_insert_with(|| symbolic.to_string());
    }

    if code.is_none() {
        code = kind.as_deref().and_then(code_for_type);
    }

    let details = error
        .get("info")
        .or_else(|| error.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let message = code
        .and_then(error_message_for_code)
        .map(str::to_string)
        .or_else(|| details.clone())
        .unwrap_or_else(|| "The flight data service reported an unknown error.".to_string());

    AviationError::Upstream {
        code,
        kind,
        message,
        details,
    }
}

fn is_empty_document(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[must_use]
pub fn empty_result() -> Value {
    json!({
        "pagination": { "total": 0, "count": 0 },
        "data": [],
    })
}

/// Interprets an upstream reply that did arrive.
///
/// Transport failures never get here; see [`AviationstackClient::fetch`].
pub fn interpret_response(status: u16, body: &[u8]) -> Result<Value, AviationError> {
    if !(200..300).contains(&status) {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown status")
            .to_string();
        return Err(AviationError::UpstreamStatus { status, reason });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(empty_result());
    }

    let parsed: Value = serde_json::from_slice(body)
        .map_err(|e| AviationError::MalformedResponse(e.to_string()))?;

    if let Some(error) = parsed.get("error").filter(|e| e.is_object()) {
        return Err(translate_error_object(error));
    }

    if parsed.get("data").is_none() && is_empty_document(&parsed) {
        return Ok(empty_result());
    }

    Ok(parsed)
}

#[derive(Clone)]
pub struct AviationstackClient {
    client: Client,
    base_url: String,
    access_key: String,
    timeout: std::time::Duration,
}

impl AviationstackClient {
    pub fn with_shared_client(client: Client, config: &AviationConfig) -> anyhow::Result<Self> {
        Url::parse(&config.base_url)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_key: config.access_key.clone(),
            timeout: config.request_timeout(),
        })
    }

    fn endpoint_url(&self, endpoint: Endpoint, params: &Params) -> Result<Url, AviationError> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, endpoint.upstream_path()))
            .map_err(|e| AviationError::Unavailable(format!("invalid upstream URL: {e}")))?;

        {
            let mut query = url.query_pairs_mut();
            for (name, value) in params {
                if name != ACCESS_KEY_PARAM {
                    query.append_pair(name, value);
                }
            }
            query.append_pair(ACCESS_KEY_PARAM, &self.access_key);
        }

        Ok(url)
    }

    /// Issues one GET against the upstream. No retries.
    pub async fn fetch(&self, endpoint: Endpoint, params: &Params) -> Result<Value, AviationError> {
        let url = self.endpoint_url(endpoint, params)?;

        debug!(endpoint = %endpoint, ?params, "Calling flight data service");

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AviationError::Unavailable(redact(&e)))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| AviationError::Unavailable(redact(&e)))?;

        interpret_response(status, &body)
    }
}

/// reqwest errors embed the request URL, which carries the credential.
fn redact(error: &reqwest::Error) -> String {
    let kind = if error.is_timeout() {
        "timed out"
    } else if error.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };

    match std::error::Error::source(error) {
        Some(source) => format!("{kind}: {source}"),
        None => kind.to_string(),
    }
}
