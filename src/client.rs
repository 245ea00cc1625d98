// src/client.rs

use crate::{
    config::ClientConfig,
    constants::REGISTRATION_NOT_COMPLETED_ERROR,
    error::{ApiError, ApiResult, ErrorCode},
    signals::SignalHub,
};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Thin wrapper around `reqwest::Client`: the single seam where an HTTP
/// response turns into either a parsed JSON payload or an [`ApiError`].
///
/// The signal hub rides along so that transport failures and the
/// registration sentinel can notify the session controller from any depth
/// of the call stack. There is deliberately no retry layer here: retrying is
/// a user action ("Try again"), never an implicit client behavior.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    signals: Arc<SignalHub>,
}

/// Best-effort view of a non-2xx body. Both fields stay `None` for empty or
/// unreadable bodies; extraction itself never fails.
#[derive(Debug, Default)]
pub struct ErrorPayload {
    pub json: Option<Value>,
    pub text: Option<String>,
}

impl ErrorPayload {
    /// Tries `error.message`, a bare `error` string, `message`, `detail`,
    /// then the raw body text.
    pub fn message(&self) -> Option<String> {
        let from_json = self.json.as_ref().and_then(|json| {
            json.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .or_else(|| json.get("error").and_then(Value::as_str))
                .or_else(|| json.get("message").and_then(Value::as_str))
                .or_else(|| json.get("detail").and_then(Value::as_str))
        });
        from_json
            .map(str::to_string)
            .or_else(|| self.text.clone())
            .filter(|m| !m.trim().is_empty())
    }

    pub fn message_or(&self, fallback: &str) -> String {
        self.message().unwrap_or_else(|| fallback.to_string())
    }
}

impl ApiClient {
    pub fn new(config: Arc<ClientConfig>, signals: Arc<SignalHub>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|err| ApiError::network(err.to_string()))?;
        Ok(Self {
            http,
            config,
            signals,
        })
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn signals(&self) -> &Arc<SignalHub> {
        &self.signals
    }

    /// Configured base URL, or the canonical "backend not configured"
    /// failure: absence of configuration is modeled identically to a live
    /// connectivity failure, signal included.
    pub fn base_url(&self) -> ApiResult<&str> {
        match self.config.base_url.as_deref() {
            Some(url) => Ok(url),
            None => {
                self.signals.emit_server_unavailable();
                Err(ApiError::network("Backend not configured"))
            }
        }
    }

    /// Issues a prepared request. Transport-level failures (DNS, refused
    /// connection, timeout) emit `server_unavailable` and surface as
    /// `ApiError(0, network, ..)` carrying the transport's own message.
    pub async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        request.send().await.map_err(|err| {
            self.signals.emit_server_unavailable();
            ApiError::network(err.to_string())
        })
    }

    /// Parses a JSON body. A body matching the registration sentinel shape
    /// fires the side channel and becomes a typed error instead of data;
    /// malformed bodies yield `None` rather than failing.
    pub async fn read_json(&self, res: Response) -> ApiResult<Option<Value>> {
        let status = res.status().as_u16();
        let value = match res.json::<Value>().await {
            Ok(value) => value,
            Err(_) => return Ok(None),
        };
        self.check_registration_sentinel(status, &value)?;
        Ok(Some(value))
    }

    /// Best-effort extraction of a non-2xx body, with the same sentinel
    /// handling as [`read_json`](Self::read_json).
    pub async fn read_error_payload(&self, res: Response) -> ApiResult<ErrorPayload> {
        let status = res.status().as_u16();
        let text = match res.text().await {
            Ok(text) => text,
            Err(_) => return Ok(ErrorPayload::default()),
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(ErrorPayload::default());
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(json) => {
                self.check_registration_sentinel(status, &json)?;
                Ok(ErrorPayload {
                    json: Some(json),
                    text: Some(trimmed.to_string()),
                })
            }
            Err(_) => Ok(ErrorPayload {
                json: None,
                text: Some(trimmed.to_string()),
            }),
        }
    }

    /// Shared mapping for non-2xx responses without an endpoint-specific
    /// branch: 401 means the session is gone, 400/422 carry validation
    /// payloads, everything else is an unknown failure with whatever message
    /// the body offers.
    pub async fn error_from_response(&self, res: Response, fallback: &str) -> ApiError {
        let status = res.status().as_u16();
        let payload = match self.read_error_payload(res).await {
            Ok(payload) => payload,
            Err(typed) => return typed,
        };
        match status {
            401 => ApiError::unauthorized(payload.message_or("Unauthorized")),
            400 | 422 => {
                ApiError::validation(status, payload.message_or("Validation error"))
            }
            _ => ApiError::unknown(status, payload.message_or(fallback)),
        }
    }

    fn check_registration_sentinel(&self, status: u16, value: &Value) -> ApiResult<()> {
        let is_sentinel = value.get("error").and_then(Value::as_str)
            == Some(REGISTRATION_NOT_COMPLETED_ERROR);
        if is_sentinel {
            self.signals.emit_needs_complete_registration();
            let status = if status == 0 { 400 } else { status };
            return Err(ApiError::new(
                status,
                ErrorCode::NeedsCompleteRegistration,
                REGISTRATION_NOT_COMPLETED_ERROR,
            ));
        }
        Ok(())
    }
}

/// Deserializes a success body into its expected wire shape, mapping an
/// absent or mismatched payload to a 500 "invalid response" error.
pub(crate) fn parse_response<T: DeserializeOwned>(
    value: Option<Value>,
    invalid_message: &str,
) -> ApiResult<T> {
    let value = value.ok_or_else(|| ApiError::unknown(500, invalid_message))?;
    serde_json::from_value(value).map_err(|_| ApiError::unknown(500, invalid_message))
}

/// Tokens come from the auth collaborator per call; an empty one fails fast
/// before any network traffic.
pub(crate) fn require_token(token: &str) -> ApiResult<()> {
    if token.is_empty() {
        return Err(ApiError::unauthorized("Token is required"));
    }
    Ok(())
}
