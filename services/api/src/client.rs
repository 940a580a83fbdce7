//! HTTP client for the management API
//!
//! Every call goes through [`ApiClient::request`]: the bearer token is
//! attached when present, the body is read as text and parsed as JSON, and
//! failures are normalised into [`ApiError`]. A 401 from any endpoint clears
//! the token and notifies the host through the `on_unauthorized` hook; there
//! is no refresh and no retry.

use std::fmt;
use std::sync::Arc;

use common::config::ClientConfig;
use common::token::TokenStore;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::{ApiError, ApiResult, DEFAULT_FAILURE_MESSAGE};

/// Callback the host supplies to react to a rejected session (e.g. show login)
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// Method, body and extra headers of a single call
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    /// Applied last; overrides the default headers
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
    on_unauthorized: UnauthorizedHook,
}

/// Management API client
///
/// Cheap to clone; clones share the HTTP connection pool and token slot.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    /// Create a client for `base_url`
    pub fn new(
        base_url: impl Into<String>,
        tokens: TokenStore,
        on_unauthorized: UnauthorizedHook,
    ) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("management-console/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("API client initialized with base URL: {}", base_url);

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                tokens,
                on_unauthorized,
            }),
        })
    }

    /// Create a client from loaded configuration
    pub fn from_config(
        config: &ClientConfig,
        tokens: TokenStore,
        on_unauthorized: UnauthorizedHook,
    ) -> ApiResult<Self> {
        Self::new(config.base_url.clone(), tokens, on_unauthorized)
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// The token slot requests are authenticated with
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    /// Absolute URL for `path`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    fn headers(&self, extra: HeaderMap) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.inner.tokens.get() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                ApiError::Validation("Stored token is not a valid header value".to_string())
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        headers.extend(extra);
        Ok(headers)
    }

    /// Issue one call to `path` and return its JSON payload, if any
    pub async fn request(&self, path: &str, options: RequestOptions) -> ApiResult<Option<Value>> {
        let url = self.url(path);
        let result = self.execute(&url, options).await;

        if let Err(e) = &result {
            error!(url = %url, message = %e, "[API ERROR]");
        }

        result
    }

    async fn execute(&self, url: &str, options: RequestOptions) -> ApiResult<Option<Value>> {
        let RequestOptions {
            method,
            body,
            headers,
        } = options;

        info!(
            method = %method,
            url = %url,
            body = ?body.as_ref().map(redacted),
            "[API REQUEST]"
        );

        let mut builder = self
            .inner
            .http
            .request(method, url)
            .headers(self.headers(headers)?);
        if let Some(body) = body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        info!(
            url = %url,
            status = status.as_u16(),
            ok = status.is_success(),
            body = %text,
            "[API RESPONSE]"
        );

        if status == StatusCode::UNAUTHORIZED {
            self.reject_session();
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            return Err(ApiError::Request {
                status: status.as_u16(),
                message: failure_message(&text),
            });
        }

        parse_payload(&text)
    }

    fn reject_session(&self) {
        warn!("Session rejected by the API; clearing bearer token");
        if let Err(e) = self.inner.tokens.clear() {
            warn!("Failed to clear persisted bearer token: {}", e);
        }
        (self.inner.on_unauthorized)();
    }

    /// GET `path` and decode its (required) payload
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let payload = self.request(path, RequestOptions::get()).await?;
        decode_payload(payload)?.ok_or(ApiError::EmptyPayload)
    }

    /// POST `body` to `path`
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, body).await
    }

    /// PUT `body` to `path`
    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, path, body).await
    }

    /// DELETE `path`, discarding any payload
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.request(path, RequestOptions::delete()).await?;
        Ok(())
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> ApiResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let payload = self
            .request(path, RequestOptions::new(method).with_body(body))
            .await?;
        Ok(decode_acknowledgement(payload))
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("tokens", &self.inner.tokens)
            .finish()
    }
}

/// Parse a success body; an empty body means "no payload"
pub fn parse_payload(text: &str) -> ApiResult<Option<Value>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(text)?))
}

/// Decode an optional JSON payload into `T`
pub fn decode_payload<T: DeserializeOwned>(payload: Option<Value>) -> ApiResult<Option<T>> {
    match payload {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Decode a mutation response
///
/// A 2xx already means the write happened, so a body that is not a `T`
/// (e.g. `{"message": "Saved"}`) is an acknowledgement without a typed payload.
pub fn decode_acknowledgement<T: DeserializeOwned>(payload: Option<Value>) -> Option<T> {
    let value = payload?;
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            debug!("Response carries no typed payload: {}", e);
            None
        }
    }
}

/// Copy of `body` safe to log; password fields are masked
fn redacted(body: &Value) -> Value {
    match body {
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, value)| {
                    let value = if key.to_ascii_lowercase().contains("password") {
                        Value::String("***".to_string())
                    } else {
                        redacted(value)
                    };
                    (key.clone(), value)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redacted).collect()),
        other => other.clone(),
    }
}

/// Best human-readable message for a failed response body
///
/// JSON bodies contribute their `message` field; anything that is not JSON is
/// used verbatim.
pub fn failure_message(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(json) => json
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .unwrap_or(DEFAULT_FAILURE_MESSAGE)
            .to_string(),
        Err(_) if text.trim().is_empty() => DEFAULT_FAILURE_MESSAGE.to_string(),
        Err(_) => {
            debug!("Failure body is not JSON; using it as the message");
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_payload_empty_body() {
        assert!(matches!(parse_payload(""), Ok(None)));
        assert!(matches!(parse_payload("  \n"), Ok(None)));
    }

    #[test]
    fn test_parse_payload_json() {
        let payload = parse_payload(r#"{"id": 7}"#).expect("parse");
        assert_eq!(payload, Some(json!({ "id": 7 })));
    }

    #[test]
    fn test_parse_payload_rejects_non_json() {
        assert!(matches!(
            parse_payload("<html>"),
            Err(ApiError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_failure_message_prefers_json_message() {
        assert_eq!(
            failure_message(r#"{"message": "SKU already exists", "code": 409}"#),
            "SKU already exists"
        );
    }

    #[test]
    fn test_failure_message_json_without_message() {
        assert_eq!(failure_message(r#"{"error": "x"}"#), DEFAULT_FAILURE_MESSAGE);
        assert_eq!(failure_message(r#"{"message": ""}"#), DEFAULT_FAILURE_MESSAGE);
        assert_eq!(failure_message("[1, 2]"), DEFAULT_FAILURE_MESSAGE);
    }

    #[test]
    fn test_failure_message_raw_text() {
        assert_eq!(failure_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(failure_message(""), DEFAULT_FAILURE_MESSAGE);
    }

    #[derive(Debug, serde::Deserialize)]
    struct Recorded {
        id: u64,
    }

    #[test]
    fn test_acknowledgement_without_model_is_not_an_error() {
        let decoded: Option<Recorded> = decode_acknowledgement(Some(json!({ "id": 501 })));
        assert_eq!(decoded.map(|r| r.id), Some(501));

        let ack: Option<Recorded> =
            decode_acknowledgement(Some(json!({ "message": "Sale recorded" })));
        assert!(ack.is_none());

        let empty: Option<Recorded> = decode_acknowledgement(None);
        assert!(empty.is_none());
    }

    #[test]
    fn test_redacted_masks_passwords() {
        let body = json!({
            "username": "alice",
            "password": "hunter22",
            "nested": [{ "newPassword": "x" }]
        });
        assert_eq!(
            redacted(&body),
            json!({
                "username": "alice",
                "password": "***",
                "nested": [{ "newPassword": "***" }]
            })
        );
    }

    #[test]
    fn test_request_options_builders() {
        let options = RequestOptions::get().with_header(
            HeaderName::from_static("x-trace"),
            HeaderValue::from_static("abc"),
        );
        assert_eq!(options.method, Method::GET);
        assert!(options.body.is_none());
        assert_eq!(options.headers["x-trace"], "abc");
    }
}
