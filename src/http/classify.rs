//! Response classification: decides whether an HTTP exchange succeeded.
//!
//! Midtrans signals failure in two places: the HTTP status line and a
//! `status_code` string embedded in the JSON body, which is frequently `"4xx"`
//! on an HTTP 200 reply.

use log::debug;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, ProviderError, Result};

/// Body fields checked, in order, for a provider message.
const MESSAGE_FIELDS: [&str; 3] = ["status_message", "error_message", "message"];

/// List of messages used by Snap error bodies.
const ERROR_MESSAGES_FIELD: &str = "error_messages";

/// A response body as read off the wire.
#[derive(Debug)]
pub enum Decoded {
    Json(Value),
    Text(String),
    /// Declared as JSON but failed to parse.
    Malformed {
        raw: String,
        error: serde_json::Error,
    },
}

impl Decoded {
    /// Parses `raw` as JSON when the content type says so, otherwise keeps the text.
    pub fn parse(content_type: Option<&str>, raw: String) -> Self {
        let is_json = content_type
            .map(|ct| ct.to_ascii_lowercase().contains("json"))
            .unwrap_or(false);

        if !is_json {
            return Decoded::Text(raw);
        }

        match serde_json::from_str(&raw) {
            Ok(value) => Decoded::Json(value),
            Err(error) => Decoded::Malformed { raw, error },
        }
    }

    fn json(&self) -> Option<&Value> {
        match self {
            Decoded::Json(value) => Some(value),
            _ => None,
        }
    }

    fn into_raw_value(self) -> Value {
        match self {
            Decoded::Json(value) => value,
            Decoded::Text(raw) | Decoded::Malformed { raw, .. } => Value::String(raw),
        }
    }
}

/// Successfully classified response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

/// Outcome of one successful exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: StatusCode,
    pub payload: Payload,
}

impl Response {
    pub fn new(status: StatusCode, payload: Payload) -> Self {
        Self { status, payload }
    }

    /// HTTP 200 response carrying a JSON body.
    pub fn json(value: Value) -> Self {
        Self::new(StatusCode::OK, Payload::Json(value))
    }

    /// HTTP 200 response carrying a plain text body.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, Payload::Text(text.into()))
    }

    /// Decodes the payload into `T`.
    ///
    /// Text payloads are offered to `T` as a JSON string, so `String` and
    /// `serde_json::Value` accept every payload. A body that does not fit `T`
    /// on a failed exchange (HTTP or embedded status of 400 and above) is
    /// reported as [`Error::Provider`], keeping the provider's message.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        let (value, is_json) = match self.payload {
            Payload::Json(value) => (value, true),
            Payload::Text(text) => (Value::String(text), false),
        };

        let source = match T::deserialize(&value) {
            Ok(decoded) => return Ok(decoded),
            Err(source) => source,
        };

        let failure = provider_error(self.status, is_json.then_some(&value));
        match failure {
            Some(error) => {
                debug!("Failure body did not match the response type: {}", source);
                Err(Error::Provider(ProviderError {
                    raw_body: Some(value),
                    ..error
                }))
            }
            None => Err(Error::MalformedResponse {
                status: self.status.as_u16(),
                body: value.to_string(),
                source,
            }),
        }
    }
}

/// Classifies one exchange.
///
/// With `throw_http_errors` unset every decodable body is returned untouched.
/// With it set, an HTTP status or embedded `status_code` of 400 or more becomes
/// [`Error::Provider`]. Bodies that fail to parse as JSON are returned as text
/// on a success status and rejected as [`Error::MalformedResponse`] otherwise.
pub fn classify(status: StatusCode, body: Decoded, throw_http_errors: bool) -> Result<Payload> {
    if throw_http_errors {
        if let Some(error) = provider_error(status, body.json()) {
            return Err(Error::Provider(ProviderError {
                raw_body: Some(body.into_raw_value()),
                ..error
            }));
        }
    }

    match body {
        Decoded::Json(value) => Ok(Payload::Json(value)),
        Decoded::Text(text) => Ok(Payload::Text(text)),
        Decoded::Malformed { raw, .. } if status.is_success() => {
            debug!("Response declared JSON but did not parse, returning raw text");
            Ok(Payload::Text(raw))
        }
        Decoded::Malformed { raw, error } => Err(Error::MalformedResponse {
            status: status.as_u16(),
            body: raw,
            source: error,
        }),
    }
}

/// Builds a provider error if either signal reports a failure. `raw_body` is left empty.
fn provider_error(status: StatusCode, body: Option<&Value>) -> Option<ProviderError> {
    let embedded = body.and_then(embedded_status_code);
    let embedded_failed = embedded
        .as_ref()
        .and_then(|(_, code)| *code)
        .is_some_and(|code| code >= 400.0);
    let http_failed = status.as_u16() >= 400;

    if !http_failed && !embedded_failed {
        return None;
    }

    let message = body
        .and_then(provider_message)
        .or_else(|| {
            embedded
                .as_ref()
                .filter(|_| embedded_failed)
                .map(|(code, _)| format!("Midtrans returned status code {}", code))
        })
        .unwrap_or_else(|| {
            format!(
                "HTTP status code {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )
        });

    Some(ProviderError {
        message,
        http_status: Some(status.as_u16()),
        provider_status_code: embedded.map(|(code, _)| code),
        raw_body: None,
    })
}

/// Reads the embedded `status_code`: the value as sent and its numeric form, if any.
fn embedded_status_code(body: &Value) -> Option<(String, Option<f64>)> {
    match body.get("status_code")? {
        Value::String(code) => {
            let numeric = code
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|code| code.is_finite());
            Some((code.clone(), numeric))
        }
        Value::Number(code) => Some((code.to_string(), code.as_f64())),
        _ => None,
    }
}

/// First non-empty message field, then the Snap style `error_messages` list.
fn provider_message(body: &Value) -> Option<String> {
    MESSAGE_FIELDS
        .iter()
        .filter_map(|field| body.get(*field)?.as_str())
        .find(|message| !message.is_empty())
        .map(str::to_string)
        .or_else(|| {
            let messages: Vec<&str> = body
                .get(ERROR_MESSAGES_FIELD)?
                .as_array()?
                .iter()
                .filter_map(Value::as_str)
                .filter(|message| !message.is_empty())
                .collect();
            (!messages.is_empty()).then(|| messages.join(", "))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn json_body(value: Value) -> Decoded {
        Decoded::Json(value)
    }

    #[test]
    fn test_parse_json_content_type() {
        let body = Decoded::parse(
            Some("application/json; charset=utf-8"),
            r#"{"status_code":"200"}"#.into(),
        );
        assert!(matches!(body, Decoded::Json(_)));
    }

    #[test]
    fn test_parse_text_content_type() {
        let body = Decoded::parse(Some("text/plain"), "pong".into());
        assert!(matches!(body, Decoded::Text(ref t) if t == "pong"));

        let body = Decoded::parse(None, "{}".into());
        assert!(matches!(body, Decoded::Text(_)));
    }

    #[test]
    fn test_parse_malformed_json() {
        let body = Decoded::parse(Some("application/json"), "pong".into());
        assert!(matches!(body, Decoded::Malformed { ref raw, .. } if raw == "pong"));
    }

    #[test]
    fn test_passthrough_when_not_throwing() {
        let body = json!({"status_code": "404", "status_message": "Transaction doesn't exist."});
        let payload = classify(StatusCode::OK, json_body(body.clone()), false).unwrap();
        assert_eq!(payload, Payload::Json(body.clone()));

        // Even a failing HTTP status resolves when errors are not thrown.
        let payload = classify(StatusCode::NOT_FOUND, json_body(body.clone()), false).unwrap();
        assert_eq!(payload, Payload::Json(body));
    }

    #[test]
    fn test_embedded_status_code_fails_when_throwing() {
        let body = json!({"status_code": "404", "status_message": "Transaction doesn't exist."});
        let err = classify(StatusCode::OK, json_body(body.clone()), true).unwrap_err();

        let provider = err.as_provider().expect("provider error");
        assert_eq!(provider.message, "Transaction doesn't exist.");
        assert_eq!(provider.provider_status_code.as_deref(), Some("404"));
        assert_eq!(provider.http_status, Some(200));
        assert_eq!(provider.raw_body, Some(body));
    }

    #[test]
    fn test_numeric_embedded_status_code() {
        let body = json!({"status_code": 500, "status_message": "Internal error"});
        let err = classify(StatusCode::OK, json_body(body), true).unwrap_err();
        let provider = err.as_provider().unwrap();
        assert_eq!(provider.provider_status_code.as_deref(), Some("500"));
        assert_eq!(provider.status_code(), Some(500));
    }

    #[test]
    fn test_success_embedded_code_passes_when_throwing() {
        let body = json!({"status_code": "201", "status_message": "Success"});
        assert!(classify(StatusCode::OK, json_body(body), true).is_ok());

        let body = json!({"status_code": "not-a-number"});
        assert!(classify(StatusCode::OK, json_body(body), true).is_ok());
    }

    #[test]
    fn test_numeric_like_embedded_codes_fail_when_throwing() {
        for (code, sent) in [
            (json!("99999"), "99999"),
            (json!(70000), "70000"),
            (json!("404.0"), "404.0"),
            (json!(404.0), "404.0"),
            (json!(" 503 "), " 503 "),
        ] {
            let err = classify(StatusCode::OK, json_body(json!({"status_code": code})), true)
                .unwrap_err();
            let provider = err.as_provider().expect("provider error");
            assert_eq!(provider.provider_status_code.as_deref(), Some(sent));
            assert_eq!(provider.http_status, Some(200));
        }

        for code in [json!("399.9"), json!(200.0), json!("NaN"), json!(true)] {
            let body = json_body(json!({"status_code": code}));
            assert!(classify(StatusCode::OK, body, true).is_ok());
        }
    }

    #[test]
    fn test_snap_error_messages() {
        let body = json!({
            "error_messages": [
                "Access denied due to unauthorized transaction, please check client or server key",
                "Visit https://snap-docs.midtrans.com/#request-headers for more details"
            ]
        });
        let err = classify(StatusCode::UNAUTHORIZED, json_body(body.clone()), true).unwrap_err();

        let provider = err.as_provider().unwrap();
        assert_eq!(
            provider.message,
            "Access denied due to unauthorized transaction, please check client or server key, \
             Visit https://snap-docs.midtrans.com/#request-headers for more details"
        );
        assert_eq!(provider.http_status, Some(401));
        assert_eq!(provider.provider_status_code, None);
        assert_eq!(provider.raw_body, Some(body));

        // Single-field messages still win over the list.
        let body = json!({"status_message": "Bad request", "error_messages": ["ignored"]});
        let err = classify(StatusCode::BAD_REQUEST, json_body(body), true).unwrap_err();
        assert_eq!(err.as_provider().unwrap().message, "Bad request");
    }

    #[test]
    fn test_decode_failure_body_is_provider_error() {
        #[derive(Deserialize, Debug)]
        struct Token {
            #[allow(dead_code)]
            token: String,
        }

        let body = json!({"error_messages": ["transaction_details.gross_amount is required"]});
        let err = Response::new(StatusCode::BAD_REQUEST, Payload::Json(body.clone()))
            .decode::<Token>()
            .unwrap_err();
        let provider = err.as_provider().expect("provider error");
        assert_eq!(provider.message, "transaction_details.gross_amount is required");
        assert_eq!(provider.http_status, Some(400));
        assert_eq!(provider.raw_body, Some(body));

        // Embedded failure on HTTP 200 into a list type.
        let body = json!({"status_code": "401", "status_message": "Unauthorized"});
        let err = Response::json(body).decode::<Vec<Value>>().unwrap_err();
        assert_eq!(err.as_provider().unwrap().status_code(), Some(401));

        // Text body on a failed exchange.
        let err = Response::new(StatusCode::BAD_GATEWAY, Payload::Text("<html>".into()))
            .decode::<Token>()
            .unwrap_err();
        let provider = err.as_provider().unwrap();
        assert_eq!(provider.message, "HTTP status code 502 Bad Gateway");
        assert_eq!(provider.raw_body, Some(json!("<html>")));
    }

    #[test]
    fn test_http_status_without_body_message() {
        let err = classify(StatusCode::BAD_GATEWAY, Decoded::Text(String::new()), true).unwrap_err();
        let provider = err.as_provider().unwrap();
        assert_eq!(provider.message, "HTTP status code 502 Bad Gateway");
        assert_eq!(provider.http_status, Some(502));
        assert_eq!(provider.provider_status_code, None);
        assert_eq!(provider.raw_body, Some(Value::String(String::new())));
    }

    #[test]
    fn test_embedded_message_wins_over_http_reason() {
        let body = json!({"status_code": "401", "status_message": "Access denied due to unauthorized transaction"});
        let err = classify(StatusCode::UNAUTHORIZED, json_body(body), true).unwrap_err();
        assert_eq!(
            err.as_provider().unwrap().message,
            "Access denied due to unauthorized transaction"
        );
    }

    #[test]
    fn test_alternate_message_fields() {
        let body = json!({"error_message": "An error occurred when creating payouts", "errors": ["x"]});
        let err = classify(StatusCode::BAD_REQUEST, json_body(body), true).unwrap_err();
        assert_eq!(
            err.as_provider().unwrap().message,
            "An error occurred when creating payouts"
        );

        let body = json!({"status_code": "400"});
        let err = classify(StatusCode::OK, json_body(body), true).unwrap_err();
        assert_eq!(
            err.as_provider().unwrap().message,
            "Midtrans returned status code 400"
        );
    }

    #[test]
    fn test_malformed_on_success_returns_text() {
        let body = Decoded::parse(Some("application/json"), "pong".into());
        let payload = classify(StatusCode::OK, body, true).unwrap();
        assert_eq!(payload, Payload::Text("pong".into()));

        let body = Decoded::parse(Some("application/json"), String::new());
        let payload = classify(StatusCode::OK, body, false).unwrap();
        assert_eq!(payload, Payload::Text(String::new()));
    }

    #[test]
    fn test_malformed_on_failure_is_an_error() {
        let body = Decoded::parse(Some("application/json"), "<html>oops</html>".into());
        let err = classify(StatusCode::INTERNAL_SERVER_ERROR, body, false).unwrap_err();
        match err {
            Error::MalformedResponse { status, body, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body, "<html>oops</html>");
            }
            other => panic!("Expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_on_failure_when_throwing_is_provider_error() {
        let body = Decoded::parse(Some("application/json"), "<html>oops</html>".into());
        let err = classify(StatusCode::INTERNAL_SERVER_ERROR, body, true).unwrap_err();
        let provider = err.as_provider().unwrap();
        assert_eq!(provider.http_status, Some(500));
        assert_eq!(provider.raw_body, Some(json!("<html>oops</html>")));
    }

    #[test]
    fn test_response_decode() {
        #[derive(Deserialize, Debug)]
        struct Status {
            status_code: String,
        }

        let status: Status = Response::json(json!({"status_code": "200"})).decode().unwrap();
        assert_eq!(status.status_code, "200");

        let text: String = Response::text("pong").decode().unwrap();
        assert_eq!(text, "pong");

        let err = Response::text("pong").decode::<Status>().unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { status: 200, .. }));
    }
}
