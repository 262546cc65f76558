use std::error::Error as StdError;
use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;

const AUTHENTICATION_MESSAGE: &str =
    "Authentication failed: invalid client ID or client secret";
const VALIDATION_MESSAGE: &str = "Request validation failed";
const TIMEOUT_MESSAGE: &str = "Request timed out";
const NETWORK_MESSAGE: &str = "Network error: no response received from the gateway";
const UNKNOWN_MESSAGE: &str = "An unknown error occurred";
const SIGNATURE_MISMATCH_MESSAGE: &str =
    "Signature verification failed: signature does not match the payload";

/// Closed set of failure categories surfaced by the client.
///
/// The [`Display`](fmt::Display) form is the stable wire code, e.g. `AUTHENTICATION_ERROR`.
#[non_exhaustive]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::IntoStaticStr,
)]
pub enum Kind {
    /// The gateway rejected the credentials (`401`/`403`).
    #[strum(serialize = "AUTHENTICATION_ERROR")]
    Authentication,
    /// Local input validation failed, or the gateway answered `400`/`422`.
    #[strum(serialize = "VALIDATION_ERROR")]
    Validation,
    /// Any other non-2xx gateway response.
    #[strum(serialize = "API_ERROR")]
    Api,
    /// The request was sent but no response was received.
    #[strum(serialize = "NETWORK_ERROR")]
    Network,
    /// The configured timeout elapsed.
    #[strum(serialize = "TIMEOUT_ERROR")]
    Timeout,
    /// A webhook signature did not match.
    #[strum(serialize = "SIGNATURE_MISMATCH")]
    SignatureMismatch,
    #[strum(serialize = "UNKNOWN_ERROR")]
    Unknown,
}

impl Kind {
    /// Returns the stable string code for this kind.
    #[must_use]
    pub fn code(self) -> &'static str {
        self.into()
    }
}

/// Error returned by every fallible operation in this crate.
///
/// Carries a [`Kind`] for programmatic branching, a human readable message and, for
/// failures that reached the gateway, the HTTP status and raw response body.
#[derive(Debug)]
pub struct Error {
    kind: Kind,
    message: String,
    status_code: Option<StatusCode>,
    response: Option<Value>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    pub fn new<S: Into<String>>(kind: Kind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            response: None,
            source: None,
        }
    }

    pub fn with_source<S, E>(kind: Kind, message: S, source: E) -> Self
    where
        S: Into<String>,
        E: StdError + Send + Sync + 'static,
    {
        Self {
            source: Some(Box::new(source)),
            ..Self::new(kind, message)
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::new(Kind::Validation, message)
    }

    #[must_use]
    pub fn signature_mismatch() -> Self {
        Self::new(Kind::SignatureMismatch, SIGNATURE_MISMATCH_MESSAGE)
    }

    /// Classifies a non-2xx gateway response.
    ///
    /// `response` is the decoded body. Its `message` field, when it is a string, becomes the
    /// error message for validation and generic API failures.
    #[must_use]
    pub fn from_status(
        status_code: StatusCode,
        response: Option<Value>,
        source: Option<reqwest::Error>,
    ) -> Self {
        let body_message = response
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .map(str::to_owned);

        let (kind, message) = match status_code.as_u16() {
            401 | 403 => (Kind::Authentication, AUTHENTICATION_MESSAGE.to_owned()),
            400 | 422 => (
                Kind::Validation,
                body_message.unwrap_or_else(|| VALIDATION_MESSAGE.to_owned()),
            ),
            code => (
                Kind::Api,
                body_message
                    .unwrap_or_else(|| format!("API request failed with status {code}")),
            ),
        };

        Self {
            kind,
            message,
            status_code: Some(status_code),
            response,
            source: source.map(|e| Box::new(e) as Box<dyn StdError + Send + Sync>),
        }
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        self.status_code
    }

    /// Raw gateway response body, when one was received.
    #[must_use]
    pub fn response(&self) -> Option<&Value> {
        self.response.as_ref()
    }

    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// Transport failures, classified in order: received status, timeout, no response, other.
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status_code) = e.status() {
            return Error::from_status(status_code, None, Some(e));
        }
        if e.is_timeout() {
            return Error::with_source(Kind::Timeout, TIMEOUT_MESSAGE, e);
        }
        if e.is_connect() || e.is_request() {
            return Error::with_source(Kind::Network, NETWORK_MESSAGE, e);
        }

        let message = e.to_string();
        let message = if message.is_empty() {
            UNKNOWN_MESSAGE.to_owned()
        } else {
            message
        };
        Error::with_source(Kind::Unknown, message, e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::with_source(Kind::Unknown, format!("invalid response body: {e}"), e)
    }
}

/// URLs only come from configuration, so a parse failure is bad caller input.
impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Validation, format!("invalid url: {e}"), e)
    }
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        Error::with_source(Kind::Validation, format!("invalid header value: {e}"), e)
    }
}
