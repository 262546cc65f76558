#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

use reqwest::{Client as ReqwestClient, Request};
use serde_json::Value;

pub use client::Client;
pub use config::{Config, Environment};
pub use error::{Error, Kind};

pub type Result<T> = std::result::Result<T, Error>;

/// Executes a single gateway request and decodes the JSON body.
///
/// Non-2xx responses are classified through [`Error::from_status`]; transport failures
/// through `From<reqwest::Error>`.
async fn request(client: &ReqwestClient, request: Request) -> Result<Value> {
    #[cfg(feature = "tracing")]
    let (method, path) = (request.method().clone(), request.url().path().to_owned());
    #[cfg(feature = "tracing")]
    tracing::debug!(%method, %path, "sending gateway request");

    let response = client.execute(request).await?;
    let status_code = response.status();

    if !status_code.is_success() {
        let source = response.error_for_status_ref().err();
        let body = response.text().await.ok().and_then(|text| error_body(&text));

        #[cfg(feature = "tracing")]
        tracing::warn!(
            %method,
            %path,
            status = status_code.as_u16(),
            "gateway returned an error status"
        );

        return Err(Error::from_status(status_code, body, source));
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(%method, %path, status = status_code.as_u16(), "gateway responded");

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Error bodies are kept as JSON when they parse, otherwise as the raw text.
fn error_body(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }

    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned())))
}
