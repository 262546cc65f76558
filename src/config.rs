use std::env;
use std::str::FromStr;
use std::time::Duration;

use bon::Builder;
use secrecy::SecretString;
use url::Url;

use crate::Result;
use crate::error::{Error, Kind};

pub const SANDBOX_BASE_URL: &str = "https://api.uat.gateway.ompay.com";
pub const PRODUCTION_BASE_URL: &str = "https://api.gateway.ompay.com";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const CLIENT_ID_VAR: &str = "OMPAY_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "OMPAY_CLIENT_SECRET";
const ENVIRONMENT_VAR: &str = "OMPAY_ENVIRONMENT";
const TIMEOUT_SECS_VAR: &str = "OMPAY_TIMEOUT_SECS";
const BASE_URL_VAR: &str = "OMPAY_BASE_URL";

/// Gateway deployment the client talks to.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    /// Accepts exactly `sandbox` or `production`.
    pub fn parse(value: &str) -> Result<Environment> {
        match value {
            "sandbox" => Ok(Environment::Sandbox),
            "production" => Ok(Environment::Production),
            other => Err(Error::validation(format!(
                "invalid environment `{other}`; expected one of: sandbox|production"
            ))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Production => "production",
        }
    }

    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_BASE_URL,
            Environment::Production => PRODUCTION_BASE_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Environment::parse(s)
    }
}

/// Client configuration. Immutable once built.
///
/// ```
/// use ompay::{Config, Environment};
///
/// let config = Config::builder()
///     .client_id("merchant-id")
///     .client_secret("merchant-secret")
///     .environment(Environment::Production)
///     .build();
///
/// assert_eq!(config.environment(), Environment::Production);
/// ```
#[derive(Clone, Debug, Builder)]
pub struct Config {
    #[builder(into)]
    client_id: String,
    #[builder(into)]
    client_secret: SecretString,
    #[builder(default)]
    environment: Environment,
    #[builder(default = DEFAULT_TIMEOUT)]
    timeout: Duration,
    /// Overrides the environment's host, e.g. to route through a proxy.
    base_url: Option<Url>,
}

impl Config {
    /// Builds a configuration from string inputs, typically taken from app-level settings.
    ///
    /// A missing `environment` defaults to sandbox. Credentials are checked before the
    /// environment is parsed.
    pub fn from_raw(
        client_id: &str,
        client_secret: &str,
        environment: Option<&str>,
    ) -> Result<Self> {
        validate_credentials(client_id, client_secret)?;

        let environment = environment
            .map(Environment::parse)
            .transpose()?
            .unwrap_or_default();

        Ok(Self::builder()
            .client_id(client_id)
            .client_secret(client_secret)
            .environment(environment)
            .build())
    }

    /// Loads configuration from `OMPAY_*` environment variables.
    ///
    /// `OMPAY_CLIENT_ID` and `OMPAY_CLIENT_SECRET` are required. `OMPAY_ENVIRONMENT`,
    /// `OMPAY_TIMEOUT_SECS` and `OMPAY_BASE_URL` are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = lookup(CLIENT_ID_VAR).unwrap_or_default();
        let client_secret = lookup(CLIENT_SECRET_VAR).unwrap_or_default();
        if client_id.is_empty() {
            return Err(Error::validation(format!("{CLIENT_ID_VAR} is required")));
        }
        if client_secret.is_empty() {
            return Err(Error::validation(format!("{CLIENT_SECRET_VAR} is required")));
        }

        let environment = lookup(ENVIRONMENT_VAR)
            .as_deref()
            .map(Environment::parse)
            .transpose()?
            .unwrap_or_default();

        let timeout = match lookup(TIMEOUT_SECS_VAR) {
            Some(raw) => raw.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                Error::with_source(
                    Kind::Validation,
                    format!("invalid {TIMEOUT_SECS_VAR} `{raw}`: {e}"),
                    e,
                )
            })?,
            None => DEFAULT_TIMEOUT,
        };

        let base_url = lookup(BASE_URL_VAR)
            .map(|raw| Url::parse(&raw))
            .transpose()?;

        Ok(Self::builder()
            .client_id(client_id)
            .client_secret(client_secret)
            .environment(environment)
            .timeout(timeout)
            .maybe_base_url(base_url)
            .build())
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn client_secret(&self) -> &SecretString {
        &self.client_secret
    }

    /// Resolves the host requests are sent to: the override if present, else the
    /// environment's default.
    ///
    /// The path always ends in `/`, so endpoint paths are appended under any proxy prefix
    /// instead of replacing its last segment.
    pub(crate) fn resolve_base_url(&self) -> Result<Url> {
        let mut url = match &self.base_url {
            Some(url) => url.clone(),
            None => Url::parse(self.environment.base_url())?,
        };

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }
}

/// `client_id` and `client_secret` must both be non-empty, checked in that order.
pub(crate) fn validate_credentials(client_id: &str, client_secret: &str) -> Result<()> {
    if client_id.is_empty() {
        return Err(Error::validation("clientId is required"));
    }
    if client_secret.is_empty() {
        return Err(Error::validation("clientSecret is required"));
    }

    Ok(())
}
