use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Method};
use secrecy::ExposeSecret as _;
use url::Url;

use crate::Result;
use crate::auth;
use crate::config::{Config, Environment, validate_credentials};
use crate::error::Error;
use crate::types::{
    CheckoutPayload, CheckoutRequest, CheckoutResponse, OrderStatusResponse, SignaturePayload,
};

const CREATE_CHECKOUT_PATH: &str = "nac/api/v1/pg/orders/create-checkout";
const CHECK_STATUS_PATH: &str = "nac/api/v1/pg/orders/check-status";

/// Client for the OM Pay gateway.
///
/// Holds only immutable configuration, so it can be cloned and shared across tasks.
/// Every operation issues at most one HTTP request and never retries.
#[derive(Clone, Debug)]
pub struct Client {
    config: Config,
    base_url: Url,
    headers: HeaderMap,
    client: ReqwestClient,
}

impl Client {
    /// Creates a client with a default HTTP transport. No request is made.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_http_client(config, ReqwestClient::new())
    }

    /// Creates a client on top of a caller supplied HTTP transport.
    ///
    /// Authentication, content type and the configured timeout are applied to each request,
    /// so they hold regardless of how `client` was built.
    pub fn with_http_client(config: Config, client: ReqwestClient) -> Result<Self> {
        validate_credentials(config.client_id(), config.client_secret().expose_secret())?;

        let base_url = config.resolve_base_url()?;
        let headers = auth::default_headers(config.client_id(), config.client_secret())?;

        Ok(Self {
            config,
            base_url,
            headers,
            client,
        })
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        self.config.client_id()
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.config.environment()
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    /// Creates a checkout order and returns where to send the customer.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, fields(currency = %checkout.currency), err(level = "warn"))
    )]
    pub async fn create_checkout(&self, checkout: &CheckoutRequest) -> Result<CheckoutResponse> {
        validate_checkout(checkout)?;

        let request = self
            .client
            .request(Method::POST, self.endpoint(CREATE_CHECKOUT_PATH)?)
            .headers(self.headers.clone())
            .timeout(self.timeout())
            .json(&CheckoutPayload::from(checkout))
            .build()?;

        let body = crate::request(&self.client, request).await?;
        Ok(CheckoutResponse::from_body(body))
    }

    /// Fetches the current state of an order.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self), err(level = "warn"))
    )]
    pub async fn check_status(&self, order_id: &str) -> Result<OrderStatusResponse> {
        if order_id.is_empty() {
            return Err(Error::validation("orderId is required"));
        }

        let request = self
            .client
            .request(Method::GET, self.endpoint(CHECK_STATUS_PATH)?)
            .headers(self.headers.clone())
            .timeout(self.timeout())
            .query(&[("orderId", order_id)])
            .build()?;

        let body = crate::request(&self.client, request).await?;
        Ok(OrderStatusResponse::from_body(body, order_id))
    }

    /// Checks a webhook signature against `HMAC-SHA256(client_secret, "{orderId}/{paymentId}")`.
    ///
    /// The comparison is exact: the signature must be the lowercase hex digest.
    pub fn verify_signature(&self, payload: &SignaturePayload, signature: &str) -> Result<bool> {
        if payload.order_id.is_empty() || payload.payment_id.is_empty() {
            return Err(Error::validation("orderId and paymentId are required"));
        }
        if signature.is_empty() {
            return Err(Error::validation("signature is required"));
        }

        let expected = auth::sign(
            self.config.client_secret().expose_secret(),
            &payload.canonical_message(),
        )?;

        Ok(auth::signatures_match(&expected, signature))
    }

    /// Like [`Client::verify_signature`], but a mismatch is an error of kind
    /// [`Kind::SignatureMismatch`](crate::Kind::SignatureMismatch).
    pub fn verify_signature_or_err(
        &self,
        payload: &SignaturePayload,
        signature: &str,
    ) -> Result<()> {
        if self.verify_signature(payload, signature)? {
            Ok(())
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!(order_id = %payload.order_id, "webhook signature mismatch");

            Err(Error::signature_mismatch())
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}

fn validate_checkout(checkout: &CheckoutRequest) -> Result<()> {
    if checkout.amount.is_zero() || checkout.amount.is_sign_negative() {
        return Err(Error::validation(format!(
            "amount must be greater than zero, got {}",
            checkout.amount
        )));
    }
    if checkout.currency.is_empty() {
        return Err(Error::validation("currency is required"));
    }

    let customer = &checkout.customer;
    if customer.phone.is_empty() || customer.email.is_empty() || customer.name.is_empty() {
        return Err(Error::validation(
            "customer phone, email and name are required",
        ));
    }

    Ok(())
}
