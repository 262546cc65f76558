#![allow(dead_code, reason = "not every test binary uses every helper")]

use std::net::TcpListener;
use std::time::Duration;

use httpmock::MockServer;
use ompay::types::{CheckoutRequest, Customer};
use ompay::{Client, Config, Environment};
use rust_decimal_macros::dec;
use url::Url;

pub const CLIENT_ID: &str = "c1";
pub const CLIENT_SECRET: &str = "s1";
/// `Basic base64("c1:s1")`
pub const AUTHORIZATION: &str = "Basic YzE6czE=";

pub const CREATE_CHECKOUT_PATH: &str = "/nac/api/v1/pg/orders/create-checkout";
pub const CHECK_STATUS_PATH: &str = "/nac/api/v1/pg/orders/check-status";

pub fn client(server: &MockServer) -> anyhow::Result<Client> {
    client_with_timeout(&server.base_url(), Duration::from_secs(5))
}

pub fn client_with_timeout(base_url: &str, timeout: Duration) -> anyhow::Result<Client> {
    let config = Config::builder()
        .client_id(CLIENT_ID)
        .client_secret(CLIENT_SECRET)
        .environment(Environment::Sandbox)
        .timeout(timeout)
        .base_url(Url::parse(base_url)?)
        .build();

    Ok(Client::new(config)?)
}

/// Base URL of a local port nothing listens on.
pub fn unreachable_base_url() -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);

    Ok(format!("http://{addr}"))
}

pub fn customer() -> Customer {
    Customer::builder()
        .phone("+96891234567")
        .email("a@b.com")
        .name("A")
        .build()
}

pub fn checkout_request() -> CheckoutRequest {
    CheckoutRequest::builder()
        .amount(dec!(100))
        .currency("OMR")
        .customer(customer())
        .build()
}
