//! Creates a checkout order and polls its status once.
//!
//! ```sh
//! OMPAY_CLIENT_ID=... OMPAY_CLIENT_SECRET=... cargo run --example checkout --features tracing
//! ```

use ompay::types::{CheckoutRequest, Customer};
use ompay::{Client, Config};
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = Client::new(Config::from_env()?)?;
    info!(environment = %client.environment(), base_url = %client.base_url(), "client ready");

    let request = CheckoutRequest::builder()
        .amount(dec!(1.500))
        .currency("OMR")
        .customer(
            Customer::builder()
                .phone("+96891234567")
                .email("buyer@example.com")
                .name("Demo Buyer")
                .build(),
        )
        .order_reference("demo-order-1")
        .build();

    let checkout = client.create_checkout(&request).await?;
    info!(order_id = %checkout.order_id, checkout_url = ?checkout.checkout_url, "checkout created");

    let status = client.check_status(&checkout.order_id).await?;
    info!(order_id = %status.order_id, status = status.status.as_str(), "order status");

    Ok(())
}
