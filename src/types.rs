use std::str::FromStr as _;

use bon::Builder;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

/// How the hosted checkout page is presented.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UiMode {
    #[default]
    Checkout,
    Embedded,
}

/// How the gateway returns the customer to the merchant after payment.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RedirectType {
    Post,
    #[default]
    Redirect,
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Builder)]
#[builder(on(String, into))]
pub struct Customer {
    pub phone: String,
    pub email: String,
    pub name: String,
}

/// Input for [`Client::create_checkout`](crate::Client::create_checkout).
///
/// ```
/// use ompay::types::{CheckoutRequest, Customer};
/// use rust_decimal::Decimal;
///
/// let request = CheckoutRequest::builder()
///     .amount(Decimal::new(1050, 2))
///     .currency("OMR")
///     .customer(
///         Customer::builder()
///             .phone("+96891234567")
///             .email("buyer@example.com")
///             .name("Buyer")
///             .build(),
///     )
///     .order_reference("INV-1001")
///     .build();
///
/// assert!(request.ui_mode.is_none());
/// ```
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Builder)]
pub struct CheckoutRequest {
    pub amount: Decimal,
    #[builder(into)]
    pub currency: String,
    pub customer: Customer,
    pub ui_mode: Option<UiMode>,
    pub redirect_type: Option<RedirectType>,
    #[builder(into)]
    pub order_reference: Option<String>,
    /// Free-form merchant data echoed back by the gateway.
    pub metadata: Option<Map<String, Value>>,
}

/// Flat wire body for `create-checkout`.
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutPayload<'req> {
    /// The gateway expects a JSON number, so this goes through `f64`: `100` is sent as
    /// `100.0` and precision is limited to about 15 significant digits.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: &'req str,
    pub ui_mode: UiMode,
    pub redirect_type: RedirectType,
    pub phone: &'req str,
    pub email: &'req str,
    pub name: &'req str,
    pub order_reference: Option<&'req str>,
    pub metadata: Option<&'req Map<String, Value>>,
}

impl<'req> From<&'req CheckoutRequest> for CheckoutPayload<'req> {
    fn from(request: &'req CheckoutRequest) -> Self {
        Self {
            amount: request.amount,
            currency: &request.currency,
            ui_mode: request.ui_mode.unwrap_or_default(),
            redirect_type: request.redirect_type.unwrap_or_default(),
            phone: &request.customer.phone,
            email: &request.customer.email,
            name: &request.customer.name,
            order_reference: request.order_reference.as_deref(),
            metadata: request.metadata.as_ref(),
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct CheckoutResponse {
    pub order_id: String,
    pub checkout_url: Option<String>,
    pub status: String,
    /// Full response body as returned by the gateway.
    pub data: Value,
}

impl CheckoutResponse {
    pub(crate) fn from_body(data: Value) -> Self {
        Self {
            order_id: string_field(&data, "orderId").unwrap_or_default(),
            checkout_url: string_field(&data, "checkoutUrl"),
            status: string_field(&data, "status").unwrap_or_default(),
            data,
        }
    }
}

/// Order state reported by `check-status`.
///
/// Values outside the documented set are kept verbatim in [`OrderStatus::Unknown`].
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderStatus {
    Success,
    Failed,
    Pending,
    Cancelled,
    Unknown(String),
}

impl OrderStatus {
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value {
            "success" => OrderStatus::Success,
            "failed" => OrderStatus::Failed,
            "pending" => OrderStatus::Pending,
            "cancelled" => OrderStatus::Cancelled,
            other => OrderStatus::Unknown(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Success => "success",
            OrderStatus::Failed => "failed",
            OrderStatus::Pending => "pending",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Unknown(other) => other,
        }
    }

    /// `true` once the order can no longer change state.
    #[must_use]
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            OrderStatus::Success | OrderStatus::Failed | OrderStatus::Cancelled
        )
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaymentDetails {
    pub payment_method: Option<String>,
    pub card_network: Option<String>,
    pub card_type: Option<String>,
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct OrderStatusResponse {
    pub order_id: String,
    pub status: OrderStatus,
    pub payment_id: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub payment_details: Option<PaymentDetails>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Full response body as returned by the gateway.
    pub data: Value,
}

impl OrderStatusResponse {
    /// `order_id` falls back to the id that was queried when the body omits it.
    pub(crate) fn from_body(data: Value, requested_order_id: &str) -> Self {
        let payment_details = data
            .get("paymentDetails")
            .filter(|details| details.is_object())
            .map(|details| PaymentDetails {
                payment_method: string_field(details, "paymentMethod"),
                card_network: string_field(details, "cardNetwork"),
                card_type: string_field(details, "cardType"),
            });

        Self {
            order_id: string_field(&data, "orderId")
                .unwrap_or_else(|| requested_order_id.to_owned()),
            status: OrderStatus::from_wire(
                string_field(&data, "status").as_deref().unwrap_or_default(),
            ),
            payment_id: string_field(&data, "paymentId"),
            amount: data.get("amount").and_then(decimal_value),
            currency: string_field(&data, "currency"),
            payment_details,
            created_at: string_field(&data, "createdAt"),
            updated_at: string_field(&data, "updatedAt"),
            data,
        }
    }
}

/// Identifies the payment a webhook signature was computed over.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Builder)]
#[builder(on(String, into))]
pub struct SignaturePayload {
    pub order_id: String,
    pub payment_id: String,
}

impl SignaturePayload {
    /// The exact string that is signed: `{order_id}/{payment_id}`.
    #[must_use]
    pub fn canonical_message(&self) -> String {
        format!("{}/{}", self.order_id, self.payment_id)
    }
}

/// Reads `key` as a string. Numbers and booleans are stringified; `null` counts as absent.
fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn decimal_value(value: &Value) -> Option<Decimal> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => return None,
    };

    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .ok()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    fn customer() -> Customer {
        Customer::builder()
            .phone("+96891234567")
            .email("a@b.com")
            .name("A")
            .build()
    }

    #[test]
    fn payload_applies_defaults_and_omits_absent_fields() {
        let request = CheckoutRequest::builder()
            .amount(dec!(100))
            .currency("OMR")
            .customer(customer())
            .build();

        let body = serde_json::to_value(CheckoutPayload::from(&request)).unwrap();

        assert_eq!(
            body,
            json!({
                "amount": 100.0,
                "currency": "OMR",
                "uiMode": "checkout",
                "redirectType": "redirect",
                "phone": "+96891234567",
                "email": "a@b.com",
                "name": "A",
            })
        );
    }

    #[test]
    fn payload_amount_is_a_float_number() {
        let request = CheckoutRequest::builder()
            .amount(dec!(10.50))
            .currency("OMR")
            .customer(customer())
            .build();

        let text = serde_json::to_string(&CheckoutPayload::from(&request)).unwrap();

        assert!(
            text.starts_with(r#"{"amount":10.5,"#),
            "unexpected wire body {text}"
        );
    }

    #[test]
    fn payload_includes_optional_fields() {
        let mut metadata = Map::new();
        metadata.insert("cart".to_owned(), json!({"items": 2}));

        let request = CheckoutRequest::builder()
            .amount(dec!(12.5))
            .currency("OMR")
            .customer(customer())
            .ui_mode(UiMode::Embedded)
            .redirect_type(RedirectType::Post)
            .order_reference("INV-7")
            .metadata(metadata)
            .build();

        let body = serde_json::to_value(CheckoutPayload::from(&request)).unwrap();

        assert_eq!(body["amount"], json!(12.5));
        assert_eq!(body["uiMode"], "embedded");
        assert_eq!(body["redirectType"], "post");
        assert_eq!(body["orderReference"], "INV-7");
        assert_eq!(body["metadata"], json!({"cart": {"items": 2}}));
    }

    #[test]
    fn checkout_response_maps_known_fields() {
        let body = json!({
            "orderId": "o1",
            "checkoutUrl": "https://pay.example/o1",
            "status": "pending",
            "extra": true,
        });

        let response = CheckoutResponse::from_body(body.clone());

        assert_eq!(response.order_id, "o1");
        assert_eq!(response.checkout_url.as_deref(), Some("https://pay.example/o1"));
        assert_eq!(response.status, "pending");
        assert_eq!(response.data, body);
    }

    #[test]
    fn checkout_response_stringifies_and_defaults() {
        let response = CheckoutResponse::from_body(json!({"orderId": 42}));

        assert_eq!(response.order_id, "42");
        assert_eq!(response.status, "");
        assert!(response.checkout_url.is_none(), "checkoutUrl should be absent");
    }

    #[test]
    fn status_response_maps_full_body() {
        let body = json!({
            "orderId": "o1",
            "status": "success",
            "paymentId": "p1",
            "amount": 10.5,
            "currency": "OMR",
            "paymentDetails": {
                "paymentMethod": "card",
                "cardNetwork": "visa",
                "cardType": "debit",
            },
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:05:00Z",
        });

        let response = OrderStatusResponse::from_body(body.clone(), "ignored");

        assert_eq!(response.order_id, "o1");
        assert_eq!(response.status, OrderStatus::Success);
        assert_eq!(response.payment_id.as_deref(), Some("p1"));
        assert_eq!(response.amount, Some(dec!(10.5)));
        assert_eq!(response.currency.as_deref(), Some("OMR"));
        assert_eq!(
            response.payment_details,
            Some(PaymentDetails {
                payment_method: Some("card".to_owned()),
                card_network: Some("visa".to_owned()),
                card_type: Some("debit".to_owned()),
            })
        );
        assert_eq!(response.created_at.as_deref(), Some("2026-01-01T00:00:00Z"));
        assert_eq!(response.updated_at.as_deref(), Some("2026-01-01T00:05:00Z"));
        assert_eq!(response.data, body);
    }

    #[test]
    fn status_response_defaults_order_id_to_request() {
        let response = OrderStatusResponse::from_body(json!({"status": "pending"}), "o9");

        assert_eq!(response.order_id, "o9");
        assert_eq!(response.status, OrderStatus::Pending);
        assert!(response.payment_details.is_none(), "no details expected");
        assert!(response.amount.is_none(), "no amount expected");
    }

    #[test]
    fn amount_accepts_numeric_strings() {
        let response = OrderStatusResponse::from_body(json!({"amount": "7.250"}), "o1");

        assert_eq!(response.amount, Some(dec!(7.250)));
    }

    #[test]
    fn unexpected_status_is_preserved() {
        let status = OrderStatus::from_wire("refunded");

        assert_eq!(status, OrderStatus::Unknown("refunded".to_owned()));
        assert_eq!(status.as_str(), "refunded");
        assert!(!status.is_final(), "unknown statuses are not final");
        assert!(OrderStatus::Cancelled.is_final(), "cancelled is final");
    }

    #[test]
    fn canonical_message_joins_with_slash() {
        let payload = SignaturePayload::builder()
            .order_id("o1")
            .payment_id("p1")
            .build();

        assert_eq!(payload.canonical_message(), "o1/p1");
    }
}
