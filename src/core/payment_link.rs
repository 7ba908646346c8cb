use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::types::{CustomerDetails, ItemDetails};
use crate::error::Result;
use crate::http::Http;

const BASE_PATH: &str = "/v1/payment-links";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PaymentLinkTransaction {
    pub order_id: String,
    pub gross_amount: i64,
    /// Custom suffix of the generated URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_link_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Expiry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    pub duration: u32,
    /// `days`, `hours` or `minutes`.
    pub unit: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PaymentLinkRequest {
    pub transaction_details: PaymentLinkTransaction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<Expiry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_payments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_details: Option<Vec<ItemDetails>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_details: Option<CustomerDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callbacks: Option<Map<String, Value>>,
    /// Channel options such as `credit_card` or `bca_va`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaymentLinkRequest {
    pub fn new(order_id: impl Into<String>, gross_amount: i64) -> Self {
        Self {
            transaction_details: PaymentLinkTransaction {
                order_id: order_id.into(),
                gross_amount,
                payment_link_id: None,
            },
            customer_required: None,
            usage_limit: None,
            expiry: None,
            enabled_payments: None,
            title: None,
            item_details: None,
            customer_details: None,
            callbacks: None,
            extra: Map::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PaymentLinkResponse {
    pub order_id: String,
    pub payment_url: String,
}

/// Stored payment link. The API returns many undocumented fields; they stay in `extra`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PaymentLinkDetails {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub payment_link_id: Option<String>,
    #[serde(default)]
    pub payment_link_url: Option<String>,
    #[serde(default)]
    pub gross_amount: Option<i64>,
    #[serde(default)]
    pub usage: Option<u32>,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub expiry_start: Option<String>,
    #[serde(default)]
    pub expiry_duration: Option<u32>,
    #[serde(default)]
    pub expiry_unit: Option<String>,
    #[serde(default)]
    pub enabled_payments: Vec<String>,
    #[serde(default)]
    pub purchases: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PaymentLinkDeleted {
    pub message: String,
}

/// Shareable checkout links.
pub struct PaymentLink<'a> {
    http: &'a Http,
}

impl<'a> PaymentLink<'a> {
    pub(crate) fn new(http: &'a Http) -> Self {
        Self { http }
    }

    #[tracing::instrument(skip(self, body), fields(order_id = %body.transaction_details.order_id))]
    pub async fn create(&self, body: &PaymentLinkRequest) -> Result<PaymentLinkResponse> {
        self.http.post(BASE_PATH, body).await
    }

    pub async fn get(&self, order_id: &str) -> Result<PaymentLinkDetails> {
        self.http.get(&format!("{}/{}", BASE_PATH, order_id)).await
    }

    pub async fn delete(&self, order_id: &str) -> Result<PaymentLinkDeleted> {
        self.http.delete(&format!("{}/{}", BASE_PATH, order_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Method, MockTransport, Response};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_get_delete() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r| {
                r.method == Method::POST
                    && r.path == "/v1/payment-links"
                    && r.body
                        == Some(json!({
                            "transaction_details": {"order_id": "link-1", "gross_amount": 190000},
                            "usage_limit": 1,
                            "expiry": {"duration": 20, "unit": "days"},
                            "bca_va": {"va_number": "12345678911"}
                        }))
            })
            .times(1)
            .returning(|_| {
                Ok(Response::json(json!({
                    "order_id": "link-1",
                    "payment_url": "https://app.sandbox.midtrans.com/payment-links/amazing-link"
                })))
            });
        transport
            .expect_send()
            .withf(|r| r.method == Method::GET && r.path == "/v1/payment-links/link-1")
            .times(1)
            .returning(|_| {
                Ok(Response::json(json!({
                    "id": 1,
                    "order_id": "link-1",
                    "usage": 0,
                    "usage_limit": 1,
                    "enabled_payments": ["bca_va"],
                    "purchases": [],
                    "currency_sign": "Rp"
                })))
            });
        transport
            .expect_send()
            .withf(|r| r.method == Method::DELETE && r.path == "/v1/payment-links/link-1")
            .times(1)
            .returning(|_| Ok(Response::json(json!({"message": "Payment link deleted"}))));

        let http = Http::new(Arc::new(transport));
        let api = PaymentLink::new(&http);

        let mut request = PaymentLinkRequest::new("link-1", 190000);
        request.usage_limit = Some(1);
        request.expiry = Some(Expiry {
            start_time: None,
            duration: 20,
            unit: "days".into(),
        });
        request
            .extra
            .insert("bca_va".into(), json!({"va_number": "12345678911"}));

        let created = api.create(&request).await.unwrap();
        assert!(created.payment_url.ends_with("amazing-link"));

        let details = api.get("link-1").await.unwrap();
        assert_eq!(details.usage_limit, Some(1));
        assert_eq!(details.extra["currency_sign"], "Rp");

        let deleted = api.delete("link-1").await.unwrap();
        assert_eq!(deleted.message, "Payment link deleted");
    }
}
