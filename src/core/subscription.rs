use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::types::{CustomerDetails, StatusMessage};
use crate::error::Result;
use crate::http::Http;

const BASE_PATH: &str = "/v1/subscriptions";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPaymentType {
    CreditCard,
    Gopay,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntervalUnit {
    Day,
    Week,
    Month,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RetryIntervalUnit {
    Minute,
    Hour,
    Day,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Schedule {
    pub interval: u32,
    pub interval_unit: IntervalUnit,
    /// Subscription ends once this many intervals have run.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_interval: Option<u32>,
    /// `yyyy-MM-dd HH:mm:ss Z`, must be in the future.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_time: Option<String>,
}

/// Retries for failed card charges, up to 3 times.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RetrySchedule {
    pub interval: u32,
    pub interval_unit: RetryIntervalUnit,
    pub max_interval: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GopaySubscription {
    pub account_id: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SubscriptionRequest {
    /// Prefix of the generated order IDs.
    pub name: String,
    pub amount: String,
    /// Only `IDR` is accepted.
    pub currency: String,
    pub payment_type: SubscriptionPaymentType,
    /// Saved card token or GoPay payment option token.
    pub token: String,
    pub schedule: Schedule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_schedule: Option<RetrySchedule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gopay: Option<GopaySubscription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_details: Option<CustomerDetails>,
}

/// Partial update; unset fields are left as they are.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct SubscriptionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_schedule: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gopay: Option<GopaySubscription>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SubscriptionSchedule {
    #[serde(default)]
    pub interval: Option<u32>,
    #[serde(default)]
    pub interval_unit: Option<IntervalUnit>,
    #[serde(default)]
    pub max_interval: Option<u32>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub current_interval: Option<u32>,
    #[serde(default)]
    pub previous_execution_at: Option<String>,
    #[serde(default)]
    pub next_execution_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SubscriptionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    /// `active` or `inactive`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub schedule: Option<SubscriptionSchedule>,
    #[serde(default)]
    pub retry_schedule: Option<RetrySchedule>,
    #[serde(default)]
    pub transaction_ids: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Recurring charges on saved cards and linked GoPay accounts.
pub struct Subscription<'a> {
    http: &'a Http,
}

impl<'a> Subscription<'a> {
    pub(crate) fn new(http: &'a Http) -> Self {
        Self { http }
    }

    #[tracing::instrument(skip(self, body), fields(name = %body.name))]
    pub async fn create(&self, body: &SubscriptionRequest) -> Result<SubscriptionResponse> {
        self.http.post(BASE_PATH, body).await
    }

    pub async fn get(&self, subscription_id: &str) -> Result<SubscriptionResponse> {
        self.http
            .get(&format!("{}/{}", BASE_PATH, subscription_id))
            .await
    }

    /// Stops future charges until re-enabled.
    pub async fn disable(&self, subscription_id: &str) -> Result<StatusMessage> {
        self.action(subscription_id, "disable").await
    }

    pub async fn enable(&self, subscription_id: &str) -> Result<StatusMessage> {
        self.action(subscription_id, "enable").await
    }

    /// Permanently stops the subscription.
    pub async fn cancel(&self, subscription_id: &str) -> Result<StatusMessage> {
        self.action(subscription_id, "cancel").await
    }

    pub async fn update(
        &self,
        subscription_id: &str,
        body: &SubscriptionUpdate,
    ) -> Result<StatusMessage> {
        self.http
            .patch(&format!("{}/{}", BASE_PATH, subscription_id), body)
            .await
    }

    async fn action(&self, subscription_id: &str, action: &str) -> Result<StatusMessage> {
        self.http
            .post_empty(&format!("{}/{}/{}", BASE_PATH, subscription_id, action))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Method, MockTransport, Response};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_gopay_subscription() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r| {
                r.method == Method::POST
                    && r.path == "/v1/subscriptions"
                    && r.body
                        == Some(json!({
                            "name": "MONTHLY_2024",
                            "amount": "14000",
                            "currency": "IDR",
                            "payment_type": "gopay",
                            "token": "6769fd86-8b7d-4d87-a39f-11d4ca0f2e4c",
                            "schedule": {"interval": 1, "interval_unit": "month", "max_interval": 12},
                            "gopay": {"account_id": "0dd2cd90-a9a9-4a09-b393-c1ad7ae58b3b"}
                        }))
            })
            .times(1)
            .returning(|_| {
                Ok(Response::json(json!({
                    "id": "d98a63b8-97e4-4059-825f-0f62340407e9",
                    "name": "MONTHLY_2024",
                    "status": "active",
                    "schedule": {
                        "interval": 1,
                        "interval_unit": "month",
                        "max_interval": 12,
                        "current_interval": 0,
                        "next_execution_at": "2024-06-14 07:57:39 +0700"
                    },
                    "transaction_ids": []
                })))
            });

        let http = Http::new(Arc::new(transport));
        let rsp = Subscription::new(&http)
            .create(&SubscriptionRequest {
                name: "MONTHLY_2024".into(),
                amount: "14000".into(),
                currency: "IDR".into(),
                payment_type: SubscriptionPaymentType::Gopay,
                token: "6769fd86-8b7d-4d87-a39f-11d4ca0f2e4c".into(),
                schedule: Schedule {
                    interval: 1,
                    interval_unit: IntervalUnit::Month,
                    max_interval: Some(12),
                    start_time: None,
                },
                retry_schedule: None,
                gopay: Some(GopaySubscription {
                    account_id: "0dd2cd90-a9a9-4a09-b393-c1ad7ae58b3b".into(),
                }),
                metadata: None,
                customer_details: None,
            })
            .await
            .unwrap();

        assert_eq!(rsp.status.as_deref(), Some("active"));
        let schedule = rsp.schedule.unwrap();
        assert_eq!(schedule.current_interval, Some(0));
        assert_eq!(schedule.interval_unit, Some(IntervalUnit::Month));
    }

    #[tokio::test]
    async fn test_state_changes_and_update() {
        let mut transport = MockTransport::new();
        for action in ["disable", "enable", "cancel"] {
            let path = format!("/v1/subscriptions/sub-1/{}", action);
            transport
                .expect_send()
                .withf(move |r| r.method == Method::POST && r.path == path && r.body.is_none())
                .times(1)
                .returning(|_| {
                    Ok(Response::json(
                        json!({"status_message": "Subscription is updated."}),
                    ))
                });
        }
        transport
            .expect_send()
            .withf(|r| {
                r.method == Method::PATCH
                    && r.path == "/v1/subscriptions/sub-1"
                    && r.body == Some(json!({"amount": "20000"}))
            })
            .times(1)
            .returning(|_| {
                Ok(Response::json(
                    json!({"status_message": "Subscription is updated."}),
                ))
            });
        transport
            .expect_send()
            .withf(|r| r.method == Method::GET && r.path == "/v1/subscriptions/sub-1")
            .times(1)
            .returning(|_| Ok(Response::json(json!({"id": "sub-1", "status": "inactive"}))));

        let http = Http::new(Arc::new(transport));
        let api = Subscription::new(&http);
        for rsp in [
            api.disable("sub-1").await.unwrap(),
            api.enable("sub-1").await.unwrap(),
            api.cancel("sub-1").await.unwrap(),
        ] {
            assert_eq!(rsp.status_message.as_deref(), Some("Subscription is updated."));
        }

        api.update(
            "sub-1",
            &SubscriptionUpdate {
                amount: Some("20000".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let rsp = api.get("sub-1").await.unwrap();
        assert_eq!(rsp.status.as_deref(), Some("inactive"));
        assert!(rsp.transaction_ids.is_empty());
    }
}
