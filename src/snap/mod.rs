//! Snap checkout API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::{CustomerDetails, ItemDetails, TransactionDetails};
use crate::error::Result;
use crate::http::Http;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SnapRequest {
    pub transaction_details: TransactionDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_details: Option<Vec<ItemDetails>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_details: Option<CustomerDetails>,
    /// Restricts the payment methods shown on the checkout page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_payments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callbacks: Option<Callbacks>,
    /// Channel options (`credit_card`, `bca_va`, `gopay`, `expiry`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SnapRequest {
    pub fn new(order_id: impl Into<String>, gross_amount: i64) -> Self {
        Self {
            transaction_details: TransactionDetails {
                order_id: order_id.into(),
                gross_amount,
            },
            item_details: None,
            customer_details: None,
            enabled_payments: None,
            callbacks: None,
            extra: Map::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Callbacks {
    pub finish: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SnapResponse {
    /// Token for the Snap.js popup.
    pub token: String,
    pub redirect_url: String,
}

#[derive(Clone, Copy)]
pub struct Api<'a> {
    http: &'a Http,
}

impl<'a> Api<'a> {
    pub fn new(http: &'a Http) -> Self {
        Self { http }
    }

    /// Creates a checkout session.
    #[tracing::instrument(skip(self, body), fields(order_id = %body.transaction_details.order_id))]
    pub async fn create_transaction(&self, body: &SnapRequest) -> Result<SnapResponse> {
        self.http.post("/snap/v1/transactions", body).await
    }
}
