use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::path;
use crate::error::Result;
use crate::http::Http;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    Queued,
    Processed,
    Completed,
    Failed,
    Approved,
    Rejected,
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Payout {
    pub beneficiary_name: String,
    pub beneficiary_account: String,
    pub beneficiary_bank: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub beneficiary_email: Option<String>,
    /// Decimal string, e.g. `"100000.00"`.
    pub amount: String,
    pub notes: String,
    /// Facilitator only: source bank account.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bank_account_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreatedPayout {
    pub status: PayoutStatus,
    pub reference_no: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CreatedPayouts {
    #[serde(default)]
    pub payouts: Vec<CreatedPayout>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ApprovePayouts {
    pub reference_nos: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RejectPayouts {
    pub reference_nos: Vec<String>,
    pub reject_reason: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UpdatedPayouts {
    pub status: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PayoutDetails {
    #[serde(default)]
    pub reference_no: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub beneficiary_name: Option<String>,
    #[serde(default)]
    pub beneficiary_account: Option<String>,
    #[serde(default)]
    pub beneficiary_email: Option<String>,
    #[serde(default)]
    pub bank: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<PayoutStatus>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize)]
struct CreateBody<'a> {
    payouts: &'a [Payout],
}

pub struct Payouts<'a> {
    http: &'a Http,
}

impl<'a> Payouts<'a> {
    pub(crate) fn new(http: &'a Http) -> Self {
        Self { http }
    }

    /// Queues one or more disbursements.
    #[tracing::instrument(skip(self, payouts), fields(count = payouts.len()))]
    pub async fn create(&self, payouts: &[Payout]) -> Result<CreatedPayouts> {
        self.http
            .post(&path("/payouts"), &CreateBody { payouts })
            .await
    }

    pub async fn approve(&self, body: &ApprovePayouts) -> Result<UpdatedPayouts> {
        self.http.patch(&path("/payouts/approve"), body).await
    }

    pub async fn reject(&self, body: &RejectPayouts) -> Result<UpdatedPayouts> {
        self.http.patch(&path("/payouts/reject"), body).await
    }

    pub async fn get(&self, reference_no: &str) -> Result<PayoutDetails> {
        self.http
            .get(&path(&format!("/payouts/{}", reference_no)))
            .await
    }
}
