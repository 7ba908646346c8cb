//! Iris payout API.
//!
//! Every request on this target carries a fresh idempotency key, so retried
//! payouts are not executed twice.

mod aggregator;
mod beneficiary;
mod facilitator;
mod payout;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::http::Http;

pub use aggregator::{Aggregator, AggregatorChannel};
pub use beneficiary::{Beneficiaries, Beneficiary, BeneficiaryStatus};
pub use facilitator::{BankAccount, BankAccountStatus, Facilitator};
pub use payout::{
    ApprovePayouts, CreatedPayout, CreatedPayouts, Payout, PayoutDetails, PayoutStatus, Payouts,
    RejectPayouts, UpdatedPayouts,
};

const API_PREFIX: &str = "/iris/api/v1";

pub(crate) fn path(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Balance {
    pub balance: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AccountValidation {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub account_no: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SupportedBanks {
    #[serde(default, alias = "banks")]
    pub beneficiary_banks: Vec<SupportedBank>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SupportedBank {
    pub code: String,
    pub name: String,
}

#[derive(Serialize)]
struct AccountQuery<'a> {
    bank: &'a str,
    account: &'a str,
}

#[derive(Clone, Copy)]
pub struct Api<'a> {
    http: &'a Http,
}

impl<'a> Api<'a> {
    pub fn new(http: &'a Http) -> Self {
        Self { http }
    }

    pub fn payout(&self) -> Payouts<'a> {
        Payouts::new(self.http)
    }

    pub fn beneficiary(&self) -> Beneficiaries<'a> {
        Beneficiaries::new(self.http)
    }

    pub fn facilitator(&self) -> Facilitator<'a> {
        Facilitator::new(self.http)
    }

    pub fn aggregator(&self) -> Aggregator<'a> {
        Aggregator::new(self.http)
    }

    /// Connectivity check; answers `pong` as plain text.
    #[tracing::instrument(skip(self))]
    pub async fn ping(&self) -> Result<String> {
        self.http.get("/iris/ping").await
    }

    /// Looks up the holder name of a bank account.
    pub async fn account_validation(&self, bank: &str, account: &str) -> Result<AccountValidation> {
        self.http
            .get_with_query(&path("/account_validation"), &AccountQuery { bank, account })
            .await
    }

    pub async fn supported_banks(&self) -> Result<SupportedBanks> {
        self.http.get(&path("/beneficiary_banks")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Method, MockTransport, Response};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_ping_returns_text() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r| r.method == Method::GET && r.path == "/iris/ping")
            .times(1)
            .returning(|_| Ok(Response::text("pong")));

        let http = Http::new(Arc::new(transport));
        assert_eq!(Api::new(&http).ping().await.unwrap(), "pong");
    }

    #[tokio::test]
    async fn test_account_validation_query() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r| {
                r.path == "/iris/api/v1/account_validation"
                    && r.query.len() == 2
                    && r.query.contains(&("bank".into(), "danamon".into()))
                    && r.query.contains(&("account".into(), "000001137298".into()))
            })
            .times(1)
            .returning(|_| {
                Ok(Response::json(json!({
                    "id": "c9e3",
                    "account_name": "Test Account",
                    "account_no": "000001137298",
                    "bank_name": "danamon"
                })))
            });

        let http = Http::new(Arc::new(transport));
        let rsp = Api::new(&http)
            .account_validation("danamon", "000001137298")
            .await
            .unwrap();
        assert_eq!(rsp.account_name.as_deref(), Some("Test Account"));
    }

    #[tokio::test]
    async fn test_supported_banks_accepts_either_key() {
        for (body, code) in [
            (json!({"beneficiary_banks": [{"code": "bca", "name": "Bank Central Asia"}]}), "bca"),
            (json!({"banks": [{"code": "bni", "name": "Bank Negara Indonesia"}]}), "bni"),
        ] {
            let mut transport = MockTransport::new();
            transport
                .expect_send()
                .withf(|r| r.path == "/iris/api/v1/beneficiary_banks")
                .times(1)
                .returning(move |_| Ok(Response::json(body.clone())));

            let http = Http::new(Arc::new(transport));
            let banks = Api::new(&http).supported_banks().await.unwrap();
            assert_eq!(banks.beneficiary_banks[0].code, code);
        }
    }
}
