use serde::{Deserialize, Serialize};

use super::{Balance, path};
use crate::error::Result;
use crate::http::Http;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BankAccountStatus {
    InProgress,
    Live,
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BankAccount {
    pub bank_account_id: String,
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
    pub status: BankAccountStatus,
}

/// Payouts from the merchant's own bank accounts.
pub struct Facilitator<'a> {
    http: &'a Http,
}

impl<'a> Facilitator<'a> {
    pub(crate) fn new(http: &'a Http) -> Self {
        Self { http }
    }

    pub async fn balance(&self, bank_account_id: &str) -> Result<Balance> {
        self.http
            .get(&path(&format!("/bank_accounts/{}/balance", bank_account_id)))
            .await
    }

    pub async fn bank_accounts(&self) -> Result<Vec<BankAccount>> {
        self.http.get(&path("/bank_accounts")).await
    }
}
