use serde::{Deserialize, Serialize};

use super::path;
use crate::error::Result;
use crate::http::Http;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Beneficiary {
    pub name: String,
    pub bank: String,
    pub account: String,
    /// Unique alphanumeric handle, also the key for updates.
    pub alias_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BeneficiaryStatus {
    /// `created` or `updated`.
    pub status: String,
}

pub struct Beneficiaries<'a> {
    http: &'a Http,
}

impl<'a> Beneficiaries<'a> {
    pub(crate) fn new(http: &'a Http) -> Self {
        Self { http }
    }

    pub async fn create(&self, beneficiary: &Beneficiary) -> Result<BeneficiaryStatus> {
        self.http.post(&path("/beneficiaries"), beneficiary).await
    }

    pub async fn update(
        &self,
        alias_name: &str,
        beneficiary: &Beneficiary,
    ) -> Result<BeneficiaryStatus> {
        self.http
            .patch(&path(&format!("/beneficiaries/{}", alias_name)), beneficiary)
            .await
    }

    pub async fn list(&self) -> Result<Vec<Beneficiary>> {
        self.http.get(&path("/beneficiaries")).await
    }
}
