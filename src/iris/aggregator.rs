use serde::{Deserialize, Serialize};

use super::{Balance, path};
use crate::error::Result;
use crate::http::Http;

/// A top-up channel of the aggregator balance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AggregatorChannel {
    pub id: i64,
    pub virtual_account_type: String,
    pub virtual_account_number: String,
}

pub struct Aggregator<'a> {
    http: &'a Http,
}

impl<'a> Aggregator<'a> {
    pub(crate) fn new(http: &'a Http) -> Self {
        Self { http }
    }

    pub async fn balance(&self) -> Result<Balance> {
        self.http.get(&path("/balance")).await
    }

    pub async fn channels(&self) -> Result<Vec<AggregatorChannel>> {
        self.http.get(&path("/channels")).await
    }
}
