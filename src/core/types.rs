use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    BankTransfer,
    Echannel,
    CreditCard,
    Gopay,
    Shopeepay,
    Qris,
    Cstore,
    Akulaku,
    Kredivo,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Bank {
    Bca,
    Bni,
    Bri,
    Cimb,
    Permata,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Capture,
    Settlement,
    Deny,
    Cancel,
    Expire,
    Failure,
    Refund,
    Chargeback,
    PartialRefund,
    PartialChargeback,
    Authorize,
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FraudStatus {
    Accept,
    Deny,
    Challenge,
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TransactionDetails {
    pub order_id: String,
    pub gross_amount: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ItemDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub price: i64,
    pub quantity: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CustomerDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,
}

/// A follow-up action returned for e-wallet and account linking flows.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Action {
    pub name: String,
    pub method: String,
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VaNumber {
    pub bank: String,
    pub va_number: String,
}

/// Common shape of transaction responses (charge, status, actions).
///
/// Only `status_code` is guaranteed: failures reported on HTTP 200 carry
/// little else. Channel-specific fields stay in `extra`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TransactionResponse {
    pub status_code: String,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub merchant_id: Option<String>,
    #[serde(default)]
    pub gross_amount: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub transaction_time: Option<String>,
    #[serde(default)]
    pub transaction_status: Option<TransactionStatus>,
    #[serde(default)]
    pub fraud_status: Option<FraudStatus>,
    #[serde(default)]
    pub approval_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TransactionResponse {
    /// Embedded status code below 300.
    pub fn is_success(&self) -> bool {
        self.status_code
            .trim()
            .parse::<u16>()
            .is_ok_and(|code| code < 300)
    }

    /// Decodes one of the fields kept in `extra`.
    pub fn extra_field<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        T::deserialize(self.extra.get(key)?).ok()
    }
}

/// Minimal acknowledgement returned by update style endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct StatusMessage {
    #[serde(default)]
    pub status_code: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transaction_response_tolerates_error_body() {
        let rsp: TransactionResponse = serde_json::from_value(json!({
            "status_code": "404",
            "status_message": "Transaction doesn't exist.",
            "id": "a1b2"
        }))
        .unwrap();

        assert!(!rsp.is_success());
        assert_eq!(rsp.transaction_status, None);
        assert_eq!(rsp.extra["id"], "a1b2");
    }

    #[test]
    fn test_unknown_transaction_status() {
        let rsp: TransactionResponse = serde_json::from_value(json!({
            "status_code": "201",
            "transaction_status": "brand_new_state",
            "fraud_status": "accept"
        }))
        .unwrap();

        assert!(rsp.is_success());
        assert_eq!(rsp.transaction_status, Some(TransactionStatus::Unknown));
        assert_eq!(rsp.fraud_status, Some(FraudStatus::Accept));
    }

    #[test]
    fn test_item_details_skip_empty_fields() {
        let item = ItemDetails {
            price: 10000,
            quantity: 2,
            name: "Midtrans Tshirt".into(),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"price": 10000, "quantity": 2, "name": "Midtrans Tshirt"})
        );
    }
}
