//! Core API: charges, transaction actions, card tokens and linked accounts.
//!
//! Subscriptions, payment links and invoices live on the same target and are
//! reached through [`Api::subscription`], [`Api::payment_link`] and [`Api::invoice`].

mod invoice;
mod payment_link;
mod subscription;
mod types;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::http::{Http, Request};

pub use invoice::{
    Invoice, InvoiceAmount, InvoiceCustomer, InvoiceItem, InvoicePayment, InvoicePaymentType,
    InvoiceRequest, InvoiceResponse, InvoiceStatus, InvoiceVirtualAccount, VoidInvoiceResponse,
};
pub use payment_link::{
    Expiry, PaymentLink, PaymentLinkDeleted, PaymentLinkDetails, PaymentLinkRequest,
    PaymentLinkResponse, PaymentLinkTransaction,
};
pub use subscription::{
    GopaySubscription, IntervalUnit, RetryIntervalUnit, RetrySchedule, Schedule, Subscription,
    SubscriptionPaymentType, SubscriptionRequest, SubscriptionResponse, SubscriptionSchedule,
    SubscriptionUpdate,
};
pub use types::{
    Action, Address, Bank, CustomerDetails, FraudStatus, ItemDetails, PaymentType, StatusMessage,
    TransactionDetails, TransactionResponse, TransactionStatus, VaNumber,
};

const API_VERSION: &str = "/v2";

/// Charge responses share the transaction shape; see [`TransactionResponse::channel`].
pub type ChargeResponse = TransactionResponse;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChargeRequest {
    pub payment_type: PaymentType,
    pub transaction_details: TransactionDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_details: Option<Vec<ItemDetails>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_details: Option<CustomerDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_transfer: Option<BankTransfer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echannel: Option<Echannel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cstore: Option<Cstore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_expiry: Option<CustomExpiry>,
    /// Channel options without a typed field (`credit_card`, `gopay`, `qris`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChargeRequest {
    pub fn new(payment_type: PaymentType, order_id: impl Into<String>, gross_amount: i64) -> Self {
        Self {
            payment_type,
            transaction_details: TransactionDetails {
                order_id: order_id.into(),
                gross_amount,
            },
            item_details: None,
            customer_details: None,
            bank_transfer: None,
            echannel: None,
            cstore: None,
            custom_expiry: None,
            extra: Map::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BankTransfer {
    pub bank: Bank,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub va_number: Option<String>,
}

/// Mandiri bill payment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Echannel {
    pub bill_info1: String,
    pub bill_info2: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Cstore {
    pub store: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CustomExpiry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_time: Option<String>,
    pub expiry_duration: u32,
    /// `second`, `minute`, `hour` or `day`.
    pub unit: String,
}

/// Payment instructions of a charge, selected by its `payment_type`.
#[derive(Debug, Clone, PartialEq)]
pub enum ChargeChannel {
    VirtualAccount(Vec<VaNumber>),
    PermataVirtualAccount { va_number: String },
    MandiriBill { bill_key: String, biller_code: String },
    EWallet { actions: Vec<Action> },
    ConvenienceStore { payment_code: String, store: Option<String> },
    Redirect { redirect_url: String },
    Other,
}

impl TransactionResponse {
    /// Picks the channel-specific payment instructions from the response.
    pub fn channel(&self) -> ChargeChannel {
        let channel = match self.payment_type.as_deref() {
            Some("bank_transfer") => self
                .extra_field("permata_va_number")
                .map(|va_number| ChargeChannel::PermataVirtualAccount { va_number })
                .or_else(|| self.extra_field("va_numbers").map(ChargeChannel::VirtualAccount)),
            Some("echannel") => self
                .extra_field::<String>("bill_key")
                .zip(self.extra_field::<String>("biller_code"))
                .map(|(bill_key, biller_code)| ChargeChannel::MandiriBill {
                    bill_key,
                    biller_code,
                }),
            Some("gopay" | "qris" | "shopeepay") => Some(ChargeChannel::EWallet {
                actions: self.extra_field("actions").unwrap_or_default(),
            }),
            Some("cstore") => self.extra_field("payment_code").map(|payment_code| {
                ChargeChannel::ConvenienceStore {
                    payment_code,
                    store: self.extra_field("store"),
                }
            }),
            Some(_) => self
                .extra_field("redirect_url")
                .map(|redirect_url| ChargeChannel::Redirect { redirect_url }),
            None => None,
        };
        channel.unwrap_or(ChargeChannel::Other)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    pub transaction_id: String,
    pub gross_amount: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DirectRefundRequest {
    pub refund_key: String,
    pub amount: i64,
    pub reason: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DirectRefundResponse {
    #[serde(default)]
    pub refund_chargeback_id: Option<i64>,
    #[serde(default)]
    pub refund_amount: Option<String>,
    #[serde(default)]
    pub refund_key: Option<String>,
    #[serde(flatten)]
    pub transaction: TransactionResponse,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct StatusB2bResponse {
    pub status_code: String,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub transactions: Vec<TransactionResponse>,
}

/// Card data to tokenize. The client key is added by [`Api::get_token`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TokenRequest {
    pub card_number: String,
    pub card_exp_month: String,
    pub card_exp_year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_cvv: Option<String>,
    /// Previously saved token, for two-click payments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_one_time_token: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TokenResponse {
    pub status_code: String,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub token_id: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub validation_messages: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RegisterCardRequest {
    pub card_number: String,
    pub card_exp_month: String,
    pub card_exp_year: String,
    /// JSONP callback name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RegisterCardResponse {
    pub status_code: String,
    #[serde(default)]
    pub saved_token_id: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub masked_card: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PointInquiryResponse {
    pub status_code: String,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub transaction_time: Option<String>,
    #[serde(default)]
    pub point_balance_amount: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PayAccountRequest {
    /// Currently only `gopay`.
    pub payment_type: String,
    pub gopay_partner: GopayPartner,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GopayPartner {
    pub phone_number: String,
    pub country_code: String,
    pub redirect_url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PayAccountResponse {
    pub status_code: String,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub account_status: Option<String>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub channel_response_code: Option<String>,
    #[serde(default)]
    pub channel_response_message: Option<String>,
    /// Payment options (GoPay wallet, PayLater) with their tokens.
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct BinResponse {
    #[serde(default)]
    pub data: Option<BinData>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct BinData {
    #[serde(default)]
    pub bin: Option<String>,
    #[serde(default)]
    pub bin_type: Option<String>,
    #[serde(default)]
    pub bin_class: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub bank: Option<String>,
    #[serde(default)]
    pub bank_code: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub registration_required: Option<bool>,
}

#[derive(Serialize)]
struct B2bPage {
    page: u32,
    per_page: u32,
}

#[derive(Serialize)]
struct ClientKey<'a> {
    client_key: &'a str,
}

#[derive(Serialize)]
struct PointInquiryQuery<'a> {
    gross_amount: Option<&'a str>,
}

/// Core API bound to the transaction target.
#[derive(Clone, Copy)]
pub struct Api<'a> {
    http: &'a Http,
}

impl<'a> Api<'a> {
    pub fn new(http: &'a Http) -> Self {
        Self { http }
    }

    pub fn subscription(&self) -> Subscription<'a> {
        Subscription::new(self.http)
    }

    pub fn payment_link(&self) -> PaymentLink<'a> {
        PaymentLink::new(self.http)
    }

    pub fn invoice(&self) -> Invoice<'a> {
        Invoice::new(self.http)
    }

    fn path(&self, path: &str) -> String {
        format!("{}{}", API_VERSION, path)
    }

    /// Adds the client key to a query built from `params`.
    fn with_client_key<Q: Serialize>(&self, path: &str, params: &Q) -> Result<Request> {
        let request = Request::get(self.path(path));
        let request = match self.http.client_key() {
            Some(client_key) => request.query(&ClientKey { client_key })?,
            None => request,
        };
        request.query(params)
    }

    /// Tokenizes card data before it is charged.
    #[tracing::instrument(skip(self, params))]
    pub async fn get_token(&self, params: &TokenRequest) -> Result<TokenResponse> {
        self.http.send(self.with_client_key("/token", params)?).await
    }

    /// Performs a transaction with any supported payment method.
    #[tracing::instrument(skip(self, body), fields(order_id = %body.transaction_details.order_id))]
    pub async fn charge(&self, body: &ChargeRequest) -> Result<ChargeResponse> {
        self.http.post(&self.path("/charge"), body).await
    }

    /// Captures an authorized card transaction.
    pub async fn capture(&self, body: &CaptureRequest) -> Result<TransactionResponse> {
        self.http.post(&self.path("/capture"), body).await
    }

    /// Accepts a transaction flagged as challenge by fraud detection.
    pub async fn approve(&self, order_id: &str) -> Result<TransactionResponse> {
        self.order_action(order_id, "approve").await
    }

    /// Denies a transaction flagged as challenge by fraud detection.
    pub async fn deny(&self, order_id: &str) -> Result<TransactionResponse> {
        self.order_action(order_id, "deny").await
    }

    /// Cancels a transaction; only possible before settlement.
    pub async fn cancel(&self, order_id: &str) -> Result<TransactionResponse> {
        self.order_action(order_id, "cancel").await
    }

    /// Moves a pending transaction to expired.
    pub async fn expire(&self, order_id: &str) -> Result<TransactionResponse> {
        self.order_action(order_id, "expire").await
    }

    /// Moves a settled transaction to refund.
    pub async fn refund(&self, order_id: &str) -> Result<TransactionResponse> {
        self.order_action(order_id, "refund").await
    }

    #[tracing::instrument(skip(self))]
    async fn order_action(&self, order_id: &str, action: &str) -> Result<TransactionResponse> {
        self.http
            .post_empty(&self.path(&format!("/{}/{}", order_id, action)))
            .await
    }

    /// Refunds straight to the customer's bank or payment provider.
    pub async fn direct_refund(
        &self,
        order_id: &str,
        body: &DirectRefundRequest,
    ) -> Result<DirectRefundResponse> {
        self.http
            .post(&self.path(&format!("/{}/refund/online/direct", order_id)), body)
            .await
    }

    /// Transaction status by order ID or transaction ID.
    #[tracing::instrument(skip(self))]
    pub async fn status(&self, order_id: &str) -> Result<TransactionResponse> {
        self.http
            .get(&self.path(&format!("/{}/status", order_id)))
            .await
    }

    /// Status of every B2B transaction related to `order_id`, paged.
    pub async fn status_b2b(
        &self,
        order_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<StatusB2bResponse> {
        self.http
            .get_with_query(
                &self.path(&format!("/{}/status/b2b", order_id)),
                &B2bPage { page, per_page },
            )
            .await
    }

    /// Registers a card for one-click and two-click payments.
    pub async fn register_card(&self, params: &RegisterCardRequest) -> Result<RegisterCardResponse> {
        self.http
            .send(self.with_client_key("/card/register", params)?)
            .await
    }

    /// Card point balance, optionally for a given gross amount.
    pub async fn point_inquiry(
        &self,
        token_id: &str,
        gross_amount: Option<&str>,
    ) -> Result<PointInquiryResponse> {
        self.http
            .get_with_query(
                &self.path(&format!("/point_inquiry/{}", token_id)),
                &PointInquiryQuery { gross_amount },
            )
            .await
    }

    /// Links a customer account (GoPay) for tokenized payments.
    pub async fn create_pay_account(&self, body: &PayAccountRequest) -> Result<PayAccountResponse> {
        self.http.post(&self.path("/pay/account"), body).await
    }

    pub async fn get_pay_account(&self, account_id: &str) -> Result<PayAccountResponse> {
        self.http
            .get(&self.path(&format!("/pay/account/{}", account_id)))
            .await
    }

    pub async fn unbind_pay_account(&self, account_id: &str) -> Result<PayAccountResponse> {
        self.http
            .post_empty(&self.path(&format!("/pay/account/{}/unbind", account_id)))
            .await
    }

    /// Card BIN metadata (brand, issuing bank, country).
    pub async fn bin_metadata(&self, bin: &str) -> Result<BinResponse> {
        self.http.get(&format!("/v1/bins/{}", bin)).await
    }
}
