use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::http::Http;

const BASE_PATH: &str = "/v1/invoices";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvoicePaymentType {
    PaymentLink,
    VirtualAccount,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Expired,
    Overdue,
    Paid,
    Voided,
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct InvoiceCustomer {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InvoiceItem {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub item_id: Option<String>,
    pub description: String,
    pub quantity: u32,
    pub price: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InvoiceAmount {
    pub vat: String,
    pub discount: String,
    pub shipping: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InvoiceVirtualAccount {
    /// `bca_va`, `bni_va`, `bri_va`, `cimb_va`, `permata_va` or `mandiri_bill`.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub number: Option<String>,
}

/// How the invoice is paid. Serialized as `payment_type` plus the matching field.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "payment_type", rename_all = "snake_case")]
pub enum InvoicePayment {
    PaymentLink {
        /// `enabled_payments`, `is_custom_expiry`, `expiry` and channel options.
        payment_link: Map<String, Value>,
    },
    VirtualAccount {
        virtual_accounts: Vec<InvoiceVirtualAccount>,
    },
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct InvoiceRequest {
    pub order_id: String,
    pub invoice_number: String,
    /// `yyyy-MM-dd HH:mm Z`.
    pub due_date: String,
    pub invoice_date: String,
    pub customer_details: InvoiceCustomer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub item_details: Vec<InvoiceItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<InvoiceAmount>,
    #[serde(flatten)]
    pub payment: InvoicePayment,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct InvoiceResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub invoice_date: Option<String>,
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    #[serde(default)]
    pub payment_type: Option<InvoicePaymentType>,
    #[serde(default)]
    pub gross_amount: Option<i64>,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub payment_link_url: Option<String>,
    #[serde(default)]
    pub virtual_accounts: Vec<InvoiceVirtualAccount>,
    #[serde(default)]
    pub customer_details: Option<InvoiceCustomer>,
    #[serde(default)]
    pub item_details: Vec<InvoiceItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VoidInvoiceResponse {
    pub success: bool,
}

pub struct Invoice<'a> {
    http: &'a Http,
}

impl<'a> Invoice<'a> {
    pub(crate) fn new(http: &'a Http) -> Self {
        Self { http }
    }

    #[tracing::instrument(skip(self, body), fields(invoice_number = %body.invoice_number))]
    pub async fn create(&self, body: &InvoiceRequest) -> Result<InvoiceResponse> {
        self.http.post(BASE_PATH, body).await
    }

    pub async fn get(&self, invoice_id: &str) -> Result<InvoiceResponse> {
        self.http.get(&format!("{}/{}", BASE_PATH, invoice_id)).await
    }

    /// Voids an unpaid invoice.
    pub async fn void(&self, invoice_id: &str) -> Result<VoidInvoiceResponse> {
        self.http
            .patch_empty(&format!("{}/{}/void", BASE_PATH, invoice_id))
            .await
    }
}
