use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{self, Display};

use crate::session::SessionToken;

/// The header every enveloped gateway response starts with.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponseStatus {
    /// Whether the gateway accepted the call.
    pub response_code: bool,

    /// The gateway's message, an error description when `response_code` is false.
    pub response_msg: String,
}

/// A response wrapped in the gateway's `{responseCode, responseMsg, ...}` envelope.
pub trait Enveloped {
    fn status(&self) -> &ResponseStatus;
}

// implement `Enveloped` for a list of response types carrying a `status` field.
macro_rules! impl_enveloped {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Enveloped for $t {
                fn status(&self) -> &ResponseStatus {
                    &self.status
                }
            }
        )+
    };
}

/// The login envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LoginResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    pub data: SessionToken,
}

/// A request body sent to the gateway.
///
/// Every operation that carries a body has its own variant.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(untagged)]
pub enum Payload<'a> {
    CustomerRegister(&'a CustomerRegisterRequest),
    CustomerLogin(&'a CustomerLoginRequest),
    CustomerCheck(&'a CustomerCheckRequest),
    GroupCreate(&'a GroupCreateRequest),
    GroupEdit(&'a GroupEditRequest),
    GroupList(&'a GroupListRequest),
    GroupAddBills(&'a GroupAddBillsRequest),
    InvoiceCreate(&'a InvoiceCreateRequest),
    InvoiceTransactionCreate(&'a InvoiceTransactionCreateRequest),
}

// Customer

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRegisterRequest {
    pub user_id: String,
    pub email: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CustomerRegisterResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,

    /// The code the customer uses to sign in to BPay.
    pub data: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerLoginRequest {
    pub user_id: String,
    pub bpay_code: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CustomerLoginResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCheckRequest {
    pub user_id: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CustomerCheckResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,

    /// The code the customer uses to sign in to BPay.
    pub data: String,
}

// Constants

/// An entry of the region, district, sub-district and building hierarchy.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConstantData {
    pub id: i64,
    pub name: String,
}

// Group

#[derive(Clone, Debug, Serialize)]
pub struct GroupCreateRequest {
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GroupCreateResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
}

#[derive(Clone, Debug, Serialize)]
pub struct GroupEditRequest {
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GroupEditResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupListRequest {
    pub page_no: i64,
    pub per_page: i64,
    pub sort: String,
    pub filter: Vec<GroupFilter>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFilter {
    pub field_name: String,
    pub operation: String,
    pub value: String,
    pub field_type: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GroupListResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    pub data: Vec<GroupData>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupData {
    pub id: i64,
    pub name: String,
    pub customer_id: i64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAddBillsRequest {
    pub bill_ids: Vec<i64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GroupAddBillsResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GroupBillsResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    pub data: Vec<BillData>,
}

// Search

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct FindAddressResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    pub data: Vec<AddressData>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AddressData {
    pub name: String,
    pub cid: String,
    pub address: String,
    pub count: i64,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct FindResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    pub data: Vec<FindData>,
}

/// A biller account and its outstanding bills.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FindData {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub total_amount: f64,
    pub provider_id: i64,
    pub bills: Vec<BillData>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BillData {
    pub id: i64,
    pub bill_id: String,

    /// The customer's CID code.
    pub code: String,

    /// The amount due.
    pub bill_amount: f64,

    /// The late fee.
    pub loss_amount: f64,

    /// The invoiced amount.
    pub total_amount: f64,

    /// The amount payable.
    pub paid_amount: f64,

    pub year: i64,
    pub month: i64,
    pub name: String,
    pub org_type_id: i64,
    pub org_name: String,
    pub provider_id: i64,
    pub customer_id: i64,
    pub status_id: i64,
}

// Invoice

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceCreateRequest {
    pub bill_ids: Vec<i64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvoiceResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    pub id: i64,
    pub total_amount: f64,
    pub customer_id: i64,
    pub status_id: i64,
    pub bills: Vec<BillData>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTransactionCreateRequest {
    pub invoice_id: i64,
    pub is_org: bool,

    /// The company register number, when paying as an organization.
    pub vat_info: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct InvoiceTransactionCreateResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    #[serde(rename = "invoiceId")]
    pub invoice_id: String,
    pub qr_text: String,
    pub qr_image: String,
    #[serde(rename = "qPay_shortUrl")]
    pub qpay_short_url: String,
    pub urls: Vec<UrlData>,
}

/// A deep link into a banking app that can pay the transaction.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct UrlData {
    pub name: String,
    pub description: String,
    pub logo: String,
    pub link: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BillCheckResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,

    #[serde(rename = "status")]
    pub status_text: String,
    pub status_code: Option<BillStatus>,
    pub status_system: String,
}

impl_enveloped!(
    LoginResponse,
    CustomerRegisterResponse,
    CustomerLoginResponse,
    CustomerCheckResponse,
    GroupCreateResponse,
    GroupEditResponse,
    GroupListResponse,
    GroupAddBillsResponse,
    GroupBillsResponse,
    FindAddressResponse,
    FindResponse,
    InvoiceResponse,
    InvoiceTransactionCreateResponse,
    BillCheckResponse,
);

/// The state of a bill or invoice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BillStatus {
    New,
    Paid,
    Cancelled,
    Paying,
    ProviderPaid,
    Error,

    /// A code not known to this client.
    Other(i64),
}

impl BillStatus {
    pub fn code(&self) -> i64 {
        match self {
            Self::New => 1000,
            Self::Paid => 1001,
            Self::Cancelled => 1002,
            Self::Paying => 1003,
            Self::ProviderPaid => 1004,
            Self::Error => 1005,
            Self::Other(code) => *code,
        }
    }
}

impl From<i64> for BillStatus {
    fn from(code: i64) -> Self {
        match code {
            1000 => Self::New,
            1001 => Self::Paid,
            1002 => Self::Cancelled,
            1003 => Self::Paying,
            1004 => Self::ProviderPaid,
            1005 => Self::Error,
            other => Self::Other(other),
        }
    }
}

impl<'de> Deserialize<'de> for BillStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::from)
    }
}

impl Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Paid => write!(f, "paid"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Paying => write!(f, "paying"),
            Self::ProviderPaid => write!(f, "provider paid"),
            Self::Error => write!(f, "error"),
            Self::Other(code) => write!(f, "unknown ({code})"),
        }
    }
}
