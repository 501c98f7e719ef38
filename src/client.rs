use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::warn;

pub use crate::{
    config::ClientConfig,
    endpoints::Endpoint,
    error::{AuthError, BpayError},
    models::{
        AddressData, BillCheckResponse, BillData, BillStatus, ConstantData, CustomerCheckRequest,
        CustomerCheckResponse, CustomerLoginRequest, CustomerLoginResponse, CustomerRegisterRequest,
        CustomerRegisterResponse, Enveloped, FindAddressResponse, FindResponse, GroupAddBillsRequest,
        GroupAddBillsResponse, GroupBillsResponse, GroupCreateRequest, GroupCreateResponse, GroupEditRequest,
        GroupEditResponse, GroupListRequest, GroupListResponse, InvoiceCreateRequest, InvoiceResponse,
        InvoiceTransactionCreateRequest, InvoiceTransactionCreateResponse, Payload,
    },
    session::SessionToken,
};
use crate::{endpoints, engine::Engine};

/// A numeric customer id, forwarded in the `userId` header. Zero means none.
pub type CustomerId = i64;

/// An interface to the BPay payment gateway.
#[async_trait]
pub trait BpayClient {
    /// Register a customer with BPay.
    async fn customer_register(&self, request: &CustomerRegisterRequest)
        -> Result<CustomerRegisterResponse, BpayError>;

    /// Sign a customer in with their BPay code.
    async fn customer_login(&self, request: &CustomerLoginRequest) -> Result<CustomerLoginResponse, BpayError>;

    /// Check whether a customer is registered.
    async fn customer_check(&self, request: &CustomerCheckRequest) -> Result<CustomerCheckResponse, BpayError>;

    /// Create a billing group.
    async fn group_create(
        &self,
        request: &GroupCreateRequest,
        customer_id: CustomerId,
    ) -> Result<GroupCreateResponse, BpayError>;

    /// Rename a billing group.
    async fn group_edit(
        &self,
        request: &GroupEditRequest,
        group_id: &str,
        customer_id: CustomerId,
    ) -> Result<GroupEditResponse, BpayError>;

    /// List a customer's billing groups.
    async fn group_list(
        &self,
        request: &GroupListRequest,
        customer_id: CustomerId,
    ) -> Result<GroupListResponse, BpayError>;

    /// Add bills to a billing group.
    async fn group_add_bills(
        &self,
        request: &GroupAddBillsRequest,
        group_id: &str,
        customer_id: CustomerId,
    ) -> Result<GroupAddBillsResponse, BpayError>;

    /// List the bills in a billing group.
    async fn group_bills(&self, group_id: &str, customer_id: CustomerId) -> Result<GroupBillsResponse, BpayError>;

    /// List the regions (aimag/hot).
    async fn constant_aimag_hot(&self) -> Result<Vec<ConstantData>, BpayError>;

    /// List the districts (sum/duureg) of a region.
    async fn constant_sum_duureg(&self, aimag_hot_id: i64) -> Result<Vec<ConstantData>, BpayError>;

    /// List the sub-districts (bag/khoroo) of a district.
    async fn constant_bag_khoroo(&self, aimag_hot_id: i64, sum_duureg_id: i64)
        -> Result<Vec<ConstantData>, BpayError>;

    /// List the buildings (bair) of a sub-district.
    async fn constant_bair(
        &self,
        aimag_hot_id: i64,
        sum_duureg_id: i64,
        bag_khoroo_id: i64,
    ) -> Result<Vec<ConstantData>, BpayError>;

    /// Find the utility accounts registered at an apartment.
    async fn find_address(
        &self,
        address: &AddressQuery,
        customer_id: CustomerId,
    ) -> Result<FindAddressResponse, BpayError>;

    /// Find bills by CID code.
    async fn find_cid(&self, cid: &str, customer_id: CustomerId) -> Result<FindResponse, BpayError>;

    /// Find electricity bills by account number.
    async fn find_electric(&self, user_id: &str, customer_id: CustomerId) -> Result<FindResponse, BpayError>;

    /// Find Univision bills by customer number.
    async fn find_univision(&self, cust_no: &str, customer_id: CustomerId) -> Result<FindResponse, BpayError>;

    /// Find Skymedia bills by biller user id.
    async fn find_skymedia(&self, biller_user_id: &str, customer_id: CustomerId) -> Result<FindResponse, BpayError>;

    /// Find online biller bills by biller user id.
    async fn find_online_biller(
        &self,
        biller_user_id: &str,
        customer_id: CustomerId,
    ) -> Result<FindResponse, BpayError>;

    /// Create an invoice for a set of bills.
    async fn invoice_create(
        &self,
        request: &InvoiceCreateRequest,
        customer_id: CustomerId,
    ) -> Result<InvoiceResponse, BpayError>;

    /// Create an invoice for every bill in a group.
    async fn invoice_group_create(&self, group_id: &str, customer_id: CustomerId)
        -> Result<InvoiceResponse, BpayError>;

    /// Create a payment transaction for an invoice, producing a QR code and bank app links.
    async fn invoice_transaction_create(
        &self,
        request: &InvoiceTransactionCreateRequest,
        customer_id: CustomerId,
    ) -> Result<InvoiceTransactionCreateResponse, BpayError>;

    /// Check the payment status of an invoice.
    async fn bill_check(&self, invoice_id: &str) -> Result<BillCheckResponse, BpayError>;
}

/// An apartment's location in the address hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressQuery {
    pub aimag_id: i64,
    pub sum_id: i64,
    pub khoroo_id: i64,
    pub bair_num: i64,
    pub haalga_num: i64,
}

/// The default BPay client that hits the actual gateway.
pub struct DefaultBpayClient {
    engine: Engine,
}

impl DefaultBpayClient {
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        Self::with_config(ClientConfig::new(endpoint, username, password))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, reqwest::Error> {
        Ok(Self { engine: Engine::new(config)? })
    }

    /// The session token currently cached, if any call has authenticated yet.
    pub async fn session(&self) -> Option<SessionToken> {
        self.engine.session().await
    }

    /// Log in now, replacing any cached token.
    pub async fn authenticate(&self) -> Result<SessionToken, AuthError> {
        self.engine.authenticate().await
    }

    async fn call<O>(
        &self,
        endpoint: Endpoint,
        args: &[String],
        payload: Option<Payload<'_>>,
        customer_id: CustomerId,
    ) -> Result<O, BpayError>
    where
        O: DeserializeOwned + Enveloped + Send,
    {
        let url = endpoint.url(self.engine.base_url(), args)?;
        let body = self.engine.execute(&endpoint, url, payload, customer_id).await?;
        let response: O = serde_json::from_slice(&body).map_err(BpayError::Decode)?;
        let status = response.status();
        if !status.response_code {
            warn!("{} failed: {}", endpoint.name, status.response_msg);
            return Err(BpayError::Gateway(status.response_msg.clone()));
        }
        Ok(response)
    }

    async fn constants(&self, endpoint: Endpoint, args: &[String]) -> Result<Vec<ConstantData>, BpayError> {
        let url = endpoint.url(self.engine.base_url(), args)?;
        let body = self.engine.execute(&endpoint, url, None, 0).await?;
        serde_json::from_slice(&body).map_err(BpayError::Decode)
    }
}

#[async_trait]
impl BpayClient for DefaultBpayClient {
    async fn customer_register(
        &self,
        request: &CustomerRegisterRequest,
    ) -> Result<CustomerRegisterResponse, BpayError> {
        self.call(endpoints::CUSTOMER_REGISTER, &[], Some(Payload::CustomerRegister(request)), 0).await
    }

    async fn customer_login(&self, request: &CustomerLoginRequest) -> Result<CustomerLoginResponse, BpayError> {
        self.call(endpoints::CUSTOMER_LOGIN, &[], Some(Payload::CustomerLogin(request)), 0).await
    }

    async fn customer_check(&self, request: &CustomerCheckRequest) -> Result<CustomerCheckResponse, BpayError> {
        self.call(endpoints::CUSTOMER_CHECK, &[], Some(Payload::CustomerCheck(request)), 0).await
    }

    async fn group_create(
        &self,
        request: &GroupCreateRequest,
        customer_id: CustomerId,
    ) -> Result<GroupCreateResponse, BpayError> {
        self.call(endpoints::GROUP_CREATE, &[], Some(Payload::GroupCreate(request)), customer_id).await
    }

    async fn group_edit(
        &self,
        request: &GroupEditRequest,
        group_id: &str,
        customer_id: CustomerId,
    ) -> Result<GroupEditResponse, BpayError> {
        let args = [group_id.to_string()];
        self.call(endpoints::GROUP_EDIT, &args, Some(Payload::GroupEdit(request)), customer_id).await
    }

    async fn group_list(
        &self,
        request: &GroupListRequest,
        customer_id: CustomerId,
    ) -> Result<GroupListResponse, BpayError> {
        self.call(endpoints::GROUP_LIST, &[], Some(Payload::GroupList(request)), customer_id).await
    }

    async fn group_add_bills(
        &self,
        request: &GroupAddBillsRequest,
        group_id: &str,
        customer_id: CustomerId,
    ) -> Result<GroupAddBillsResponse, BpayError> {
        let args = [group_id.to_string()];
        self.call(endpoints::GROUP_ADD_BILLS, &args, Some(Payload::GroupAddBills(request)), customer_id).await
    }

    async fn group_bills(&self, group_id: &str, customer_id: CustomerId) -> Result<GroupBillsResponse, BpayError> {
        let args = [group_id.to_string()];
        self.call(endpoints::GROUP_BILLS, &args, None, customer_id).await
    }

    async fn constant_aimag_hot(&self) -> Result<Vec<ConstantData>, BpayError> {
        self.constants(endpoints::CONSTANT_AIMAG_HOT, &[]).await
    }

    async fn constant_sum_duureg(&self, aimag_hot_id: i64) -> Result<Vec<ConstantData>, BpayError> {
        let args = [aimag_hot_id.to_string()];
        self.constants(endpoints::CONSTANT_SUM_DUUREG, &args).await
    }

    async fn constant_bag_khoroo(
        &self,
        aimag_hot_id: i64,
        sum_duureg_id: i64,
    ) -> Result<Vec<ConstantData>, BpayError> {
        let args = [aimag_hot_id.to_string(), sum_duureg_id.to_string()];
        self.constants(endpoints::CONSTANT_BAG_KHOROO, &args).await
    }

    async fn constant_bair(
        &self,
        aimag_hot_id: i64,
        sum_duureg_id: i64,
        bag_khoroo_id: i64,
    ) -> Result<Vec<ConstantData>, BpayError> {
        let args = [aimag_hot_id.to_string(), sum_duureg_id.to_string(), bag_khoroo_id.to_string()];
        self.constants(endpoints::CONSTANT_BAIR, &args).await
    }

    async fn find_address(
        &self,
        address: &AddressQuery,
        customer_id: CustomerId,
    ) -> Result<FindAddressResponse, BpayError> {
        let AddressQuery { aimag_id, sum_id, khoroo_id, bair_num, haalga_num } = *address;
        let args = [aimag_id, sum_id, khoroo_id, bair_num, haalga_num].map(|value| value.to_string());
        self.call(endpoints::FIND_ADDRESS, &args, None, customer_id).await
    }

    async fn find_cid(&self, cid: &str, customer_id: CustomerId) -> Result<FindResponse, BpayError> {
        self.call(endpoints::FIND_CID, &[cid.to_string()], None, customer_id).await
    }

    async fn find_electric(&self, user_id: &str, customer_id: CustomerId) -> Result<FindResponse, BpayError> {
        self.call(endpoints::FIND_ELECTRIC, &[user_id.to_string()], None, customer_id).await
    }

    async fn find_univision(&self, cust_no: &str, customer_id: CustomerId) -> Result<FindResponse, BpayError> {
        self.call(endpoints::FIND_UNIVISION, &[cust_no.to_string()], None, customer_id).await
    }

    async fn find_skymedia(&self, biller_user_id: &str, customer_id: CustomerId) -> Result<FindResponse, BpayError> {
        self.call(endpoints::FIND_SKYMEDIA, &[biller_user_id.to_string()], None, customer_id).await
    }

    async fn find_online_biller(
        &self,
        biller_user_id: &str,
        customer_id: CustomerId,
    ) -> Result<FindResponse, BpayError> {
        self.call(endpoints::FIND_ONLINE_BILLER, &[biller_user_id.to_string()], None, customer_id).await
    }

    async fn invoice_create(
        &self,
        request: &InvoiceCreateRequest,
        customer_id: CustomerId,
    ) -> Result<InvoiceResponse, BpayError> {
        self.call(endpoints::INVOICE_CREATE, &[], Some(Payload::InvoiceCreate(request)), customer_id).await
    }

    async fn invoice_group_create(
        &self,
        group_id: &str,
        customer_id: CustomerId,
    ) -> Result<InvoiceResponse, BpayError> {
        let args = [group_id.to_string()];
        self.call(endpoints::INVOICE_GROUP_CREATE, &args, None, customer_id).await
    }

    async fn invoice_transaction_create(
        &self,
        request: &InvoiceTransactionCreateRequest,
        customer_id: CustomerId,
    ) -> Result<InvoiceTransactionCreateResponse, BpayError> {
        let payload = Payload::InvoiceTransactionCreate(request);
        self.call(endpoints::INVOICE_TRANSACTION_CREATE, &[], Some(payload), customer_id).await
    }

    async fn bill_check(&self, invoice_id: &str) -> Result<BillCheckResponse, BpayError> {
        let args = [invoice_id.to_string()];
        self.call(endpoints::BILL_CHECK, &args, None, 0).await
    }
}
