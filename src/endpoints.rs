//! The gateway's endpoint table.

use reqwest::{Method, Url};

use crate::error::BpayError;

/// How an endpoint's arguments are appended to its url template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuffixKind {
    /// The template is used as is.
    None,

    /// Appends this many path segments after the template's trailing slash.
    Path(usize),

    /// Appends a query string with one value per key, in order.
    Query(&'static [&'static str]),
}

impl SuffixKind {
    fn arity(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Path(count) => *count,
            Self::Query(keys) => keys.len(),
        }
    }
}

/// A gateway endpoint.
#[derive(Clone, Debug)]
pub struct Endpoint {
    /// A name used in logs and errors.
    pub name: &'static str,

    /// The url template, relative to the gateway's base url.
    pub path: &'static str,

    /// The Http verb.
    pub method: Method,

    /// The shape of the url suffix.
    pub suffix: SuffixKind,
}

impl Endpoint {
    const fn new(name: &'static str, path: &'static str, method: Method, suffix: SuffixKind) -> Self {
        Self { name, path, method, suffix }
    }

    /// Build the full url for this endpoint given the suffix arguments.
    pub fn url<S: AsRef<str>>(&self, base_url: &str, args: &[S]) -> Result<Url, BpayError> {
        let expected = self.suffix.arity();
        if args.len() != expected {
            return Err(BpayError::Suffix { endpoint: self.name, expected, got: args.len() });
        }

        let path = self.path;
        let mut url = Url::parse(&format!("{base_url}{path}"))?;
        match self.suffix {
            SuffixKind::None => {}
            SuffixKind::Path(_) => {
                let mut segments =
                    url.path_segments_mut().map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
                segments.pop_if_empty();
                for arg in args {
                    segments.push(arg.as_ref());
                }
            }
            SuffixKind::Query(keys) => {
                let mut query = url.query_pairs_mut();
                for (key, value) in keys.iter().zip(args) {
                    query.append_pair(key, value.as_ref());
                }
            }
        }
        Ok(url)
    }
}

pub const LOGIN: Endpoint =
    Endpoint::new("login", "/users/api/v1/user/oauth/token", Method::POST, SuffixKind::None);

// Customer
pub const CUSTOMER_REGISTER: Endpoint =
    Endpoint::new("customer_register", "/payment/api/v1/customer/register", Method::POST, SuffixKind::None);
pub const CUSTOMER_LOGIN: Endpoint =
    Endpoint::new("customer_login", "/payment/api/v1/customer/login", Method::POST, SuffixKind::None);
pub const CUSTOMER_CHECK: Endpoint =
    Endpoint::new("customer_check", "/payment/api/v1/customer/check", Method::POST, SuffixKind::None);

// Group
pub const GROUP_CREATE: Endpoint =
    Endpoint::new("group_create", "/payment/api/v1/group/create", Method::POST, SuffixKind::None);
pub const GROUP_EDIT: Endpoint =
    Endpoint::new("group_edit", "/payment/api/v1/group/update/", Method::POST, SuffixKind::Path(1));
pub const GROUP_LIST: Endpoint =
    Endpoint::new("group_list", "/payment/api/v1/group/list", Method::POST, SuffixKind::None);
pub const GROUP_ADD_BILLS: Endpoint =
    Endpoint::new("group_add_bills", "/payment/api/v1/group/add/bills/", Method::POST, SuffixKind::Path(1));
pub const GROUP_BILLS: Endpoint =
    Endpoint::new("group_bills", "/payment/api/v1/group/bills/", Method::GET, SuffixKind::Path(1));

// Constants
pub const CONSTANT_AIMAG_HOT: Endpoint =
    Endpoint::new("constant_aimag_hot", "/constant/Constant/aimaghot", Method::GET, SuffixKind::None);
pub const CONSTANT_SUM_DUUREG: Endpoint =
    Endpoint::new("constant_sum_duureg", "/constant/Constant/sumDuureg/", Method::GET, SuffixKind::Path(1));
pub const CONSTANT_BAG_KHOROO: Endpoint =
    Endpoint::new("constant_bag_khoroo", "/constant/Constant/khoroo/", Method::GET, SuffixKind::Path(2));
pub const CONSTANT_BAIR: Endpoint =
    Endpoint::new("constant_bair", "/constant/Constant/bair/", Method::GET, SuffixKind::Path(3));

// Search
pub const FIND_ADDRESS: Endpoint = Endpoint::new(
    "find_address",
    "/search/api/v1/Search/FindAddress",
    Method::GET,
    SuffixKind::Query(&["AimagId", "SumId", "KhorooId", "BairNum", "XaalgaNum"]),
);
pub const FIND_CID: Endpoint =
    Endpoint::new("find_cid", "/search/api/v1/Search/FindCid", Method::GET, SuffixKind::Query(&["Cid"]));
pub const FIND_ELECTRIC: Endpoint =
    Endpoint::new("find_electric", "/search/api/v1/Search/FindElictric", Method::GET, SuffixKind::Query(&["UserId"]));
pub const FIND_UNIVISION: Endpoint =
    Endpoint::new("find_univision", "/search/api/v1/Search/FindUnivision", Method::GET, SuffixKind::Query(&["Custno"]));
pub const FIND_SKYMEDIA: Endpoint = Endpoint::new(
    "find_skymedia",
    "/search/api/v1/Search/FindSkymedia",
    Method::GET,
    SuffixKind::Query(&["BillerUserId"]),
);
pub const FIND_ONLINE_BILLER: Endpoint = Endpoint::new(
    "find_online_biller",
    "/search/api/v1/Search/FindOnlineBiller",
    Method::GET,
    SuffixKind::Query(&["BillerUserId"]),
);

// Invoice
pub const INVOICE_CREATE: Endpoint =
    Endpoint::new("invoice_create", "/payment/api/v1/invoice/create", Method::POST, SuffixKind::None);
pub const INVOICE_GROUP_CREATE: Endpoint =
    Endpoint::new("invoice_group_create", "/payment/api/v1/invoice/group/create/", Method::GET, SuffixKind::Path(1));
pub const INVOICE_TRANSACTION_CREATE: Endpoint = Endpoint::new(
    "invoice_transaction_create",
    "/payment/api/v1/invoice/transaction/create",
    Method::POST,
    SuffixKind::None,
);
pub const BILL_CHECK: Endpoint =
    Endpoint::new("bill_check", "/payment/api/v1/merchant/bill/check/", Method::POST, SuffixKind::Path(1));
