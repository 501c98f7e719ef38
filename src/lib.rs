//! A Rust client for the [BPay](https://bpay.mn) bill payment gateway.
//!
//! The client handles customer registration, billing groups, address and bill
//! lookups, invoices and payment status checks. Authentication is managed
//! internally: the first call logs in with the account credentials, and the
//! access token is reused until it comes within 12 hours of its expiry.
//!
//! # Getting Started
//!
//! The primary entry point is the [`BpayClient`] trait and its default
//! implementation, [`DefaultBpayClient`].
//!
//! ## Example: Invoicing a Customer's Bills
//!
//! ```no_run
//! use bpay_client::{
//!     client::{BpayClient, DefaultBpayClient},
//!     models::{InvoiceCreateRequest, InvoiceTransactionCreateRequest},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DefaultBpayClient::new("https://api.bpay.mn", "merchant", "secret")?;
//!     let customer_id = 42;
//!
//!     // 1. Look up the bills attached to a CID code
//!     let found = client.find_cid("1234567", customer_id).await?;
//!     let bill_ids = found.data.iter().flat_map(|account| &account.bills).map(|bill| bill.id).collect();
//!
//!     // 2. Invoice them and open a payment transaction
//!     let invoice = client.invoice_create(&InvoiceCreateRequest { bill_ids }, customer_id).await?;
//!     let request = InvoiceTransactionCreateRequest { invoice_id: invoice.id, is_org: false, vat_info: String::new() };
//!     let transaction = client.invoice_transaction_create(&request, customer_id).await?;
//!     println!("Pay with: {}", transaction.qpay_short_url);
//!
//!     // 3. Check whether it was paid
//!     let status = client.bill_check(&transaction.invoice_id).await?;
//!     println!("Invoice status: {}", status.status_text);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod endpoints;
mod engine;
pub mod error;
pub mod models;
pub mod session;

pub use client::{AddressQuery, BpayClient, CustomerId, DefaultBpayClient};
pub use config::ClientConfig;
pub use error::{AuthError, BpayError, ConfigError};
pub use models::{BillStatus, ConstantData, ResponseStatus};
pub use session::SessionToken;
