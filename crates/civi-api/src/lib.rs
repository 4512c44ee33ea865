//! # civi-api
//!
//! Boundary to the external CRM API.
//!
//! Every CRM interaction has the shape `entity.action(params) -> {is_error,
//! values[]}`. [`CrmApi`] is that call as a trait; [`CrmClient`] implements it
//! over the CRM REST endpoint. Callers build an [`ApiRequest`], call, and get
//! back an [`ApiResponse`] whose `is_error` flag has already been turned into
//! an [`ApiError`].

mod client;
mod error;
mod http;
mod request;
mod response;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use client::CrmClient;
pub use error::ApiError;
pub use request::ApiRequest;
pub use response::{ApiResponse, as_i64_lenient, as_u64_lenient};

use async_trait::async_trait;

/// A request/response call against the CRM.
#[async_trait]
pub trait CrmApi: Send + Sync {
    /// Perform one `entity.action(params)` call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, an
    /// `is_error` envelope, or an unparseable body.
    async fn call(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}
