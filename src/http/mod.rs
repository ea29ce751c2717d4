//! HTTP plumbing shared by every upstream integration.
//!
//! Requests are described by [`EndpointRequest`] and every call resolves to a
//! [`FetchResult`], so the layers above decide how to degrade instead of
//! handling transport errors.

mod client;
mod fetch_result;
mod request;

pub use client::{Authorization, GITHUB_DIFF, GITHUB_JSON, HttpClient, REQUEST_TIMEOUT};
pub use fetch_result::FetchResult;
pub use request::{EndpointRequest, PageCursor, QueryValue};
