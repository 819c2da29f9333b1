//! Data layer of the storefront app.
//!
//! # Overview
//! Two pieces of non-presentational logic live here: a typed request
//! dispatcher that turns every remote call into a `ResultWrapper`, and a
//! payload codec that packs a product record into a token that survives the
//! navigation router's string-only, percent-escaped argument slots.
//!
//! # Design
//! - `StoreClient` is stateless: it holds a `base_url` and a `Transport`.
//!   The transport does the I/O; status interpretation, body decoding, and
//!   failure classification stay in the client.
//! - Dispatch never fails. Every raised failure goes through `classify` and
//!   comes back as `ResultWrapper::Failure(ErrorKind)`.
//! - Cancellation is not a failure: dropping a dispatch future aborts it,
//!   and `dispatch_cancellable` reports `Cancelled` separately.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod classify;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod result;
pub mod route;
pub mod transport;
pub mod types;

pub use classify::classify;
pub use client::StoreClient;
pub use codec::{decode, encode, EncodedToken, ProductRoute};
pub use config::ClientConfig;
pub use error::{
    BoxError, Cancelled, DecodeError, DispatchFailure, ErrorKind, TransportError,
    TransportErrorKind,
};
pub use feed::HomeFeed;
pub use http::{HttpMethod, HttpResponse, RequestDescriptor};
pub use result::ResultWrapper;
pub use route::NavRoute;
pub use transport::{ReqwestTransport, Transport};
pub use types::{Category, CategoryList, Product, ProductList};
