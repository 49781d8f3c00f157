//! SSL Certificate Checker API access
//!
//! Provides the query options container, the response model, and the
//! HTTP client that talks to the remote certificate inspection service.

mod client;
mod options;
mod types;

pub use client::CheckClient;
pub use options::QueryOptions;
pub use types::{CertificateReport, CertificateSubject, CheckResponse};
