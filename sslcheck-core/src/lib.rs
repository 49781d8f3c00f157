pub mod bulk;
pub mod cache;
pub mod check;
pub mod error;
pub mod output;
pub mod retry;
pub mod validation;

pub use error::{Result, SslCheckError};
pub use validation::normalize_domain;

pub use check::{CertificateReport, CheckClient, CheckResponse, QueryOptions};

pub use bulk::{BulkExecutor, BulkResult};
pub use output::{OutputFormat, OutputFormatter};
pub use retry::{RetryExecutor, RetryPolicy};
