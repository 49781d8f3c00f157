use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level response envelope returned by the API.
///
/// The service wraps every payload as `{"status": ..., "error": ...,
/// "data": ...}`; `data` is only present when `status` is `"ok"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub data: Option<CertificateReport>,
}

impl CheckResponse {
    /// Whether the envelope reports success.
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("ok")
    }

    /// The error message carried in the envelope, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Certificate details for a checked domain.
///
/// Fields are deliberately lenient: the remote service evolves its
/// payload over time, so everything defaults and unknown keys are
/// collected into `extra` rather than failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateReport {
    #[serde(default)]
    pub domain: Option<String>,

    #[serde(default)]
    pub valid: Option<bool>,

    #[serde(default)]
    pub issuer: Option<CertificateSubject>,

    #[serde(default)]
    pub subject: Option<CertificateSubject>,

    /// Start of the validity window, as reported (RFC 3339 string).
    #[serde(default)]
    pub valid_from: Option<String>,

    /// End of the validity window, as reported (RFC 3339 string).
    #[serde(default)]
    pub valid_to: Option<String>,

    #[serde(default)]
    pub days_remaining: Option<i64>,

    #[serde(default)]
    pub serial_number: Option<String>,

    #[serde(default)]
    pub signature_algorithm: Option<String>,

    #[serde(default)]
    pub subject_alt_names: Vec<String>,

    // Raw JSON for fields this model does not know about
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Distinguished-name fields for a certificate issuer or subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateSubject {
    #[serde(default)]
    pub common_name: Option<String>,

    #[serde(default)]
    pub organization: Option<String>,

    #[serde(default)]
    pub country: Option<String>,
}

impl CertificateSubject {
    /// Best display name: common name, falling back to organization.
    pub fn display_name(&self) -> Option<&str> {
        self.common_name
            .as_deref()
            .or(self.organization.as_deref())
    }
}

impl CertificateReport {
    /// Parsed start of the validity window.
    pub fn parsed_valid_from(&self) -> Option<DateTime<Utc>> {
        self.valid_from.as_ref()?.parse().ok()
    }

    /// Parsed end of the validity window.
    pub fn parsed_valid_to(&self) -> Option<DateTime<Utc>> {
        self.valid_to.as_ref()?.parse().ok()
    }

    /// Days until the certificate expires.
    ///
    /// Prefers the service-reported count, computing it from the
    /// expiration timestamp when absent. `None` when neither is usable.
    pub fn days_until_expiry(&self) -> Option<i64> {
        self.days_remaining
            .or_else(|| self.parsed_valid_to().map(|t| (t - Utc::now()).num_days()))
    }

    /// Whether the certificate has already expired.
    pub fn is_expired(&self) -> bool {
        self.days_until_expiry().is_some_and(|d| d < 0)
    }

    /// Whether the certificate expires within the given number of days.
    pub fn expires_within(&self, days: i64) -> bool {
        self.days_until_expiry().is_some_and(|d| d <= days)
    }

    /// Issuer display name, if reported.
    pub fn issuer_name(&self) -> Option<&str> {
        self.issuer.as_ref().and_then(|s| s.display_name())
    }
}
