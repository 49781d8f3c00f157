use colored::Colorize;

use super::OutputFormatter;
use crate::bulk::BulkResult;
use crate::check::CertificateReport;

pub struct HumanFormatter {
    use_colors: bool,
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    fn label(&self, text: &str) -> String {
        if self.use_colors {
            text.bright_cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn value(&self, text: &str) -> String {
        if self.use_colors {
            text.bright_white().to_string()
        } else {
            text.to_string()
        }
    }

    fn success(&self, text: &str) -> String {
        if self.use_colors {
            text.bright_green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn warning(&self, text: &str) -> String {
        if self.use_colors {
            text.bright_yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn error(&self, text: &str) -> String {
        if self.use_colors {
            text.bright_red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn header(&self, text: &str) -> String {
        if self.use_colors {
            format!(
                "\n{}\n{}",
                text.bright_purple().bold(),
                "─".repeat(text.len()).bright_black()
            )
        } else {
            format!("\n{}\n{}", text, "-".repeat(text.len()))
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_report(&self, report: &CertificateReport) -> String {
        let mut output = Vec::new();

        let domain = report.domain.as_deref().unwrap_or("unknown");
        output.push(self.header(&format!("SSL Certificate: {}", domain)));

        match report.valid {
            Some(true) => output.push(format!("  {} Certificate is valid", self.success("✓"))),
            Some(false) => output.push(format!("  {} Certificate is not valid", self.error("✗"))),
            None => {}
        }

        if let Some(issuer) = report.issuer_name() {
            output.push(format!("  {}: {}", self.label("Issuer"), self.value(issuer)));
        }

        if let Some(subject) = report.subject.as_ref().and_then(|s| s.display_name()) {
            output.push(format!(
                "  {}: {}",
                self.label("Subject"),
                self.value(subject)
            ));
        }

        if let Some(from) = report.parsed_valid_from() {
            output.push(format!(
                "  {}: {}",
                self.label("Valid from"),
                self.value(&from.format("%Y-%m-%d").to_string())
            ));
        }

        if let Some(until) = report.parsed_valid_to() {
            let expiry_str = until.format("%Y-%m-%d").to_string();
            let status = match report.days_until_expiry() {
                Some(days) if days < 0 => {
                    self.error(&format!("{} (expired {} days ago!)", expiry_str, -days))
                }
                Some(days) if days < 30 => {
                    self.error(&format!("{} (expires in {} days!)", expiry_str, days))
                }
                Some(days) if days < 90 => {
                    self.warning(&format!("{} ({} days)", expiry_str, days))
                }
                Some(days) => self.value(&format!("{} ({} days)", expiry_str, days)),
                None => self.value(&expiry_str),
            };
            output.push(format!("  {}: {}", self.label("Expires"), status));
        } else if let Some(days) = report.days_until_expiry() {
            output.push(format!(
                "  {}: {}",
                self.label("Days remaining"),
                self.value(&days.to_string())
            ));
        }

        if let Some(ref serial) = report.serial_number {
            output.push(format!("  {}: {}", self.label("Serial"), self.value(serial)));
        }

        if let Some(ref algorithm) = report.signature_algorithm {
            output.push(format!(
                "  {}: {}",
                self.label("Algorithm"),
                self.value(algorithm)
            ));
        }

        if !report.subject_alt_names.is_empty() {
            output.push(format!(
                "  {}: {}",
                self.label("SANs"),
                self.value(&report.subject_alt_names.join(", "))
            ));
        }

        output.join("\n")
    }

    fn format_bulk(&self, results: &[BulkResult]) -> String {
        let mut output = Vec::new();

        let succeeded = results.iter().filter(|r| r.success).count();
        output.push(self.header(&format!(
            "Bulk check: {}/{} succeeded",
            succeeded,
            results.len()
        )));

        for result in results {
            if result.success {
                let note = result
                    .report
                    .as_ref()
                    .and_then(|r| r.days_until_expiry())
                    .map(|d| format!("expires in {} days", d))
                    .unwrap_or_else(|| "ok".to_string());
                output.push(format!(
                    "  {} {} ({})",
                    self.success("✓"),
                    self.value(&result.domain),
                    note
                ));
            } else {
                output.push(format!(
                    "  {} {} ({})",
                    self.error("✗"),
                    self.value(&result.domain),
                    result.error.as_deref().unwrap_or("unknown error")
                ));
            }
        }

        output.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_report() -> CertificateReport {
        CertificateReport {
            domain: Some("example.com".to_string()),
            valid: Some(true),
            issuer: None,
            subject: None,
            valid_from: None,
            valid_to: Some((Utc::now() + chrono::TimeDelta::days(200)).to_rfc3339()),
            days_remaining: None,
            serial_number: Some("04:AB".to_string()),
            signature_algorithm: None,
            subject_alt_names: vec!["example.com".to_string()],
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_format_report_without_colors() {
        let formatter = HumanFormatter::new().without_colors();
        let text = formatter.format_report(&sample_report());

        assert!(text.contains("SSL Certificate: example.com"));
        assert!(text.contains("Certificate is valid"));
        assert!(text.contains("Serial: 04:AB"));
        assert!(text.contains("SANs: example.com"));
    }

    #[test]
    fn test_format_bulk_summary_line() {
        let formatter = HumanFormatter::new().without_colors();
        let results = vec![
            BulkResult {
                domain: "a.com".to_string(),
                success: true,
                report: Some(sample_report()),
                error: None,
                duration_ms: 12,
            },
            BulkResult {
                domain: "b.com".to_string(),
                success: false,
                report: None,
                error: Some("Timeout: test".to_string()),
                duration_ms: 30000,
            },
        ];

        let text = formatter.format_bulk(&results);
        assert!(text.contains("Bulk check: 1/2 succeeded"));
        assert!(text.contains("b.com (Timeout: test)"));
    }
}
