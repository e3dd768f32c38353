//! Per-credential verdict aggregation.
//!
//! A fold over the ordered probe results: one clean result anywhere is
//! enough to mark the credential VALID (a key can be valid yet lack
//! scope for some endpoints), and every non-clean result contributes
//! one formatted error entry in probe-execution order.

use serde::{Deserialize, Serialize};

use crate::probes::ProbeResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialVerdict {
    /// Masked display identifier; never the raw credential.
    pub credential_id: String,
    pub is_valid: bool,
    /// `"{provider} - {endpoint_name}: {message}"` per non-clean result.
    pub errors: Vec<String>,
}

impl CredentialVerdict {
    pub fn from_results(credential_id: impl Into<String>, results: &[ProbeResult]) -> Self {
        let mut is_valid = false;
        let mut errors = Vec::new();

        for result in results {
            if result.is_clean() {
                is_valid = true;
            } else {
                let message = result
                    .error_message
                    .clone()
                    .unwrap_or_else(|| format!("HTTP {}", result.http_status));
                errors.push(format!(
                    "{} - {}: {}",
                    result.provider, result.endpoint_name, message
                ));
            }
        }

        Self {
            credential_id: credential_id.into(),
            is_valid,
            errors,
        }
    }
}
