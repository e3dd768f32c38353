//! Batch processing of newline-delimited credential lists.
//!
//! Blank lines and `#` comments are skipped before counting. Malformed
//! AWS pairs are counted as skipped and never dispatched. A credential
//! coming back INVALID is still a successfully processed line; only an
//! unrecognized provider counts as an error, and that aborts the
//! remainder of the batch.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::orchestrator::{ValidationError, ValidationOrchestrator};
use crate::probes::Credential;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub success_count: usize,
    pub error_count: usize,
    pub skipped_count: usize,
}

/// Parse an AWS batch line: one comma, exactly two non-empty trimmed
/// parts.
fn parse_key_pair(line: &str) -> Option<Credential> {
    let (access, secret) = line.split_once(',')?;
    let access = access.trim();
    let secret = secret.trim();
    if access.is_empty() || secret.is_empty() || secret.contains(',') {
        return None;
    }
    Some(Credential::KeyPair {
        access: access.to_string(),
        secret: secret.to_string(),
    })
}

/// Run every credential line in `input` against `provider_id`,
/// sequentially. `stop` is checked between lines so an interrupt lets
/// the in-flight credential finish.
pub async fn run_batch(
    orchestrator: &mut ValidationOrchestrator,
    provider_id: &str,
    input: &str,
    stop: &AtomicBool,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for line in input.lines() {
        if stop.load(Ordering::Relaxed) {
            tracing::warn!("interrupt received, stopping batch");
            break;
        }

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let credential = if provider_id == "aws" {
            match parse_key_pair(line) {
                Some(credential) => credential,
                None => {
                    tracing::warn!("skipping malformed AWS entry (expected 'access_key,secret_key')");
                    outcome.skipped_count += 1;
                    continue;
                }
            }
        } else {
            Credential::ApiKey(line.to_string())
        };

        match orchestrator.validate(provider_id, &credential).await {
            Ok(_) => outcome.success_count += 1,
            Err(e @ ValidationError::UnknownProvider(_)) => {
                tracing::error!(error = %e, "aborting batch");
                outcome.error_count += 1;
                break;
            }
            Err(e) => {
                // Shape mismatches cannot abort the rest of the batch.
                tracing::warn!(error = %e, "skipping entry");
                outcome.skipped_count += 1;
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_pair_parsing() {
        assert!(parse_key_pair("abc").is_none());
        assert!(parse_key_pair("ak,").is_none());
        assert!(parse_key_pair(",sk").is_none());
        assert!(parse_key_pair("ak,sk,extra").is_none());

        match parse_key_pair("ak,sk") {
            Some(Credential::KeyPair { access, secret }) => {
                assert_eq!(access, "ak");
                assert_eq!(secret, "sk");
            }
            other => panic!("expected key pair, got {:?}", other),
        }
    }

    #[test]
    fn test_key_pair_parts_are_trimmed() {
        match parse_key_pair("ak, sk  ") {
            Some(Credential::KeyPair { access, secret }) => {
                assert_eq!(access, "ak");
                assert_eq!(secret, "sk");
            }
            other => panic!("expected key pair, got {:?}", other),
        }
    }
}
