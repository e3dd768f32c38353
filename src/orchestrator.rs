//! Validation orchestration for one credential.
//!
//! Resolves the provider's probe strategy, runs its endpoint calls in
//! fixed order, folds the results into a verdict, and hands every
//! result plus the verdict to the registered report sinks.

use thiserror::Error;

use crate::probes::{self, Credential};
use crate::report::ReportSink;
use crate::transport::Transport;
use crate::verdict::CredentialVerdict;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("unknown provider '{0}' (expected one of: google, aws, azure, github)")]
    UnknownProvider(String),
    #[error("provider '{0}' requires an access key and a secret key")]
    MissingSecret(String),
    #[error("provider '{0}' takes a single credential, not a key pair")]
    UnexpectedKeyPair(String),
}

pub struct ValidationOrchestrator {
    transport: Box<dyn Transport>,
    sinks: Vec<Box<dyn ReportSink>>,
}

impl ValidationOrchestrator {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            sinks: Vec::new(),
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn ReportSink>) {
        self.sinks.push(sink);
    }

    /// Validate one credential against one provider.
    ///
    /// Probe faults are data, not errors: the only `Err` cases are
    /// configuration mistakes (unknown provider, wrong credential
    /// shape) that need explicit correction by the operator.
    pub async fn validate(
        &mut self,
        provider_id: &str,
        credential: &Credential,
    ) -> Result<CredentialVerdict, ValidationError> {
        let probe = probes::probe_for(provider_id)
            .ok_or_else(|| ValidationError::UnknownProvider(provider_id.to_string()))?;

        match credential {
            Credential::ApiKey(_) if probe.requires_key_pair() => {
                return Err(ValidationError::MissingSecret(provider_id.to_string()));
            }
            Credential::KeyPair { .. } if !probe.requires_key_pair() => {
                return Err(ValidationError::UnexpectedKeyPair(provider_id.to_string()));
            }
            _ => {}
        }

        tracing::info!(
            provider = provider_id,
            credential = %credential.display_id(),
            "validating credential"
        );

        let results = probe.run(credential, self.transport.as_ref()).await;
        for result in &results {
            for sink in &mut self.sinks {
                sink.on_probe(result);
            }
        }

        let verdict = CredentialVerdict::from_results(credential.display_id(), &results);
        for sink in &mut self.sinks {
            sink.on_verdict(&verdict);
        }

        Ok(verdict)
    }
}
