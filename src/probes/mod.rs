//! Provider probe strategies.
//!
//! Every provider implements `ProviderProbe`: a fixed ordered table of
//! endpoint calls plus a provider-specific rule for pulling an error
//! signal out of each response. Adding a provider = one new file here
//! and one arm in `probe_for`.
//!
//! Endpoint calls are independent: a failure on one endpoint never
//! short-circuits the rest, and any transport or parse fault becomes a
//! status-500 result instead of propagating.

pub mod aws;
pub mod azure;
pub mod github;
pub mod google;

#[cfg(feature = "aws-sigv4")]
pub(crate) mod sigv4;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::transport::{ProbeRequest, Transport};

/// Provider selectors accepted at dispatch time.
pub const KNOWN_PROVIDERS: [&str; 4] = ["google", "aws", "azure", "github"];

/// Outcome of one provider endpoint call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub provider: String,
    pub endpoint_name: String,
    /// 500 when the transport call itself failed.
    pub http_status: u16,
    /// Set when the endpoint signaled a logical error (even under 200)
    /// or when the transport failed.
    pub error_message: Option<String>,
}

impl ProbeResult {
    /// A clean result is the only thing that can mark a credential VALID.
    pub fn is_clean(&self) -> bool {
        self.http_status == 200 && self.error_message.is_none()
    }

    /// Sentinel result for a call that never produced a response.
    pub fn fault(provider: &str, endpoint_name: &str, description: impl Into<String>) -> Self {
        Self {
            provider: provider.to_string(),
            endpoint_name: endpoint_name.to_string(),
            http_status: 500,
            error_message: Some(description.into()),
        }
    }
}

/// Credential material under test. AWS takes an access/secret pair;
/// everything else is a single opaque string.
#[derive(Debug, Clone)]
pub enum Credential {
    ApiKey(String),
    KeyPair { access: String, secret: String },
}

impl Credential {
    /// The value used for display and masking (the access key for pairs).
    pub fn primary(&self) -> &str {
        match self {
            Credential::ApiKey(key) => key,
            Credential::KeyPair { access, .. } => access,
        }
    }

    /// Masked identifier: first 6 + last 4 characters of the primary
    /// value, or the raw value when it is 10 characters or shorter.
    pub fn display_id(&self) -> String {
        mask(self.primary())
    }
}

pub fn mask(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    if chars.len() <= 10 {
        return raw.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[async_trait]
pub trait ProviderProbe: Send + Sync {
    /// Lowercase selector (e.g. "google").
    fn provider_id(&self) -> &str;

    /// Display identifier used in results (e.g. "Google").
    fn display_name(&self) -> &str;

    /// Whether this provider needs an access/secret pair.
    fn requires_key_pair(&self) -> bool {
        false
    }

    /// Execute every endpoint call in fixed order. Never panics and
    /// never returns early; faulted calls appear as status-500 results.
    async fn run(&self, credential: &Credential, transport: &dyn Transport) -> Vec<ProbeResult>;
}

/// Resolve a provider selector to its probe strategy.
pub fn probe_for(provider_id: &str) -> Option<Box<dyn ProviderProbe>> {
    match provider_id {
        "google" => Some(Box::new(google::GoogleProbe)),
        "aws" => Some(Box::new(aws::AwsProbe)),
        "azure" => Some(Box::new(azure::AzureProbe)),
        "github" => Some(Box::new(github::GitHubProbe)),
        _ => None,
    }
}

/// Run one endpoint call with fault isolation: a transport error maps
/// to a status-500 result, a response maps through the provider's
/// error extraction rule.
pub(crate) async fn run_endpoint(
    provider: &str,
    endpoint_name: &str,
    request: ProbeRequest,
    transport: &dyn Transport,
    extract: impl Fn(u16, &str) -> Option<String> + Send,
) -> ProbeResult {
    match transport.call(request).await {
        Ok(resp) => ProbeResult {
            provider: provider.to_string(),
            endpoint_name: endpoint_name.to_string(),
            http_status: resp.status,
            error_message: extract(resp.status, &resp.body),
        },
        Err(e) => {
            tracing::debug!(provider, endpoint = endpoint_name, error = %e, "transport fault");
            ProbeResult::fault(provider, endpoint_name, e.to_string())
        }
    }
}
