//! # KeySweep
//!
//! Bulk credential validator for cloud/SaaS providers. Each supported
//! provider (Google, AWS, Azure, GitHub) gets a fixed ordered list of
//! lightweight probe requests; the responses are folded into a single
//! VALID/INVALID verdict per credential.
//!
//! Architecture:
//!
//! - `Transport`: black-box HTTP request/response boundary
//! - `ProviderProbe`: per-provider endpoint table and error extraction
//! - `CredentialVerdict`: fold of all probe results for one credential
//! - `ValidationOrchestrator`: drives one credential end to end
//! - `batch`: newline-delimited lists with per-line fault isolation

pub mod batch;
pub mod orchestrator;
pub mod probes;
pub mod report;
pub mod transport;
pub mod verdict;

pub use batch::{run_batch, BatchOutcome};
pub use orchestrator::{ValidationError, ValidationOrchestrator};
pub use probes::{Credential, ProbeResult, ProviderProbe};
pub use transport::{HttpTransport, Transport, TransportError};
pub use verdict::CredentialVerdict;
