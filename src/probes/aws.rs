//! AWS access key pair probe.
//!
//! AWS has no bare "is this key valid" endpoint; validity is tested by
//! signing two cheap read-only calls (S3 ListBuckets, EC2
//! DescribeRegions) with SigV4 and seeing whether the signature is
//! accepted. Rejected calls come back as XML error envelopes carrying
//! `<Code>` and `<Message>`.
//!
//! Signing lives behind the `aws-sigv4` feature. Without it the probe
//! reports a single synthetic non-clean result instead of failing the
//! build or crashing at runtime.

use async_trait::async_trait;

use super::{Credential, ProbeResult, ProviderProbe};
use crate::transport::Transport;

pub struct AwsProbe;

/// Extract `<Code>` and `<Message>` from an AWS XML error envelope.
/// Works for both the S3 shape (`<Error>...`) and the EC2 shape
/// (`<Response><Errors><Error>...`).
fn extract_error(status: u16, body: &str) -> Option<String> {
    if status == 200 {
        return None;
    }
    match (xml_tag(body, "Code"), xml_tag(body, "Message")) {
        (Some(code), Some(message)) => Some(format!("{}: {}", code.trim(), message.trim())),
        (Some(code), None) => Some(code.trim().to_string()),
        _ => None,
    }
}

fn xml_tag<'a>(body: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = body.find(&open)? + open.len();
    let end = body[start..].find(&close)? + start;
    Some(&body[start..end])
}

#[async_trait]
impl ProviderProbe for AwsProbe {
    fn provider_id(&self) -> &str {
        "aws"
    }

    fn display_name(&self) -> &str {
        "AWS"
    }

    fn requires_key_pair(&self) -> bool {
        true
    }

    #[cfg(feature = "aws-sigv4")]
    async fn run(&self, credential: &Credential, transport: &dyn Transport) -> Vec<ProbeResult> {
        use super::{run_endpoint, sigv4};
        use crate::transport::ProbeRequest;

        let (access, secret) = match credential {
            Credential::KeyPair { access, secret } => (access.as_str(), secret.as_str()),
            Credential::ApiKey(_) => {
                return vec![ProbeResult::fault(
                    self.display_name(),
                    "Credential Check",
                    "AWS validation requires an access key and secret key pair",
                )];
            }
        };

        // (endpoint name, host, canonical query, service)
        let endpoints = [
            ("S3 ListBuckets", "s3.amazonaws.com", "", "s3"),
            (
                "EC2 DescribeRegions",
                "ec2.amazonaws.com",
                "Action=DescribeRegions&Version=2016-11-15",
                "ec2",
            ),
        ];

        let mut results = Vec::with_capacity(endpoints.len());
        for (name, host, query, service) in endpoints {
            let url = if query.is_empty() {
                format!("https://{host}/")
            } else {
                format!("https://{host}/?{query}")
            };
            let mut request = ProbeRequest::get(url);
            for (header, value) in
                sigv4::sign_get(host, "/", query, service, access, secret, chrono::Utc::now())
            {
                request = request.header(header, value);
            }
            results.push(
                run_endpoint(self.display_name(), name, request, transport, extract_error).await,
            );
        }
        results
    }

    #[cfg(not(feature = "aws-sigv4"))]
    async fn run(&self, _credential: &Credential, _transport: &dyn Transport) -> Vec<ProbeResult> {
        vec![ProbeResult::fault(
            self.display_name(),
            "SigV4 Signing",
            "built without the aws-sigv4 feature; cannot sign AWS requests",
        )]
    }
}
