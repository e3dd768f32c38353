//! GitHub token probe.
//!
//! Two endpoints with different error conventions. `/user` failures
//! carry both `message` and `documentation_url`; `/user/repos`
//! succeeds with a JSON array, so an object body carrying `message`
//! doubles as the failure discriminator.

use async_trait::async_trait;
use serde_json::Value;

use super::{run_endpoint, Credential, ProbeResult, ProviderProbe};
use crate::transport::{ProbeRequest, Transport};

pub struct GitHubProbe;

const USER_AGENT: &str = concat!("keysweep/", env!("CARGO_PKG_VERSION"));

fn request(url: &str, token: &str) -> ProbeRequest {
    ProbeRequest::get(url)
        .header("Authorization", format!("Bearer {token}"))
        .header("Accept", "application/vnd.github+json")
        .header("User-Agent", USER_AGENT)
}

fn extract_user_error(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    if parsed.get("documentation_url").is_some() {
        parsed["message"].as_str().map(String::from)
    } else {
        None
    }
}

fn extract_repos_error(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    // An array is the success shape; only object bodies signal errors.
    parsed
        .as_object()
        .and_then(|obj| obj.get("message"))
        .and_then(Value::as_str)
        .map(String::from)
}

#[async_trait]
impl ProviderProbe for GitHubProbe {
    fn provider_id(&self) -> &str {
        "github"
    }

    fn display_name(&self) -> &str {
        "GitHub"
    }

    async fn run(&self, credential: &Credential, transport: &dyn Transport) -> Vec<ProbeResult> {
        let token = credential.primary();
        let user = run_endpoint(
            self.display_name(),
            "User API",
            request("https://api.github.com/user", token),
            transport,
            |_, body| extract_user_error(body),
        )
        .await;
        let repos = run_endpoint(
            self.display_name(),
            "User Repos API",
            request("https://api.github.com/user/repos?per_page=1", token),
            transport,
            |_, body| extract_repos_error(body),
        )
        .await;
        vec![user, repos]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_requires_both_fields() {
        let error = r#"{"message":"Bad credentials","documentation_url":"https://docs.github.com/rest"}"#;
        assert_eq!(extract_user_error(error), Some("Bad credentials".to_string()));

        // A profile body has `message`-free fields; no error signal.
        let profile = r#"{"login":"octocat","id":1}"#;
        assert_eq!(extract_user_error(profile), None);

        // `message` alone (no documentation_url) is not the /user convention.
        let partial = r#"{"message":"something"}"#;
        assert_eq!(extract_user_error(partial), None);
    }

    #[test]
    fn test_repos_array_is_success() {
        assert_eq!(extract_repos_error(r#"[{"name":"repo"}]"#), None);
        assert_eq!(extract_repos_error("[]"), None);
    }

    #[test]
    fn test_repos_object_with_message_is_error() {
        let body = r#"{"message":"Bad credentials","documentation_url":"https://docs.github.com/rest"}"#;
        assert_eq!(extract_repos_error(body), Some("Bad credentials".to_string()));
    }
}
