//! KeySweep CLI — bulk credential validation.
//!
//! One provider selector, one credential or a newline-delimited list,
//! colored VALID/INVALID output on the console and an uncolored mirror
//! in a timestamp-named session log.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use keysweep::batch::run_batch;
use keysweep::orchestrator::ValidationOrchestrator;
use keysweep::probes::{Credential, KNOWN_PROVIDERS};
use keysweep::report::{ConsoleRenderer, SessionLog};
use keysweep::transport::HttpTransport;

#[derive(Parser, Debug)]
#[command(author, version, about = "Validate cloud/SaaS credentials by probing provider APIs", long_about = None)]
struct Args {
    /// Provider to validate against: google, aws, azure, github, or all
    provider: String,

    /// A single credential (API key, token, or AWS access key)
    credential: Option<String>,

    /// Path to a newline-delimited credential list
    #[arg(long, value_name = "FILE", conflicts_with = "credential")]
    list: Option<PathBuf>,

    /// Secret key companion for a single AWS run
    #[arg(long)]
    secret: Option<String>,

    /// Plain output (no color)
    #[arg(long)]
    plain: bool,

    /// Directory for the session log file
    #[arg(long, default_value = ".")]
    log_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keysweep=info".into()),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let provider = args.provider.to_lowercase();

    let session_log =
        SessionLog::create(&args.log_dir).context("failed to create the session log")?;
    let log_path = session_log.path().to_path_buf();

    let mut orchestrator = ValidationOrchestrator::new(Box::new(HttpTransport::new()));
    orchestrator.add_sink(Box::new(ConsoleRenderer::new(!args.plain)));
    orchestrator.add_sink(Box::new(session_log));

    // Interrupts set a flag checked between credentials; the in-flight
    // call is allowed to finish and the closing path still runs.
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nInterrupt received, finishing the in-flight credential...");
                stop.store(true, Ordering::Relaxed);
            }
        });
    }

    if let Some(path) = &args.list {
        if provider == "all" {
            bail!("--list requires a specific provider (google, aws, azure, github)");
        }
        let input = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read credential list {}", path.display()))?;
        let outcome = run_batch(&mut orchestrator, &provider, &input, &stop).await;
        println!(
            "Batch complete: {} processed, {} skipped, {} errors",
            outcome.success_count, outcome.skipped_count, outcome.error_count
        );
    } else {
        let value = args
            .credential
            .clone()
            .context("provide a credential or --list <file>")?;
        if provider == "all" {
            validate_all(&mut orchestrator, &value, args.secret.as_deref(), &stop).await?;
        } else {
            let credential = build_credential(&provider, value, args.secret)?;
            orchestrator.validate(&provider, &credential).await?;
        }
    }

    println!("\nFull output saved to {}", log_path.display());
    Ok(())
}

fn build_credential(provider: &str, value: String, secret: Option<String>) -> Result<Credential> {
    if provider == "aws" {
        let secret = secret.context("AWS validation needs --secret alongside the access key")?;
        Ok(Credential::KeyPair {
            access: value,
            secret,
        })
    } else {
        Ok(Credential::ApiKey(value))
    }
}

/// Fan one credential out across every provider. AWS joins in only
/// when a secret companion was given.
async fn validate_all(
    orchestrator: &mut ValidationOrchestrator,
    value: &str,
    secret: Option<&str>,
    stop: &AtomicBool,
) -> Result<()> {
    for provider in KNOWN_PROVIDERS {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        let credential = match provider {
            "aws" => match secret {
                Some(secret) => Credential::KeyPair {
                    access: value.to_string(),
                    secret: secret.to_string(),
                },
                None => {
                    tracing::warn!("skipping AWS: no --secret provided");
                    continue;
                }
            },
            _ => Credential::ApiKey(value.to_string()),
        };
        orchestrator.validate(provider, &credential).await?;
    }
    Ok(())
}
