//! Report sinks: console rendering and the session log file.
//!
//! Sinks observe probe results and verdicts; they never influence the
//! verdict. The session log mirrors the console lines without color,
//! one append-only file per process invocation named by a capture
//! timestamp.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::probes::ProbeResult;
use crate::verdict::CredentialVerdict;

pub trait ReportSink {
    fn on_probe(&mut self, result: &ProbeResult);
    fn on_verdict(&mut self, verdict: &CredentialVerdict);
}

fn status_label(result: &ProbeResult) -> &'static str {
    if result.is_clean() {
        "VALID"
    } else {
        "INVALID"
    }
}

// ── Console ─────────────────────────────────────────────────────────

pub struct ConsoleRenderer {
    color: bool,
}

impl ConsoleRenderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl ReportSink for ConsoleRenderer {
    fn on_probe(&mut self, result: &ProbeResult) {
        let label = status_label(result);
        let shown = if self.color {
            if result.is_clean() {
                label.green().to_string()
            } else {
                label.red().to_string()
            }
        } else {
            label.to_string()
        };
        println!(
            "{} {} response status: {} ({})",
            result.provider, result.endpoint_name, result.http_status, shown
        );
    }

    fn on_verdict(&mut self, verdict: &CredentialVerdict) {
        if verdict.is_valid {
            let label = if self.color {
                "VALID".green().to_string()
            } else {
                "VALID".to_string()
            };
            // Per-endpoint errors are suppressed for valid credentials.
            println!("Credential {}: {}", verdict.credential_id, label);
        } else {
            let label = if self.color {
                "INVALID".red().to_string()
            } else {
                "INVALID".to_string()
            };
            println!("Credential {}: {}", verdict.credential_id, label);
            for error in &verdict.errors {
                println!("  - {}", error);
            }
        }
        println!();
    }
}

// ── Session log ─────────────────────────────────────────────────────

/// Plain-text mirror of the console output, appended to
/// `{log_dir}/{YYYYmmdd_HHMMSS}.log`.
pub struct SessionLog {
    file: File,
    path: PathBuf,
}

impl SessionLog {
    pub fn create(log_dir: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(log_dir)?;
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = log_dir.join(format!("{stamp}.log"));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&mut self, line: &str) {
        // A failed log write must not disturb validation.
        if let Err(e) = writeln!(self.file, "{line}") {
            tracing::warn!(path = %self.path.display(), error = %e, "session log write failed");
        }
    }
}

impl ReportSink for SessionLog {
    fn on_probe(&mut self, result: &ProbeResult) {
        self.append(&format!(
            "{} {} response status: {} ({})",
            result.provider,
            result.endpoint_name,
            result.http_status,
            status_label(result)
        ));
    }

    fn on_verdict(&mut self, verdict: &CredentialVerdict) {
        if verdict.is_valid {
            self.append(&format!("Credential {}: VALID", verdict.credential_id));
        } else {
            self.append(&format!("Credential {}: INVALID", verdict.credential_id));
            for error in &verdict.errors {
                self.append(&format!("  - {error}"));
            }
        }
        self.append("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result(status: u16, error: Option<&str>) -> ProbeResult {
        ProbeResult {
            provider: "Google".into(),
            endpoint_name: "Translate API".into(),
            http_status: status,
            error_message: error.map(String::from),
        }
    }

    #[test]
    fn test_session_log_mirrors_lines_without_color() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut log = SessionLog::create(dir.path()).expect("create log");

        log.on_probe(&sample_result(200, None));
        log.on_probe(&sample_result(403, Some("denied")));
        log.on_verdict(&CredentialVerdict {
            credential_id: "AIzaSy...abcd".into(),
            is_valid: false,
            errors: vec!["Google - Translate API: denied".into()],
        });

        let contents = std::fs::read_to_string(log.path()).expect("read log");
        assert!(contents.contains("Google Translate API response status: 200 (VALID)"));
        assert!(contents.contains("Google Translate API response status: 403 (INVALID)"));
        assert!(contents.contains("Credential AIzaSy...abcd: INVALID"));
        assert!(contents.contains("  - Google - Translate API: denied"));
        // No ANSI escapes in the log
        assert!(!contents.contains('\u{1b}'));
    }

    #[test]
    fn test_valid_verdict_suppresses_error_summary() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut log = SessionLog::create(dir.path()).expect("create log");

        log.on_verdict(&CredentialVerdict {
            credential_id: "AIzaSy...abcd".into(),
            is_valid: true,
            errors: vec!["Google - YouTube Data API: quota exceeded".into()],
        });

        let contents = std::fs::read_to_string(log.path()).expect("read log");
        assert!(contents.contains("Credential AIzaSy...abcd: VALID"));
        assert!(!contents.contains("quota exceeded"));
    }

    #[test]
    fn test_log_filename_is_timestamped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = SessionLog::create(dir.path()).expect("create log");
        let name = log
            .path()
            .file_name()
            .and_then(|n| n.to_str())
            .expect("filename");
        assert!(name.ends_with(".log"));
        // 15 chars of timestamp: YYYYmmdd_HHMMSS
        assert_eq!(name.len(), "YYYYmmdd_HHMMSS.log".len());
    }
}
