//! CLI Reporter (spec §4.I): drains the channel and prints each `Finding` to
//! stdout; ignores any non-`Finding` envelope that reaches it. The CLI
//! reporter never fails (spec §7) — findings are printed for the operator to
//! read, not uploaded anywhere, so there is nothing for it to report as a
//! permanent failure; it always returns the fixed "0 failures" sentinel.
//!
//! Grounded on the teacher's `output/clean_reporter.rs` (`Severity`
//! emoji/color/label formatting, `print_summary` layout) adapted to the
//! spec's `ThreatLevel` scale and streamed one Finding at a time instead of
//! buffered into a final `ScanReport`.

use async_trait::async_trait;
use tokio::sync::mpsc::Receiver;

use crate::error::ScanError;
use crate::model::{ResultEnvelope, ThreatLevel};

use super::Reporter;

pub struct CliReporter;

fn color_code(level: ThreatLevel) -> &'static str {
    match level {
        ThreatLevel::Critical => "\x1b[1;91m",
        ThreatLevel::High => "\x1b[1;33m",
        ThreatLevel::Medium => "\x1b[1;93m",
        ThreatLevel::Low => "\x1b[1;94m",
        ThreatLevel::Info => "\x1b[1;96m",
        ThreatLevel::None => "\x1b[1;92m",
    }
}

const RESET: &str = "\x1b[0m";

#[async_trait]
impl Reporter for CliReporter {
    async fn run(&self, target: &str, _task_id: &str, mut rx: Receiver<ResultEnvelope>) -> Result<usize, ScanError> {
        println!("Scanning {target}");

        while let Some(envelope) = rx.recv().await {
            match envelope {
                ResultEnvelope::Finding(f) => {
                    println!(
                        "{}[{}]{} {} ({}%) - {}",
                        color_code(f.threat_level),
                        f.threat_level,
                        RESET,
                        f.name,
                        f.certainty,
                        f.description
                    );
                }
                ResultEnvelope::Help(_) => continue,
            }
        }

        println!("0 failures");
        Ok(0)
    }
}
