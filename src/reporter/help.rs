//! Help Reporter (spec §4.K): drains the channel, requires exactly a
//! `HelpPayload`, prints the header and sections, raises a non-retryable
//! error if no help payload ever arrives.

use async_trait::async_trait;
use tokio::sync::mpsc::Receiver;

use crate::error::ScanError;
use crate::model::ResultEnvelope;

use super::Reporter;

pub struct HelpReporter;

#[async_trait]
impl Reporter for HelpReporter {
    async fn run(&self, _target: &str, _task_id: &str, mut rx: Receiver<ResultEnvelope>) -> Result<usize, ScanError> {
        let mut printed = false;

        while let Some(envelope) = rx.recv().await {
            if let ResultEnvelope::Help(payload) = envelope {
                println!("{}", payload.header);
                for (name, text) in &payload.sections {
                    println!("  {name}  {text}");
                }
                printed = true;
            }
        }

        if !printed {
            return Err(ScanError::non_retryable(100, "help strategy produced no HelpPayload", "reporter"));
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HelpPayload;

    #[tokio::test]
    async fn errors_when_no_help_payload_is_sent() {
        let (tx, rx) = tokio::sync::mpsc::channel(1);
        drop(tx);
        let err = HelpReporter.run("", "", rx).await.unwrap_err();
        assert_eq!(err.code, 100);
    }

    #[tokio::test]
    async fn prints_header_and_sections() {
        let (tx, rx) = tokio::sync::mpsc::channel(1);
        tx.send(ResultEnvelope::Help(HelpPayload {
            header: "usage".to_string(),
            sections: vec![("test".to_string(), "--target <host>".to_string())],
        }))
        .await
        .unwrap();
        drop(tx);
        let failures = HelpReporter.run("", "", rx).await.unwrap();
        assert_eq!(failures, 0);
    }
}
