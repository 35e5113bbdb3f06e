use std::sync::{Arc, Mutex};
use std::time::Duration;

use api_hunter::model::{Finding, OutboundReport, ResultEnvelope, ThreatLevel};
use api_hunter::reporter::backend::{BackendReporter, Sink};
use api_hunter::reporter::Reporter;
use api_hunter::sync::TrackingSleeper;
use async_trait::async_trait;
use tokio::sync::mpsc;

struct RecordingSink {
    posted: Mutex<Vec<OutboundReport>>,
}

impl RecordingSink {
    fn new() -> Self {
        Self { posted: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl Sink for RecordingSink {
    async fn post(&self, report: &OutboundReport) -> Result<(), api_hunter::error::ScanError> {
        self.posted.lock().unwrap().push(report.clone());
        Ok(())
    }
}

#[tokio::test]
async fn forwards_findings_in_order_then_closes_with_end_flag() {
    let sink = Arc::new(RecordingSink::new());
    let reporter = BackendReporter::with_sink(sink.clone(), Arc::new(TrackingSleeper::new()), Duration::from_secs(2), 2);

    let (tx, rx) = mpsc::channel(8);
    tx.send(ResultEnvelope::Finding(Finding::new("https", 95, ThreatLevel::High, "plain http")))
        .await
        .unwrap();
    tx.send(ResultEnvelope::Finding(Finding::new("hsts", 80, ThreatLevel::Medium, "short max-age")))
        .await
        .unwrap();
    drop(tx);

    let failures = reporter.run("example.com", "task-1", rx).await.unwrap();
    assert_eq!(failures, 0);

    let posted = sink.posted.lock().unwrap();
    assert_eq!(posted.len(), 3);
    assert_eq!(posted[0].result.name.as_deref(), Some("https"));
    assert_eq!(posted[1].result.name.as_deref(), Some("hsts"));
    assert!(posted[2].end_flag);
    assert_eq!(posted[2].task_id, "task-1");
}
