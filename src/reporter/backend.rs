//! Backend Reporter (spec §4.J): the retry core. Ships findings to an HTTPS
//! sink, classifying failures into retryable/non-retryable and re-queuing
//! retryable ones through an internal bounded channel.
//!
//! New (the teacher has no network sink); grounded on
//! `flyingrobots-ninelives/src/retry.rs`/`src/backoff.rs` for the
//! classify-then-requeue shape, and on `sync::Sleeper` for testability
//! without a real wall clock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, Receiver, Sender};

use crate::config::RuntimeConfig;
use crate::error::ScanError;
use crate::model::{OutboundReport, ResultEnvelope};
use crate::sync::{Sleeper, TokioSleeper};

use super::Reporter;

const RETRY_CHANNEL_CAPACITY: usize = 10;

/// Delivery sink boundary. `HttpSink` posts over the network; tests drive a
/// canned-response fake instead, mirroring an HTTP mock's outcomes without
/// opening a socket.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn post(&self, report: &OutboundReport) -> Result<(), ScanError>;
}

pub struct HttpSink {
    client: reqwest::Client,
    url: String,
}

impl HttpSink {
    pub fn new(url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build backend HTTP client");
        Self { client, url }
    }
}

#[async_trait]
impl Sink for HttpSink {
    async fn post(&self, report: &OutboundReport) -> Result<(), ScanError> {
        let body = serde_json::to_vec(report).map_err(|e| ScanError::non_retryable(100, format!("serialization error: {e}"), "backend"))?;

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    ScanError::non_retryable(101, format!("request construction error: {e}"), "backend")
                } else {
                    ScanError::retryable(102, format!("transport error: {e}"), "backend")
                }
            })?;

        let status = response.status().as_u16();
        match status {
            200..=299 => Ok(()),
            400 | 401 | 403 => Err(ScanError::non_retryable(status as i32, format!("rejected with status {status}"), "backend")),
            _ => Err(ScanError::retryable(status as i32, format!("non-2xx status {status}"), "backend")),
        }
    }
}

pub struct BackendReporter {
    sink: Arc<dyn Sink>,
    sleeper: Arc<dyn Sleeper>,
    retry_delay: Duration,
    max_retries: u32,
}

impl BackendReporter {
    pub fn new(url: String, config: RuntimeConfig) -> Self {
        Self::with_sink(
            Arc::new(HttpSink::new(url, config.backend_client_timeout)),
            Arc::new(TokioSleeper),
            config.backend_retry_delay,
            config.backend_max_retries,
        )
    }

    pub fn with_sink(sink: Arc<dyn Sink>, sleeper: Arc<dyn Sleeper>, retry_delay: Duration, max_retries: u32) -> Self {
        Self { sink, sleeper, retry_delay, max_retries }
    }

    async fn attempt(&self, target: &str, task_id: &str, finding: &crate::model::Finding) -> Result<(), ScanError> {
        let report = OutboundReport::for_finding(target, task_id, finding);
        self.sink.post(&report).await
    }

    #[allow(clippy::too_many_arguments)]
    async fn handle(
        &self,
        envelope: ResultEnvelope,
        attempt_no: u32,
        target: &str,
        task_id: &str,
        retry_tx: &Sender<(ResultEnvelope, u32)>,
        sleeping: &Arc<AtomicUsize>,
        permanent_failures: &mut usize,
    ) {
        // `ResultEnvelope` is a sum type with exactly two variants, so there
        // is no "neither Finding nor HelpPayload" state to guard against
        // here; a Help envelope reaching the Backend reporter would mean the
        // resolver mis-routed a Help-preferring strategy, which it doesn't.
        let finding = match &envelope {
            ResultEnvelope::Finding(f) => f.clone(),
            ResultEnvelope::Help(_) => {
                *permanent_failures += 1;
                return;
            }
        };

        match self.attempt(target, task_id, &finding).await {
            Ok(()) => {}
            Err(e) if e.retryable && attempt_no < self.max_retries => {
                let retry_tx = retry_tx.clone();
                let sleeper = self.sleeper.clone();
                let delay = self.retry_delay;
                let sleeping = sleeping.clone();
                sleeping.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    sleeper.sleep(delay).await;
                    let _ = retry_tx.send((envelope, attempt_no + 1)).await;
                    sleeping.fetch_sub(1, Ordering::SeqCst);
                });
            }
            Err(_) => {
                *permanent_failures += 1;
            }
        }
    }

    async fn send_end_of_stream(&self, target: &str, task_id: &str) -> usize {
        let report = OutboundReport::end_of_stream(target, task_id);
        match self.sink.post(&report).await {
            Ok(()) => 0,
            Err(e) if e.retryable => {
                self.sleeper.sleep(self.retry_delay).await;
                match self.sink.post(&report).await {
                    Ok(()) => 0,
                    Err(_) => 1,
                }
            }
            Err(_) => 1,
        }
    }
}

#[async_trait]
impl Reporter for BackendReporter {
    async fn run(&self, target: &str, task_id: &str, mut rx: Receiver<ResultEnvelope>) -> Result<usize, ScanError> {
        let (retry_tx, mut retry_rx) = mpsc::channel::<(ResultEnvelope, u32)>(RETRY_CHANNEL_CAPACITY);
        let sleeping = Arc::new(AtomicUsize::new(0));
        let mut input_open = true;
        let mut permanent_failures = 0usize;

        loop {
            let retry_queue_empty = retry_tx.capacity() == RETRY_CHANNEL_CAPACITY;
            let no_sleeping_worker = sleeping.load(Ordering::SeqCst) == 0;
            if !input_open && retry_queue_empty && no_sleeping_worker {
                break;
            }

            tokio::select! {
                biased;
                maybe = rx.recv(), if input_open => {
                    match maybe {
                        Some(envelope) => {
                            self.handle(envelope, 0, target, task_id, &retry_tx, &sleeping, &mut permanent_failures).await;
                        }
                        None => input_open = false,
                    }
                }
                Some((envelope, attempt_no)) = retry_rx.recv() => {
                    self.handle(envelope, attempt_no, target, task_id, &retry_tx, &sleeping, &mut permanent_failures).await;
                }
            }
        }

        permanent_failures += self.send_end_of_stream(target, task_id).await;
        Ok(permanent_failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Finding, ThreatLevel};
    use crate::sync::TrackingSleeper;
    use std::sync::Mutex;

    struct FakeSink {
        responses: Mutex<Vec<Result<(), ScanError>>>,
        posted: Mutex<Vec<OutboundReport>>,
    }

    impl FakeSink {
        fn new(responses: Vec<Result<(), ScanError>>) -> Self {
            Self { responses: Mutex::new(responses), posted: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl Sink for FakeSink {
        async fn post(&self, report: &OutboundReport) -> Result<(), ScanError> {
            self.posted.lock().unwrap().push(report.clone());
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok(())
            } else {
                responses.remove(0)
            }
        }
    }

    #[tokio::test]
    async fn delivers_finding_and_then_end_of_stream() {
        let sink = Arc::new(FakeSink::new(vec![]));
        let reporter = BackendReporter::with_sink(sink.clone(), Arc::new(TrackingSleeper::new()), Duration::from_secs(2), 2);

        let (tx, rx) = mpsc::channel(8);
        tx.send(ResultEnvelope::Finding(Finding::new("https", 90, ThreatLevel::None, "ok"))).await.unwrap();
        drop(tx);

        let failures = reporter.run("example.com", "T1", rx).await.unwrap();
        assert_eq!(failures, 0);

        let posted = sink.posted.lock().unwrap();
        assert_eq!(posted.len(), 2);
        assert!(!posted[0].end_flag);
        assert!(posted[1].end_flag);
    }

    #[tokio::test]
    async fn non_retryable_failure_counts_as_permanent() {
        let sink = Arc::new(FakeSink::new(vec![Err(ScanError::non_retryable(401, "rejected", "backend"))]));
        let reporter = BackendReporter::with_sink(sink, Arc::new(TrackingSleeper::new()), Duration::from_millis(1), 2);

        let (tx, rx) = mpsc::channel(8);
        tx.send(ResultEnvelope::Finding(Finding::new("https", 90, ThreatLevel::None, "ok"))).await.unwrap();
        drop(tx);

        let failures = reporter.run("example.com", "T1", rx).await.unwrap();
        assert_eq!(failures, 1);
    }

    #[tokio::test]
    async fn retryable_failure_is_retried_then_succeeds() {
        let sink = Arc::new(FakeSink::new(vec![Err(ScanError::retryable(500, "flaky", "backend"))]));
        let sleeper = Arc::new(TrackingSleeper::new());
        let reporter = BackendReporter::with_sink(sink.clone(), sleeper.clone(), Duration::from_millis(1), 2);

        let (tx, rx) = mpsc::channel(8);
        tx.send(ResultEnvelope::Finding(Finding::new("https", 90, ThreatLevel::None, "ok"))).await.unwrap();
        drop(tx);

        let failures = reporter.run("example.com", "T1", rx).await.unwrap();
        assert_eq!(failures, 0);
        assert_eq!(sink.posted.lock().unwrap().len(), 3);
    }
}
