//! Daemon (spec §4.M): long-running broker consumer that spawns one scan
//! per message.
//!
//! New — the teacher has no broker consumer. `lapin` is the natural choice
//! for an AMQP client with manual ack/nack (no example repo in the pack
//! implements a broker consumer; picked directly from the Rust
//! async-messaging ecosystem rather than grounded in the pack, see
//! DESIGN.md).

use futures::StreamExt;
use lapin::options::{BasicAckOptions, BasicConsumeOptions, BasicNackOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{Connection, ConnectionProperties};
use serde::Deserialize;

use crate::config::RuntimeConfig;
use crate::param::{CommandParameter, PARAM_ANTI_BOT, PARAM_TARGET, PARAM_TASK_ID, PARAM_TESTS};
use crate::{orchestrator, param, plan};

const DEFAULT_ANALYZER_SET: &[&str] = &["https", "hsts", "security-headers", "cors", "fingerprint"];

#[derive(Debug, Deserialize)]
struct BrokerMessage {
    id: String,
    target_url: String,
}

pub async fn run(amqp_url: &str, queue: &str, config: RuntimeConfig) -> anyhow::Result<()> {
    let connection = Connection::connect(amqp_url, ConnectionProperties::default()).await?;
    let channel = connection.create_channel().await?;
    channel
        .queue_declare(queue, QueueDeclareOptions::default(), FieldTable::default())
        .await?;

    let mut consumer = channel
        .basic_consume(queue, "api-hunter-daemon", BasicConsumeOptions::default(), FieldTable::default())
        .await?;

    tracing::info!(queue, "daemon consuming broker messages");

    let mut shutdown = shutdown_signal();
    let mut in_flight: Vec<tokio::task::JoinHandle<()>> = Vec::new();

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("shutdown signal received, draining in-flight scans");
                break;
            }
            delivery = consumer.next() => {
                let Some(delivery) = delivery else { break };
                let delivery = match delivery {
                    Ok(d) => d,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to receive delivery");
                        continue;
                    }
                };

                let message: Result<BrokerMessage, _> = serde_json::from_slice(&delivery.data);
                let message = match message {
                    Ok(m) => m,
                    Err(e) => {
                        tracing::warn!(error = %e, "dropping malformed broker message");
                        let _ = delivery.nack(BasicNackOptions { requeue: false, ..Default::default() }).await;
                        continue;
                    }
                };

                let cfg = config.clone();
                let handle = tokio::spawn(async move {
                    let outcome = run_scan_for_message(&message, &cfg).await;
                    match outcome {
                        Ok(()) => {
                            let _ = delivery.ack(BasicAckOptions::default()).await;
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, task_id = %message.id, "scan failed");
                            let _ = delivery.nack(BasicNackOptions { requeue: false, ..Default::default() }).await;
                        }
                    }
                });
                in_flight.retain(|h| !h.is_finished());
                in_flight.push(handle);
            }
        }
    }

    for handle in in_flight {
        let _ = handle.await;
    }

    Ok(())
}

async fn run_scan_for_message(message: &BrokerMessage, config: &RuntimeConfig) -> anyhow::Result<()> {
    let params = vec![
        CommandParameter::new(PARAM_TARGET, vec![message.target_url.clone()]),
        CommandParameter::new(PARAM_TESTS, DEFAULT_ANALYZER_SET.iter().map(|s| s.to_string()).collect()),
        CommandParameter::new(PARAM_TASK_ID, vec![message.id.clone()]),
        CommandParameter::new(PARAM_ANTI_BOT, vec![]),
    ];

    let sink_configured = config.result_sink_url.is_some();
    let analyzer_ids = crate::analyzer::analyzer_ids();
    param::validate(&params, sink_configured, &analyzer_ids)?;

    let plan = plan::build_scan_plan(&params, sink_configured)?;
    orchestrator::run(plan, config).await?;
    Ok(())
}

#[cfg(unix)]
fn shutdown_signal() -> impl std::future::Future<Output = ()> {
    use tokio::signal::unix::{signal, SignalKind};
    Box::pin(async move {
        let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = sigint.recv() => {}
            _ = sigterm.recv() => {}
        }
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> impl std::future::Future<Output = ()> {
    Box::pin(async move {
        let _ = tokio::signal::ctrl_c().await;
    })
}
