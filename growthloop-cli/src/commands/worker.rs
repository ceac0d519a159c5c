//! `growthloop worker`: pulls tasks off the shared queue and drives them
//! through the orchestrator, grounded on `vibes-cli`'s foreground-run shape
//! in `commands::serve` but looping on [`growthloop_tasks::TaskBroker`]
//! instead of serving HTTP.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tracing::{error, info, warn};

use growthloop_tasks::{TaskBroker, TaskKind};

use crate::wiring::build_components;

#[derive(Debug, Args)]
pub struct WorkerArgs {
    /// How long to sleep between empty polls of the task queue.
    #[arg(long, default_value_t = 500)]
    pub poll_interval_ms: u64,
}

pub async fn run(args: WorkerArgs) -> Result<()> {
    let components = build_components().await?;
    let broker = components.broker;
    let workflow = components.workflow;

    info!("worker started, polling for tasks");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("received shutdown signal, stopping worker");
                return Ok(());
            }
            task = broker.poll_next() => {
                match task {
                    Ok(Some(task)) => {
                        let task_id = task.task_id;
                        let outcome = match task.kind.clone() {
                            TaskKind::RunCampaignWorkflow { campaign_id } => {
                                workflow.run_campaign_workflow(task_id, campaign_id).await
                            }
                            TaskKind::AnalyzeCampaignOutcome { campaign_id, actual_metrics } => {
                                workflow
                                    .run_outcome_analysis(task_id, campaign_id, actual_metrics)
                                    .await
                            }
                            TaskKind::AnalyzePreviousCampaigns { user_id, campaign_id } => {
                                workflow
                                    .run_analyze_previous_campaigns(task_id, user_id, campaign_id)
                                    .await;
                                Ok(())
                            }
                        };

                        match outcome {
                            Ok(()) => {
                                if let Err(e) = broker.ack(task_id).await {
                                    error!(error = %e, %task_id, "failed to ack completed task");
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, %task_id, "task failed");
                                if task.kind.is_retryable() {
                                    match broker.nack_retry(task_id).await {
                                        Ok(true) => info!(%task_id, "task requeued for another attempt"),
                                        Ok(false) => warn!(%task_id, "task exhausted its retries"),
                                        Err(e) => error!(error = %e, %task_id, "failed to requeue task"),
                                    }
                                }
                            }
                        }
                    }
                    Ok(None) => tokio::time::sleep(Duration::from_millis(args.poll_interval_ms)).await,
                    Err(e) => {
                        error!(error = %e, "failed to poll task queue");
                        tokio::time::sleep(Duration::from_millis(args.poll_interval_ms)).await;
                    }
                }
            }
        }
    }
}
