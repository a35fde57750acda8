//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler (REQUEST_EXPIRY_CRON, hourly by default)
//!     │
//!     └─► expire_overdue_requests(now)
//!             └─► PENDING requests past expires_at → EXPIRED
//! ```

use anyhow::Result;
use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler};

use super::ServerDeps;
use crate::domains::requests::expire_overdue_requests;

/// Start all scheduled tasks
pub async fn start_scheduler(deps: ServerDeps, expiry_cron: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let expiry_deps = deps.clone();
    let expiry_job = Job::new_async(expiry_cron, move |_uuid, _lock| {
        let deps = expiry_deps.clone();
        Box::pin(async move {
            if let Err(e) = run_request_expiry(&deps).await {
                tracing::error!("Request expiry task failed: {}", e);
            }
        })
    })?;

    scheduler.add(expiry_job).await?;
    scheduler.start().await?;

    tracing::info!(cron = expiry_cron, "Scheduled tasks started (request expiry)");
    Ok(scheduler)
}

async fn run_request_expiry(deps: &ServerDeps) -> Result<()> {
    let expired = expire_overdue_requests(deps, Utc::now()).await?;

    if expired == 0 {
        tracing::debug!("No overdue requests");
    } else {
        tracing::info!("Request expiry complete: expired {} requests", expired);
    }

    Ok(())
}
