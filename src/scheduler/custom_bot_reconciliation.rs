use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{error::AppError, service::custom_bot::CustomBotsManager};

/// Starts the daily custom bot reconciliation scheduler
///
/// The job runs at 00:00 UTC and aligns in-memory and external process state
/// with the database of active subscriptions. Reconciliation errors are
/// logged and never abort the scheduler.
///
/// # Arguments
/// - `manager`: The custom bot supervisor to reconcile
pub async fn start_scheduler(manager: Arc<CustomBotsManager>) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job_manager = manager.clone();

    // Schedule job to run daily at midnight UTC
    let job = Job::new_async("0 0 0 * * *", move |_uuid, _lock| {
        let manager = job_manager.clone();

        Box::pin(async move {
            if let Err(e) = manager.validate_running_processes().await {
                tracing::error!("Error reconciling custom bot processes: {}", e);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Custom bot reconciliation scheduler started");

    Ok(())
}
