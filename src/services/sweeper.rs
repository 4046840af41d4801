//! Sweeper service
//!
//! Runs the expired-trash sweep on a cron schedule. The sweep itself is
//! idempotent and claims entries one at a time, so it is safe alongside
//! user-initiated restores and purges and alongside another sweep.

use crate::config::SWEEP_CRON;
use crate::error::{AppError, Result};
use crate::services::TrashService;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_cron_scheduler::{Job, JobScheduler};

/// Scheduler service for the periodic trash expiry sweep
pub struct SweeperService {
    scheduler: Arc<RwLock<JobScheduler>>,
    trash_service: Arc<TrashService>,
}

impl SweeperService {
    /// Create new sweeper service
    pub async fn new(trash_service: TrashService) -> Result<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler: Arc::new(RwLock::new(scheduler)),
            trash_service: Arc::new(trash_service),
        })
    }

    /// Register the sweep job and start the scheduler
    pub async fn start(&self) -> Result<()> {
        let trash_service = Arc::clone(&self.trash_service);

        let job = Job::new_async(SWEEP_CRON, move |_uuid, _l| {
            let trash_service = Arc::clone(&trash_service);
            Box::pin(async move {
                tracing::debug!("Running scheduled trash expiry sweep");

                match trash_service.sweep_expired().await {
                    Ok(count) if count > 0 => {
                        tracing::info!("Scheduled sweep purged {} expired entries", count);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!("Scheduled trash sweep failed: {}", e);
                    }
                }
            })
        })
        .map_err(|e| AppError::Scheduler(format!("Failed to create sweep job: {}", e)))?;

        let scheduler = self.scheduler.write().await;
        scheduler
            .add(job)
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to schedule sweep: {}", e)))?;
        scheduler
            .start()
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Trash sweep scheduled: {}", SWEEP_CRON);
        Ok(())
    }

    /// Shutdown scheduler gracefully
    pub async fn shutdown(&self) -> Result<()> {
        let mut scheduler = self.scheduler.write().await;
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to shutdown scheduler: {}", e)))?;
        tracing::info!("Trash sweep scheduler shutdown");
        Ok(())
    }
}
