use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::services::ImageStore;

/// Periodically deletes stored images older than the retention window.
pub struct ImageSweeper {
    store: Arc<ImageStore>,
    retention: Duration,
    scheduler: JobScheduler,
}

impl ImageSweeper {
    pub async fn new(store: Arc<ImageStore>, retention: Duration) -> Result<Self> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            store,
            retention,
            scheduler,
        })
    }

    pub async fn start(&mut self) -> Result<()> {
        // Every 10 minutes
        self.add_sweep_job("0 */10 * * * *").await?;

        self.scheduler.start().await?;

        log::info!(
            "✅ Image sweeper started (retention: {}h, dir: {})",
            self.retention.as_secs() / 3600,
            self.store.dir().display()
        );
        Ok(())
    }

    async fn add_sweep_job(&mut self, schedule: &str) -> Result<()> {
        let store = self.store.clone();
        let retention = self.retention;

        let job = Job::new_async(schedule, move |_uuid, _l| {
            let store = store.clone();

            Box::pin(async move {
                match store.sweep(retention).await {
                    Ok(0) => log::debug!("🧹 Image sweep: nothing to remove"),
                    Ok(removed) => log::info!("🧹 Image sweep removed {} file(s)", removed),
                    Err(e) => log::error!("❌ Image sweep failed: {}", e),
                }
            })
        })?;

        self.scheduler.add(job).await?;
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        self.scheduler.shutdown().await?;
        log::info!("Image sweeper stopped");
        Ok(())
    }
}
