mod session_cleanup;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::info;

use crate::services::session_store::SessionStore;

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("scheduler error: {0}")]
    Scheduler(#[from] JobSchedulerError),
}

pub struct WorkerManager {
    scheduler: Mutex<JobScheduler>,
    sessions: Arc<SessionStore>,
}

impl WorkerManager {
    pub async fn new(sessions: Arc<SessionStore>) -> Result<Self, WorkerError> {
        let scheduler = JobScheduler::new().await?;
        Ok(Self {
            scheduler: Mutex::new(scheduler),
            sessions,
        })
    }

    pub async fn start(&self, schedule: &str, idle_ttl: Duration) -> Result<(), WorkerError> {
        let scheduler = self.scheduler.lock().await;

        let sessions = Arc::clone(&self.sessions);
        let job = Job::new_async(schedule, move |_uuid, _lock| {
            let sessions = Arc::clone(&sessions);
            Box::pin(async move {
                session_cleanup::evict_idle_sessions(&sessions, idle_ttl);
            })
        })?;
        scheduler.add(job).await?;
        info!(
            schedule = %schedule,
            idle_ttl_secs = idle_ttl.as_secs(),
            "Session cleanup worker scheduled"
        );

        scheduler.start().await?;
        Ok(())
    }

    pub async fn stop(&self) {
        let mut scheduler = self.scheduler.lock().await;
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Scheduler shutdown error");
        }
        info!("Workers stopped");
    }
}
