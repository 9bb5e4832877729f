//! Thumbnail job queue for filevault.
//!
//! Every stored image produces one [`ThumbnailJob`]. Generating the
//! thumbnails is the business of an external worker; this side only hands
//! the job over without making the upload wait for it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{Result, VaultError};

/// Request to derive thumbnails for a stored image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailJob {
    /// Owner of the image.
    pub owner_id: i64,
    /// Image node ID.
    pub file_id: i64,
}

/// Destination for thumbnail jobs.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Enqueue a job.
    async fn push(&self, job: ThumbnailJob) -> Result<()>;
}

/// In-process queue backed by a tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelQueue {
    tx: mpsc::UnboundedSender<ThumbnailJob>,
}

impl ChannelQueue {
    /// Create a queue and the receiver the consumer reads from.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ThumbnailJob>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl JobQueue for ChannelQueue {
    async fn push(&self, job: ThumbnailJob) -> Result<()> {
        self.tx
            .send(job)
            .map_err(|_| VaultError::Queue("thumbnail consumer has gone away".to_string()))
    }
}

/// A job handed out to a worker.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ClaimedJob {
    /// Queue entry ID, used to acknowledge the job.
    pub id: i64,
    /// Owner of the image.
    pub owner_id: i64,
    /// Image node ID.
    pub file_id: i64,
    /// How many times the job has been claimed, this claim included.
    pub attempts: i64,
}

impl ClaimedJob {
    /// The job payload.
    pub fn job(&self) -> ThumbnailJob {
        ThumbnailJob {
            owner_id: self.owner_id,
            file_id: self.file_id,
        }
    }
}

/// Durable queue stored in the `thumbnail_jobs` table.
///
/// Workers claim a job for a lease period and acknowledge it with
/// [`SqlJobQueue::complete`]. A job whose lease runs out before it is
/// acknowledged becomes claimable again, so every job is delivered at
/// least once.
#[derive(Debug, Clone)]
pub struct SqlJobQueue {
    pool: SqlitePool,
}

impl SqlJobQueue {
    /// Create a queue sharing the given pool.
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }

    /// Claim the oldest available job for `lease_secs` seconds.
    pub async fn claim(&self, lease_secs: i64) -> Result<Option<ClaimedJob>> {
        let now = Utc::now().timestamp();
        let job = sqlx::query_as::<_, ClaimedJob>(
            "UPDATE thumbnail_jobs
             SET claimed_until = ?, attempts = attempts + 1
             WHERE id = (
                 SELECT id FROM thumbnail_jobs
                 WHERE completed_at IS NULL
                   AND (claimed_until IS NULL OR claimed_until <= ?)
                 ORDER BY id LIMIT 1
             )
             RETURNING id, owner_id, file_id, attempts",
        )
        .bind(now.saturating_add(lease_secs.max(0)))
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    /// Acknowledge a claimed job.
    ///
    /// Returns `false` if the job does not exist or was already completed.
    pub async fn complete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE thumbnail_jobs SET completed_at = datetime('now')
             WHERE id = ? AND completed_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count jobs not yet completed.
    pub async fn pending_count(&self) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM thumbnail_jobs WHERE completed_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

#[async_trait]
impl JobQueue for SqlJobQueue {
    async fn push(&self, job: ThumbnailJob) -> Result<()> {
        sqlx::query("INSERT INTO thumbnail_jobs (owner_id, file_id) VALUES (?, ?)")
            .bind(job.owner_id)
            .bind(job.file_id)
            .execute(&self.pool)
            .await
            .map_err(|e| VaultError::Queue(e.to_string()))?;
        Ok(())
    }
}

/// Hands thumbnail jobs to the queue in the background.
#[derive(Clone)]
pub struct ThumbnailDispatcher {
    queue: Arc<dyn JobQueue>,
}

impl ThumbnailDispatcher {
    /// Create a dispatcher over the given queue.
    pub fn new(queue: Arc<dyn JobQueue>) -> Self {
        Self { queue }
    }

    /// Push `job` on a spawned task and return immediately.
    ///
    /// Failures are logged and otherwise ignored. The handle only matters
    /// to callers that want to wait for the hand-off.
    pub fn enqueue(&self, job: ThumbnailJob) -> JoinHandle<()> {
        let queue = Arc::clone(&self.queue);
        tokio::spawn(async move {
            match queue.push(job).await {
                Ok(()) => debug!(file_id = job.file_id, "Thumbnail job queued"),
                Err(e) => warn!(file_id = job.file_id, "Failed to queue thumbnail job: {}", e),
            }
        })
    }
}
