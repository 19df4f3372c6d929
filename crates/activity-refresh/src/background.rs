use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

type BoxedJob = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// The host's "run-until-done" background task hook: cooperative
/// platforms enqueue their ingestion+reassembly work here instead of
/// running it inline. The orchestrator must tolerate this being absent —
/// callers that have no host-managed extension pass [`InlineBackgroundTasks`],
/// which just awaits the job before returning.
#[async_trait]
pub trait BackgroundTasks: Send + Sync {
    async fn spawn(&self, job: BoxedJob);
}

/// Runs a job immediately and awaits it — what tests (and hosts with no
/// deferred-work extension) pass to the orchestrator.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineBackgroundTasks;

#[async_trait]
impl BackgroundTasks for InlineBackgroundTasks {
    async fn spawn(&self, job: BoxedJob) {
        job.await;
    }
}

/// Production hook: fires the job on a detached `tokio::spawn`, bounded by
/// a semaphore (mirrors the reference event bus's backpressure permit) and
/// cooperating with a [`CancellationToken`] (mirrors the reference
/// scheduler's shutdown hook) — a cancelled token lets an in-flight job
/// finish its current `put` but stops new jobs from starting.
#[derive(Clone)]
pub struct TokioBackgroundTasks {
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl TokioBackgroundTasks {
    pub fn new(cancel: CancellationToken, max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            cancel,
        }
    }
}

#[async_trait]
impl BackgroundTasks for TokioBackgroundTasks {
    async fn spawn(&self, job: BoxedJob) {
        if self.cancel.is_cancelled() {
            tracing::warn!("background hook cancelled, dropping queued job");
            return;
        }
        let permit = match self.semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => return,
        };
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            if cancel.is_cancelled() {
                drop(permit);
                return;
            }
            job.await;
            drop(permit);
        });
    }
}
