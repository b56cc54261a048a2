use std::sync::Arc;

use tokio::sync::{Semaphore, SemaphorePermit};

/// Process-wide bound on how many `mecab` subprocesses may run concurrently.
///
/// Configured once at startup from `NumConcurrentLangJobs` (clamped to
/// `[1, 10]`) and shared by every worker task that calls [`crate::tokenise`].
#[derive(Clone)]
pub struct AnalyzerPool {
    sem: Arc<Semaphore>,
}

impl AnalyzerPool {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, 10);
        Self {
            sem: Arc::new(Semaphore::new(capacity)),
        }
    }

    /// Acquire a permit, blocking (asynchronously) until one is free.
    ///
    /// The returned guard releases the permit on drop, including when the
    /// holding future is cancelled.
    pub async fn acquire(&self) -> SemaphorePermit<'_> {
        self.sem
            .acquire()
            .await
            .expect("analyzer pool semaphore is never closed")
    }
}
