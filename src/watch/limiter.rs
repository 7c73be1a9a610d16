//! Admission gate bounding the number of in-flight feed fetches.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A counting admission gate.
///
/// Every fetch task acquires one permit before issuing its request and holds
/// it until the fetch completes, success or failure. Tasks may all be created
/// up front; only `limit` of them run their fetch at any instant. Admission
/// follows submission order on a best-effort basis, there is no fairness
/// guarantee beyond that.
#[derive(Clone)]
pub struct FetchGate {
    permits: Arc<Semaphore>,
}

impl FetchGate {
    /// Creates a gate admitting at most `limit` concurrent fetches.
    pub fn new(limit: usize) -> Self {
        FetchGate {
            permits: Arc::new(Semaphore::new(limit)),
        }
    }

    /// Waits for and takes one permit.
    ///
    /// The permit is released when the returned guard is dropped.
    pub async fn acquire(&self) -> OwnedSemaphorePermit {
        // The semaphore is never closed, acquisition cannot fail.
        self.permits
            .clone()
            .acquire_owned()
            .await
            .expect("gate semaphore closed")
    }

    /// Number of permits currently available.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}
