//! Shared harness for the store integration suites.
//!
//! Wraps [`InMemoryRemote`] in decorators that inject the failure modes the
//! hosted service can exhibit: hard errors, and "successful" writes that
//! touch zero rows.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::sync::Semaphore;

use tourwidget_core::types::{EntityId, UserId};
use tourwidget_store::memory::InMemoryRemote;
use tourwidget_store::remote::{
    NewStep, NewTour, RemoteError, StepChanges, StepRecord, TourChanges, TourRecord, TourRemote,
};
use tourwidget_store::{Notifier, Toast, TourStore};

/// Build a store over `remote` plus a receiver for its toasts.
pub fn store_with<R: TourRemote>(remote: R) -> (TourStore<R>, broadcast::Receiver<Toast>) {
    let notifier = Notifier::default();
    let toasts = notifier.subscribe();
    (TourStore::new(remote, notifier), toasts)
}

/// Collect every toast published so far.
pub fn drain(toasts: &mut broadcast::Receiver<Toast>) -> Vec<Toast> {
    let mut out = Vec::new();
    while let Ok(toast) = toasts.try_recv() {
        out.push(toast);
    }
    out
}

// ---------------------------------------------------------------------------
// FlakyRemote
// ---------------------------------------------------------------------------

/// Failure switches shared between a test and the [`FlakyRemote`] it armed.
#[derive(Default)]
pub struct Faults {
    /// Total remote calls observed, across every method.
    pub calls: AtomicUsize,
    /// `insert_steps` reports a constraint violation.
    pub fail_insert_steps: AtomicBool,
    /// `update_tour` reports success with zero affected rows.
    pub zero_rows_on_update_tour: AtomicBool,
    /// `update_step` reports success with zero affected rows.
    pub zero_rows_on_update_step: AtomicBool,
    /// `delete_step` fails with a connection error.
    pub fail_delete_step: AtomicBool,
    /// `delete_tour` fails with a connection error.
    pub fail_delete_tour: AtomicBool,
}

impl Faults {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// [`TourRemote`] decorator that counts calls and injects armed faults,
/// delegating everything else to an [`InMemoryRemote`].
pub struct FlakyRemote {
    inner: InMemoryRemote,
    faults: Arc<Faults>,
}

impl FlakyRemote {
    pub fn over(inner: InMemoryRemote) -> Self {
        Self {
            inner,
            faults: Arc::new(Faults::default()),
        }
    }

    /// Handle for arming faults after the remote has moved into a store.
    pub fn faults(&self) -> Arc<Faults> {
        Arc::clone(&self.faults)
    }
}

impl TourRemote for FlakyRemote {
    async fn current_user(&self) -> Result<Option<UserId>, RemoteError> {
        self.faults.tick();
        self.inner.current_user().await
    }

    async fn list_tours(&self, user_id: &str) -> Result<Vec<TourRecord>, RemoteError> {
        self.faults.tick();
        self.inner.list_tours(user_id).await
    }

    async fn list_steps(&self, tour_ids: &[EntityId]) -> Result<Vec<StepRecord>, RemoteError> {
        self.faults.tick();
        self.inner.list_steps(tour_ids).await
    }

    async fn insert_tour(&self, user_id: &str, tour: NewTour) -> Result<TourRecord, RemoteError> {
        self.faults.tick();
        self.inner.insert_tour(user_id, tour).await
    }

    async fn insert_steps(&self, steps: Vec<NewStep>) -> Result<(), RemoteError> {
        self.faults.tick();
        if self.faults.fail_insert_steps.load(Ordering::SeqCst) {
            return Err(RemoteError::Constraint("steps insert rejected".to_string()));
        }
        self.inner.insert_steps(steps).await
    }

    async fn update_tour(&self, id: &str, changes: TourChanges) -> Result<u64, RemoteError> {
        self.faults.tick();
        if self.faults.zero_rows_on_update_tour.load(Ordering::SeqCst) {
            return Ok(0);
        }
        self.inner.update_tour(id, changes).await
    }

    async fn update_step(&self, id: &str, changes: StepChanges) -> Result<u64, RemoteError> {
        self.faults.tick();
        if self.faults.zero_rows_on_update_step.load(Ordering::SeqCst) {
            return Ok(0);
        }
        self.inner.update_step(id, changes).await
    }

    async fn delete_tour(&self, id: &str) -> Result<u64, RemoteError> {
        self.faults.tick();
        if self.faults.fail_delete_tour.load(Ordering::SeqCst) {
            return Err(RemoteError::Connection("connection reset".to_string()));
        }
        self.inner.delete_tour(id).await
    }

    async fn delete_step(&self, id: &str) -> Result<u64, RemoteError> {
        self.faults.tick();
        if self.faults.fail_delete_step.load(Ordering::SeqCst) {
            return Err(RemoteError::Connection("connection reset".to_string()));
        }
        self.inner.delete_step(id).await
    }
}

// ---------------------------------------------------------------------------
// GatedRemote
// ---------------------------------------------------------------------------

/// [`TourRemote`] decorator whose `update_step` blocks until the test grants
/// a permit, so in-flight optimistic state can be observed.
pub struct GatedRemote {
    pub inner: InMemoryRemote,
    pub gate: Arc<Semaphore>,
}

impl TourRemote for GatedRemote {
    async fn current_user(&self) -> Result<Option<UserId>, RemoteError> {
        self.inner.current_user().await
    }

    async fn list_tours(&self, user_id: &str) -> Result<Vec<TourRecord>, RemoteError> {
        self.inner.list_tours(user_id).await
    }

    async fn list_steps(&self, tour_ids: &[EntityId]) -> Result<Vec<StepRecord>, RemoteError> {
        self.inner.list_steps(tour_ids).await
    }

    async fn insert_tour(&self, user_id: &str, tour: NewTour) -> Result<TourRecord, RemoteError> {
        self.inner.insert_tour(user_id, tour).await
    }

    async fn insert_steps(&self, steps: Vec<NewStep>) -> Result<(), RemoteError> {
        self.inner.insert_steps(steps).await
    }

    async fn update_tour(&self, id: &str, changes: TourChanges) -> Result<u64, RemoteError> {
        self.inner.update_tour(id, changes).await
    }

    async fn update_step(&self, id: &str, changes: StepChanges) -> Result<u64, RemoteError> {
        let _permit = self.gate.acquire().await.expect("gate closed");
        self.inner.update_step(id, changes).await
    }

    async fn delete_tour(&self, id: &str) -> Result<u64, RemoteError> {
        self.inner.delete_tour(id).await
    }

    async fn delete_step(&self, id: &str) -> Result<u64, RemoteError> {
        self.inner.delete_step(id).await
    }
}
