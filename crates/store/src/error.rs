use tourwidget_core::error::CoreError;

use crate::remote::RemoteError;

/// Failure of a store operation.
///
/// Every variant is recoverable by retrying the user action or reloading the
/// tour list; nothing here is fatal to the process. The store converts each
/// failure into a user-visible toast before returning it, so callers only
/// need the variant to decide whether to stay on the current form.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A domain-level error from `tourwidget_core` (validation, not-found).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The persistence service reported a failure.
    #[error("Remote persistence error: {0}")]
    Remote(#[from] RemoteError),

    /// No active session; the remote write was never attempted.
    #[error("Not authenticated")]
    Unauthenticated,

    /// The service reported success but touched zero rows — the write was
    /// silently filtered (row not found, or permission rules excluded it).
    #[error("{0}")]
    Rejected(String),
}

/// Convenience alias for store operation return values.
pub type StoreResult<T> = Result<T, StoreError>;
