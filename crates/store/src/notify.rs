//! Fire-and-forget user notification hub backed by `tokio::sync::broadcast`.
//!
//! [`Notifier`] carries toast notifications from store operations to however
//! many UI surfaces are listening. It is purely observational: publishing
//! never fails, influences no control flow, and sends with zero subscribers
//! are silently dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Toast
// ---------------------------------------------------------------------------

/// Visual category of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    /// An operation is in flight.
    Pending,
    Success,
    Error,
}

/// One user-visible notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Toast {
    fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// Broadcast hub for [`Toast`]s.
///
/// Cheap to clone; all clones publish into the same channel. Subscribers that
/// fall behind the buffer observe a `RecvError::Lagged` and miss the oldest
/// toasts.
#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Toast>,
}

impl Notifier {
    /// Create a notifier with a specific channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all toasts published on this hub.
    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.sender.subscribe()
    }

    pub fn pending(&self, message: impl Into<String>) {
        self.publish(Toast::new(ToastKind::Pending, message));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(Toast::new(ToastKind::Success, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(Toast::new(ToastKind::Error, message));
    }

    fn publish(&self, toast: Toast) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(toast);
    }

    /// Wrap a fallible operation in the pending → outcome toast protocol.
    ///
    /// Emits the pending toast immediately, awaits the future, then emits
    /// exactly one success or error toast. The error toast is produced by
    /// `error`, which receives the failure detail. The operation's result is
    /// returned unchanged.
    pub async fn announce<T, E, F, Fut>(
        &self,
        pending: &str,
        success: &str,
        error: F,
        fut: Fut,
    ) -> Result<T, E>
    where
        Fut: std::future::Future<Output = Result<T, E>>,
        F: FnOnce(&E) -> String,
    {
        self.pending(pending);
        match fut.await {
            Ok(value) => {
                self.success(success);
                Ok(value)
            }
            Err(e) => {
                self.error(error(&e));
                Err(e)
            }
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
