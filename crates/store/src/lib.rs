//! Tour/step synchronization for the tourwidget dashboard.
//!
//! This crate keeps a local, consistent view of the signed-in user's tours
//! in front of a remote persistence service:
//!
//! - [`TourStore`] — the cache plus every create/read/update/delete
//!   operation, with optimistic updates and snapshot rollback.
//! - [`remote`] — the [`TourRemote`](remote::TourRemote) seam the hosted
//!   backend sits behind, with its wire records.
//! - [`Notifier`] — fire-and-forget toast hub the store reports progress
//!   through.
//! - [`memory`] — in-memory backend for the demo dataset and tests.

pub mod error;
pub mod memory;
pub mod notify;
pub mod remote;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use notify::{Notifier, Toast, ToastKind};
pub use store::TourStore;
