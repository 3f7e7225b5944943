//! Persistence seam for the hosted backend.
//!
//! Defines [`TourRemote`], the trait every backing service implements, along
//! with the wire records and [`RemoteError`]. The hosted service owns
//! durability, authentication, and row-level security; this layer only
//! describes the calls the store makes against its `tours` and `steps`
//! collections and its identity endpoint.

use serde::{Deserialize, Serialize};
use tourwidget_core::tour::TourStatus;
use tourwidget_core::types::{EntityId, Timestamp, UserId};

// ---------------------------------------------------------------------------
// Wire records
// ---------------------------------------------------------------------------

/// A row from the `tours` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourRecord {
    pub id: EntityId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub status: TourStatus,
    pub created_date: Timestamp,
}

/// A row from the `steps` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub id: EntityId,
    pub tour_id: EntityId,
    pub title: String,
    pub description: String,
    pub target_selector: Option<String>,
    pub created_at: Timestamp,
}

/// Fields for inserting a tour row. The service assigns `id` and
/// `created_date`.
#[derive(Debug, Clone, Serialize)]
pub struct NewTour {
    pub title: String,
    pub description: String,
    pub status: TourStatus,
}

/// Fields for inserting a step row. The service assigns `id` and
/// `created_at`.
#[derive(Debug, Clone, Serialize)]
pub struct NewStep {
    pub tour_id: EntityId,
    pub title: String,
    pub description: String,
    pub target_selector: Option<String>,
}

/// Scalar updates applied to an existing tour row. Steps are never rewritten
/// through this record.
#[derive(Debug, Clone, Serialize)]
pub struct TourChanges {
    pub title: String,
    pub description: String,
    pub status: TourStatus,
}

/// Updates applied to an existing step row.
#[derive(Debug, Clone, Serialize)]
pub struct StepChanges {
    pub title: String,
    pub description: String,
    pub target_selector: Option<String>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure reported by (or while reaching) the persistence service.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The service could not be reached.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The service rejected the write (constraint violation).
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Any other service-reported failure.
    #[error("Backend error: {0}")]
    Backend(String),
}

// ---------------------------------------------------------------------------
// TourRemote
// ---------------------------------------------------------------------------

/// Trait implemented by every backing persistence service.
///
/// Reads are scoped to an owner; mutating calls return the **affected row
/// count** so callers can detect writes the service silently filtered
/// (row not found, or excluded by permission rules) and treat them as
/// failures rather than successes.
pub trait TourRemote: Send + Sync {
    /// Resolve the current session, yielding the authenticated user id or
    /// `None` when signed out.
    fn current_user(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<UserId>, RemoteError>> + Send;

    /// All tour rows owned by `user_id`, ordered by `created_date`
    /// descending.
    fn list_tours(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<TourRecord>, RemoteError>> + Send;

    /// All step rows whose owning tour is in `tour_ids`, in no particular
    /// order.
    fn list_steps(
        &self,
        tour_ids: &[EntityId],
    ) -> impl std::future::Future<Output = Result<Vec<StepRecord>, RemoteError>> + Send;

    /// Insert one tour row owned by `user_id`, returning the created row.
    fn insert_tour(
        &self,
        user_id: &str,
        tour: NewTour,
    ) -> impl std::future::Future<Output = Result<TourRecord, RemoteError>> + Send;

    /// Bulk-insert step rows.
    fn insert_steps(
        &self,
        steps: Vec<NewStep>,
    ) -> impl std::future::Future<Output = Result<(), RemoteError>> + Send;

    /// Update a tour row's scalar fields, returning the affected row count.
    fn update_tour(
        &self,
        id: &str,
        changes: TourChanges,
    ) -> impl std::future::Future<Output = Result<u64, RemoteError>> + Send;

    /// Update a step row, returning the affected row count.
    fn update_step(
        &self,
        id: &str,
        changes: StepChanges,
    ) -> impl std::future::Future<Output = Result<u64, RemoteError>> + Send;

    /// Delete a tour row (and, at the service's discretion, its dependent
    /// steps), returning the affected tour row count.
    fn delete_tour(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<u64, RemoteError>> + Send;

    /// Delete a step row, returning the affected row count.
    fn delete_step(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<u64, RemoteError>> + Send;
}
