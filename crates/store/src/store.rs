//! The tour store: a local cache of the signed-in user's tours, kept honest
//! against the remote persistence service.
//!
//! [`TourStore`] is created at session start, handed to the UI, and dropped
//! at sign-out; it owns the only copy of the cached tour list. Mutations
//! follow one of two shapes:
//!
//! - **Plain**: validate, write remotely, then re-fetch so service-assigned
//!   fields land in the cache (`add_tour`, `update_tour`).
//! - **Optimistic**: patch the cache first so the UI reflects the change
//!   with zero latency, then confirm remotely; a rejected write restores the
//!   exact pre-mutation snapshot (`update_step`, `delete_step`,
//!   `delete_tour`).
//!
//! Operations are not serialized against each other. Concurrent mutations
//! race at the service, and the cache reflects whichever resolution lands
//! last.

use std::collections::HashMap;

use tokio::sync::RwLock;

use tourwidget_core::error::CoreError;
use tourwidget_core::tour::{self, sort_steps, CreateTour, Step, StepPatch, Tour};
use tourwidget_core::types::EntityId;

use crate::error::{StoreError, StoreResult};
use crate::notify::Notifier;
use crate::remote::{NewStep, NewTour, StepChanges, TourChanges, TourRemote};

/// In-memory view of the current user's tours, synchronized against a
/// [`TourRemote`].
pub struct TourStore<R> {
    remote: R,
    notifier: Notifier,
    tours: RwLock<Vec<Tour>>,
}

impl<R: TourRemote> TourStore<R> {
    /// Create a store over `remote`. The cache starts empty; call
    /// [`fetch_tours`](Self::fetch_tours) to populate it.
    pub fn new(remote: R, notifier: Notifier) -> Self {
        Self {
            remote,
            notifier,
            tours: RwLock::new(Vec::new()),
        }
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Snapshot of the cached tour list, in the order the service returned
    /// it (newest first).
    pub async fn tours(&self) -> Vec<Tour> {
        self.tours.read().await.clone()
    }

    /// Look up a cached tour by id. Never touches the network; an unknown id
    /// is `None`.
    pub async fn tour_by_id(&self, id: &str) -> Option<Tour> {
        self.tours.read().await.iter().find(|t| t.id == id).cloned()
    }

    // -----------------------------------------------------------------------
    // Fetch
    // -----------------------------------------------------------------------

    /// Replace the cache with the remote's view of the current user's tours.
    ///
    /// Each tour's steps come back sorted by the presentation ordering
    /// policy. Any failure — including a missing session — empties the cache
    /// and surfaces an error toast; the call itself never fails, so callers
    /// can fire it for reconciliation without handling an outcome.
    pub async fn fetch_tours(&self) {
        match self.load_all().await {
            Ok(tours) => {
                tracing::debug!(count = tours.len(), "Tour cache replaced");
                *self.tours.write().await = tours;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load tours");
                self.tours.write().await.clear();
                self.notifier.error("Failed to load tours");
            }
        }
    }

    async fn load_all(&self) -> StoreResult<Vec<Tour>> {
        let user = self
            .remote
            .current_user()
            .await?
            .ok_or(StoreError::Unauthenticated)?;

        let tour_rows = self.remote.list_tours(&user).await?;
        let ids: Vec<EntityId> = tour_rows.iter().map(|t| t.id.clone()).collect();
        let step_rows = self.remote.list_steps(&ids).await?;

        let mut steps_by_tour: HashMap<EntityId, Vec<Step>> = HashMap::new();
        for row in step_rows {
            steps_by_tour
                .entry(row.tour_id.clone())
                .or_default()
                .push(Step {
                    id: row.id,
                    tour_id: row.tour_id,
                    title: row.title,
                    description: row.description,
                    target_selector: row.target_selector,
                    created_at: row.created_at,
                });
        }

        Ok(tour_rows
            .into_iter()
            .map(|row| {
                let mut steps = steps_by_tour.remove(&row.id).unwrap_or_default();
                sort_steps(&mut steps);
                Tour {
                    id: row.id,
                    title: row.title,
                    description: row.description,
                    created_date: row.created_date,
                    status: row.status,
                    steps,
                }
            })
            .collect())
    }

    // -----------------------------------------------------------------------
    // Plain mutations
    // -----------------------------------------------------------------------

    /// Create a tour and its initial steps as one logical unit, then re-fetch
    /// so the service-assigned ids and timestamps land in the cache.
    ///
    /// If the steps insert fails after the tour insert succeeded, the
    /// operation fails and the stranded tour row is left in place; the next
    /// successful fetch surfaces it. There is no automatic cleanup.
    pub async fn add_tour(&self, input: CreateTour) -> StoreResult<()> {
        self.check(&input)?;
        self.notifier
            .announce(
                "Creating your tour...",
                "Tour created successfully!",
                |e| format!("Failed: {e}"),
                self.create_tour(input),
            )
            .await
    }

    async fn create_tour(&self, input: CreateTour) -> StoreResult<()> {
        let user = self
            .remote
            .current_user()
            .await?
            .ok_or(StoreError::Unauthenticated)?;

        let CreateTour {
            title,
            description,
            status,
            steps,
        } = input;
        let created = self
            .remote
            .insert_tour(
                &user,
                NewTour {
                    title,
                    description,
                    status,
                },
            )
            .await?;
        tracing::info!(id = %created.id, "Tour created");

        if !steps.is_empty() {
            let rows: Vec<NewStep> = steps
                .into_iter()
                .map(|s| NewStep {
                    tour_id: created.id.clone(),
                    title: s.title,
                    description: s.description,
                    target_selector: s.target_selector,
                })
                .collect();
            self.remote.insert_steps(rows).await?;
        }

        self.fetch_tours().await;
        Ok(())
    }

    /// Update a tour's scalar fields. Steps are never rewritten through this
    /// call. Re-fetches on success; on failure the cache is untouched until
    /// the next fetch.
    pub async fn update_tour(&self, tour: Tour) -> StoreResult<()> {
        if let Err(e) = tour::validate_title(&tour.title) {
            self.notifier.error(e.to_string());
            return Err(e.into());
        }

        let id = tour.id;
        let changes = TourChanges {
            title: tour.title,
            description: tour.description,
            status: tour.status,
        };
        self.notifier
            .announce(
                "Saving changes...",
                "Tour updated successfully!",
                |e| format!("Failed: {e}"),
                async {
                    let affected = self.remote.update_tour(&id, changes).await?;
                    if affected == 0 {
                        return Err(StoreError::Rejected(
                            "Tour not found or permission denied".to_string(),
                        ));
                    }
                    tracing::info!(id = %id, "Tour updated");
                    self.fetch_tours().await;
                    Ok(())
                },
            )
            .await
    }

    // -----------------------------------------------------------------------
    // Optimistic mutations
    // -----------------------------------------------------------------------

    /// Replace a step's editable fields.
    ///
    /// The cache is patched before the remote call is issued, so the change
    /// is readable through [`tour_by_id`](Self::tour_by_id) immediately. A
    /// remote error or a zero-row update restores the pre-mutation snapshot;
    /// success re-fetches to absorb service-derived fields.
    pub async fn update_step(
        &self,
        tour_id: &str,
        step_id: &str,
        patch: StepPatch,
    ) -> StoreResult<()> {
        self.check(&patch)?;

        let changes = StepChanges {
            title: patch.title.clone(),
            description: patch.description.clone(),
            target_selector: patch.target_selector.clone(),
        };
        let Some(snapshot) = self
            .mutate_cache(|tours| {
                let Some(step) = tours
                    .iter_mut()
                    .find(|t| t.id == tour_id)
                    .and_then(|t| t.steps.iter_mut().find(|s| s.id == step_id))
                else {
                    return false;
                };
                step.title = patch.title;
                step.description = patch.description;
                step.target_selector = patch.target_selector;
                true
            })
            .await
        else {
            return Err(self.not_found("step", step_id));
        };

        let confirmed = self
            .notifier
            .announce(
                "Updating step...",
                "Step updated successfully!",
                |_| "Failed to update step".to_string(),
                async {
                    let affected = self.remote.update_step(step_id, changes).await?;
                    if affected == 0 {
                        return Err(StoreError::Rejected(
                            "Step not found or permission denied".to_string(),
                        ));
                    }
                    Ok(())
                },
            )
            .await;

        match self.settle(snapshot, confirmed).await {
            Ok(()) => {
                tracing::info!(id = %step_id, "Step updated");
                self.fetch_tours().await;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, id = %step_id, "Step update rejected");
                Err(e)
            }
        }
    }

    /// Remove a step from its tour, locally first.
    pub async fn delete_step(&self, tour_id: &str, step_id: &str) -> StoreResult<()> {
        let Some(snapshot) = self
            .mutate_cache(|tours| {
                let Some(tour) = tours.iter_mut().find(|t| t.id == tour_id) else {
                    return false;
                };
                let before = tour.steps.len();
                tour.steps.retain(|s| s.id != step_id);
                tour.steps.len() != before
            })
            .await
        else {
            return Err(self.not_found("step", step_id));
        };

        let confirmed = self
            .notifier
            .announce(
                "Deleting step...",
                "Step deleted",
                |e| format!("Failed to delete step: {e}"),
                async {
                    let affected = self.remote.delete_step(step_id).await?;
                    if affected == 0 {
                        return Err(StoreError::Rejected(
                            "Step not found or permission denied".to_string(),
                        ));
                    }
                    Ok(())
                },
            )
            .await;

        match self.settle(snapshot, confirmed).await {
            Ok(()) => {
                tracing::info!(id = %step_id, "Step deleted");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, id = %step_id, "Step delete rejected");
                Err(e)
            }
        }
    }

    /// Remove a whole tour, locally first.
    pub async fn delete_tour(&self, id: &str) -> StoreResult<()> {
        let Some(snapshot) = self
            .mutate_cache(|tours| {
                let before = tours.len();
                tours.retain(|t| t.id != id);
                tours.len() != before
            })
            .await
        else {
            return Err(self.not_found("tour", id));
        };

        let confirmed = self
            .notifier
            .announce(
                "Deleting tour...",
                "Tour deleted",
                |e| format!("Failed: {e}"),
                async {
                    let affected = self.remote.delete_tour(id).await?;
                    if affected == 0 {
                        return Err(StoreError::Rejected(
                            "Tour not found or permission denied".to_string(),
                        ));
                    }
                    Ok(())
                },
            )
            .await;

        match self.settle(snapshot, confirmed).await {
            Ok(()) => {
                tracing::info!(id = %id, "Tour deleted");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, id = %id, "Tour delete rejected");
                Err(e)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Validate an input DTO, converting a failure into an error toast plus
    /// a typed error. Runs before any remote call.
    fn check(&self, input: &impl validator::Validate) -> StoreResult<()> {
        match tour::validate(input) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.notifier.error(e.to_string());
                Err(e.into())
            }
        }
    }

    fn not_found(&self, entity: &'static str, id: &str) -> StoreError {
        let err = CoreError::NotFound {
            entity,
            id: id.to_string(),
        };
        self.notifier.error(err.to_string());
        err.into()
    }

    /// Capture a pre-mutation snapshot and apply `mutate` to the cache.
    ///
    /// Returns the snapshot when `mutate` changed something, `None` when the
    /// target was not in the cache. The write lock is held only for the
    /// synchronous closure.
    async fn mutate_cache(
        &self,
        mutate: impl FnOnce(&mut Vec<Tour>) -> bool,
    ) -> Option<Vec<Tour>> {
        let mut tours = self.tours.write().await;
        let snapshot = tours.clone();
        if mutate(&mut tours) {
            Some(snapshot)
        } else {
            None
        }
    }

    /// Settle an optimistic mutation: keep it on success, restore the exact
    /// pre-mutation snapshot on failure.
    async fn settle(&self, snapshot: Vec<Tour>, confirmed: StoreResult<()>) -> StoreResult<()> {
        if let Err(e) = confirmed {
            *self.tours.write().await = snapshot;
            return Err(e);
        }
        Ok(())
    }
}
