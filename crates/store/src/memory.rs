//! In-memory implementation of [`TourRemote`].
//!
//! Backs the interactive demo and the test suites. Behaves like the hosted
//! service from the store's point of view: ids and creation timestamps are
//! assigned at insert, reads are filtered by owner and ordered, writes
//! against unknown rows report zero affected rows, and deleting a tour
//! cascades to its steps.

use chrono::{Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use tourwidget_core::analytics::{AnalyticsEvent, EventKind};
use tourwidget_core::tour::TourStatus;
use tourwidget_core::types::{EntityId, UserId};

use crate::remote::{
    NewStep, NewTour, RemoteError, StepChanges, StepRecord, TourChanges, TourRecord, TourRemote,
};

/// User id of the seeded demo account.
pub const DEMO_USER: &str = "demo-user";

#[derive(Default)]
struct State {
    session: Option<UserId>,
    tours: Vec<TourRecord>,
    steps: Vec<StepRecord>,
}

/// In-memory tour/step backend with session control.
pub struct InMemoryRemote {
    state: Mutex<State>,
}

impl InMemoryRemote {
    /// An empty backend with no active session.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// A backend pre-populated with the given rows and session.
    pub fn with_rows(
        session: Option<UserId>,
        tours: Vec<TourRecord>,
        steps: Vec<StepRecord>,
    ) -> Self {
        Self {
            state: Mutex::new(State {
                session,
                tours,
                steps,
            }),
        }
    }

    /// The demo dataset: three tours for [`DEMO_USER`], signed in.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let tour = |id: &str, title: &str, description: &str, status, age_days: i64| TourRecord {
            id: id.to_string(),
            user_id: DEMO_USER.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            status,
            created_date: now - Duration::days(age_days),
        };
        let step = |id: &str, tour_id: &str, title: &str, description: &str, selector: &str,
                    age_days: i64, offset_secs: i64| StepRecord {
            id: id.to_string(),
            tour_id: tour_id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            target_selector: Some(selector.to_string()),
            created_at: now - Duration::days(age_days) + Duration::seconds(offset_secs),
        };

        let tours = vec![
            tour(
                "tour-1",
                "Product Tour",
                "Guide users through your product features",
                TourStatus::Active,
                7,
            ),
            tour(
                "tour-2",
                "Onboarding Flow",
                "New user onboarding experience",
                TourStatus::Active,
                14,
            ),
            tour(
                "tour-3",
                "Advanced Features",
                "Unlock advanced features",
                TourStatus::Draft,
                30,
            ),
        ];
        let steps = vec![
            step("step-1", "tour-1", "Welcome", "Welcome to our product tour", "#hero", 7, 0),
            step("step-2", "tour-1", "Features", "Explore our amazing features", "#features", 7, 1),
            step(
                "step-3",
                "tour-1",
                "Getting Started",
                "Start using our platform in minutes",
                "#getting-started",
                7,
                2,
            ),
            step("step-4", "tour-2", "Create Account", "Create your first account", "#signup", 14, 0),
            step(
                "step-5",
                "tour-2",
                "Setup Profile",
                "Complete your profile information",
                "#profile",
                14,
                1,
            ),
            step("step-6", "tour-3", "Analytics", "Track your performance", "#analytics", 30, 0),
        ];

        Self::with_rows(Some(DEMO_USER.to_string()), tours, steps)
    }

    /// Start a session for `user`.
    pub async fn sign_in(&self, user: impl Into<UserId>) {
        self.state.lock().await.session = Some(user.into());
    }

    /// End the current session.
    pub async fn sign_out(&self) {
        self.state.lock().await.session = None;
    }
}

impl Default for InMemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl TourRemote for InMemoryRemote {
    async fn current_user(&self) -> Result<Option<UserId>, RemoteError> {
        Ok(self.state.lock().await.session.clone())
    }

    async fn list_tours(&self, user_id: &str) -> Result<Vec<TourRecord>, RemoteError> {
        let state = self.state.lock().await;
        let mut tours: Vec<TourRecord> = state
            .tours
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tours.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        Ok(tours)
    }

    async fn list_steps(&self, tour_ids: &[EntityId]) -> Result<Vec<StepRecord>, RemoteError> {
        let state = self.state.lock().await;
        Ok(state
            .steps
            .iter()
            .filter(|s| tour_ids.contains(&s.tour_id))
            .cloned()
            .collect())
    }

    async fn insert_tour(
        &self,
        user_id: &str,
        tour: NewTour,
    ) -> Result<TourRecord, RemoteError> {
        let record = TourRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: tour.title,
            description: tour.description,
            status: tour.status,
            created_date: Utc::now(),
        };
        self.state.lock().await.tours.push(record.clone());
        Ok(record)
    }

    async fn insert_steps(&self, steps: Vec<NewStep>) -> Result<(), RemoteError> {
        let created_at = Utc::now();
        let mut state = self.state.lock().await;
        for step in steps {
            state.steps.push(StepRecord {
                id: Uuid::new_v4().to_string(),
                tour_id: step.tour_id,
                title: step.title,
                description: step.description,
                target_selector: step.target_selector,
                created_at,
            });
        }
        Ok(())
    }

    async fn update_tour(&self, id: &str, changes: TourChanges) -> Result<u64, RemoteError> {
        let mut state = self.state.lock().await;
        match state.tours.iter_mut().find(|t| t.id == id) {
            Some(tour) => {
                tour.title = changes.title;
                tour.description = changes.description;
                tour.status = changes.status;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn update_step(&self, id: &str, changes: StepChanges) -> Result<u64, RemoteError> {
        let mut state = self.state.lock().await;
        match state.steps.iter_mut().find(|s| s.id == id) {
            Some(step) => {
                step.title = changes.title;
                step.description = changes.description;
                step.target_selector = changes.target_selector;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_tour(&self, id: &str) -> Result<u64, RemoteError> {
        let mut state = self.state.lock().await;
        let before = state.tours.len();
        state.tours.retain(|t| t.id != id);
        let removed = (before - state.tours.len()) as u64;
        if removed > 0 {
            state.steps.retain(|s| s.tour_id != id);
        }
        Ok(removed)
    }

    async fn delete_step(&self, id: &str) -> Result<u64, RemoteError> {
        let mut state = self.state.lock().await;
        let before = state.steps.len();
        state.steps.retain(|s| s.id != id);
        Ok((before - state.steps.len()) as u64)
    }
}

/// The demo engagement events matching the [`InMemoryRemote::seeded`] tours.
pub fn sample_events() -> Vec<AnalyticsEvent> {
    let now = Utc::now();
    let event = |id: &str, tour_id: &str, kind, age_minutes: i64| AnalyticsEvent {
        id: id.to_string(),
        tour_id: tour_id.to_string(),
        kind,
        timestamp: now - Duration::minutes(age_minutes),
        user_id: None,
    };
    vec![
        event("1", "tour-1", EventKind::Started, 120),
        event("2", "tour-1", EventKind::Completed, 60),
        event("3", "tour-2", EventKind::Started, 30),
        event("4", "tour-1", EventKind::Resumed, 15),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
