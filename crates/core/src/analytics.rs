//! Tour engagement events and per-tour aggregation.
//!
//! Events are recorded by the embedded widget in the customer's product and
//! summarized here into the figures the dashboard renders. Aggregation is a
//! pure function over an event slice; collection and storage of events belong
//! to the hosting platform.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Timestamp, UserId};

/// What happened in one widget session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Started,
    Completed,
    Skipped,
    Resumed,
}

/// One recorded engagement event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub id: EntityId,
    pub tour_id: EntityId,
    pub kind: EventKind,
    pub timestamp: Timestamp,
    /// End-user identity, when the customer's integration reports one.
    pub user_id: Option<UserId>,
}

/// Aggregated engagement figures for a single tour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourAnalytics {
    pub tour_id: EntityId,
    /// Number of sessions that started the tour.
    pub users_reached: usize,
    /// Fraction of started sessions that completed, in `0.0..=1.0`.
    pub completion_rate: f64,
    /// Fraction of started sessions that skipped, in `0.0..=1.0`.
    pub skipped_rate: f64,
    pub times_resumed: usize,
}

/// Aggregate raw events into per-tour summaries, ordered by tour id.
///
/// Rates are fractions of started sessions; a tour with recorded events but
/// no starts reports zero rates rather than dividing by zero.
pub fn summarize(events: &[AnalyticsEvent]) -> Vec<TourAnalytics> {
    #[derive(Default)]
    struct Counts {
        started: usize,
        completed: usize,
        skipped: usize,
        resumed: usize,
    }

    let mut per_tour: BTreeMap<&str, Counts> = BTreeMap::new();
    for event in events {
        let counts = per_tour.entry(event.tour_id.as_str()).or_default();
        match event.kind {
            EventKind::Started => counts.started += 1,
            EventKind::Completed => counts.completed += 1,
            EventKind::Skipped => counts.skipped += 1,
            EventKind::Resumed => counts.resumed += 1,
        }
    }

    per_tour
        .into_iter()
        .map(|(tour_id, c)| {
            let rate = |n: usize| {
                if c.started == 0 {
                    0.0
                } else {
                    n as f64 / c.started as f64
                }
            };
            TourAnalytics {
                tour_id: tour_id.to_string(),
                users_reached: c.started,
                completion_rate: rate(c.completed),
                skipped_rate: rate(c.skipped),
                times_resumed: c.resumed,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
