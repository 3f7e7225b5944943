//! Tour and step domain model, DTOs, and validation.
//!
//! A [`Tour`] is a named, ordered sequence of [`Step`]s shown to an end user
//! of a customer's product. Tours are owned by exactly one account (enforced
//! by the persistence service) and their steps are presented in the order
//! defined by [`sort_steps`].

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Publication state of a tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TourStatus {
    /// Being edited; not shown to end users.
    Draft,
    /// Live in the customer's product.
    Active,
}

/// A named, ordered sequence of onboarding steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    /// Assigned by the persistence service at creation; immutable thereafter.
    pub created_date: Timestamp,
    pub status: TourStatus,
    /// Owned by the tour, in presentation order (see [`sort_steps`]).
    pub steps: Vec<Step>,
}

impl Tour {
    /// Look up a step of this tour by id.
    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == step_id)
    }
}

/// One highlighted UI moment within a tour, targeting an element in the
/// customer's page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: EntityId,
    /// Back-reference to the owning tour.
    pub tour_id: EntityId,
    pub title: String,
    pub description: String,
    /// CSS selector of the highlighted element. Steps without a selector are
    /// rendered as free-floating callouts.
    pub target_selector: Option<String>,
    /// Assigned by the persistence service at creation; drives presentation
    /// order together with `id`.
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Presentation ordering
// ---------------------------------------------------------------------------

impl Step {
    /// Sort key for presentation order: creation time first, identifier as
    /// the tie-break. Identifier comparison is lexicographic, which keeps the
    /// order total when the service's clock resolution collides.
    pub fn sort_key(&self) -> (Timestamp, &str) {
        (self.created_at, self.id.as_str())
    }
}

/// Sort a tour's steps into presentation order.
///
/// Deterministic and stable across repeated fetches of unchanged data.
pub fn sort_steps(steps: &mut [Step]) {
    steps.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Input for creating a tour together with its initial steps.
#[derive(Debug, Clone, Validate, Deserialize)]
pub struct CreateTour {
    #[validate(length(min = 1, message = "Tour title must not be empty"))]
    pub title: String,
    pub description: String,
    pub status: TourStatus,
    #[validate(nested)]
    pub steps: Vec<CreateStep>,
}

/// One step definition inside a [`CreateTour`].
#[derive(Debug, Clone, Validate, Deserialize)]
pub struct CreateStep {
    #[validate(length(min = 1, message = "Step title must not be empty"))]
    pub title: String,
    pub description: String,
    pub target_selector: Option<String>,
}

/// Replacement values for an existing step's editable fields.
#[derive(Debug, Clone, Validate, Deserialize)]
pub struct StepPatch {
    #[validate(length(min = 1, message = "Step title must not be empty"))]
    pub title: String,
    pub description: String,
    pub target_selector: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Run a DTO's `validator` rules, converting the outcome into a domain error.
pub fn validate(input: &impl Validate) -> Result<(), CoreError> {
    input.validate().map_err(flatten_errors)
}

/// Validate that a tour title is a non-empty string.
///
/// Used on the update path, where the input is a full [`Tour`] rather than a
/// derive-validated DTO.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Tour title must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Collapse `validator`'s nested error tree into a single readable message.
fn flatten_errors(errors: ValidationErrors) -> CoreError {
    let mut messages: Vec<String> = Vec::new();
    for (field, kind) in errors.errors() {
        collect_messages(field, kind, &mut messages);
    }
    if messages.is_empty() {
        messages.push("Invalid input".to_string());
    }
    CoreError::Validation(messages.join("; "))
}

fn collect_messages(field: &str, kind: &validator::ValidationErrorsKind, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;
    match kind {
        ValidationErrorsKind::Field(errs) => {
            for err in errs {
                match &err.message {
                    Some(msg) => out.push(msg.to_string()),
                    None => out.push(format!("{field} is invalid")),
                }
            }
        }
        ValidationErrorsKind::Struct(nested) => {
            for (f, k) in nested.errors() {
                collect_messages(f, k, out);
            }
        }
        ValidationErrorsKind::List(items) => {
            for nested in items.values() {
                for (f, k) in nested.errors() {
                    collect_messages(f, k, out);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
