//! Domain types and pure logic for the tourwidget platform.
//!
//! This crate holds everything the synchronization layer shares with the
//! rest of the workspace without doing any I/O itself:
//!
//! - [`tour`] — the tour/step model, create and update DTOs, validation,
//!   and the step presentation-ordering policy.
//! - [`analytics`] — tour engagement events and per-tour aggregation.
//! - [`error`] — the [`CoreError`](error::CoreError) domain error type.
//! - [`types`] — identifier and timestamp aliases.

pub mod analytics;
pub mod error;
pub mod tour;
pub mod types;

pub use error::CoreError;
