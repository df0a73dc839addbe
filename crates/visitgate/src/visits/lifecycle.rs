//! Status transitions and the shared expiry derivation.
//!
//! The transition table is deliberately small: staff can approve or reject a
//! pending application, and nothing else. Expiry is not an event; it is
//! derived from the validity window whenever a consumer needs the current
//! status, so list views, stats, and verification can never disagree.

use chrono::{Duration, NaiveDate};

use super::domain::{Application, ApplicationStatus};

/// Staff-triggered status change request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Approve,
    Reject { reason: Option<String> },
}

impl LifecycleEvent {
    pub const fn target(&self) -> ApplicationStatus {
        match self {
            LifecycleEvent::Approve => ApplicationStatus::Approved,
            LifecycleEvent::Reject { .. } => ApplicationStatus::Rejected,
        }
    }
}

/// Requested status change not permitted by the transition table. The record
/// is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: ApplicationStatus,
    pub to: ApplicationStatus,
}

/// Apply a staff event in place. Only `pending` applications accept events.
pub fn apply(app: &mut Application, event: &LifecycleEvent) -> Result<(), InvalidTransition> {
    match (app.status, event) {
        (ApplicationStatus::Pending, LifecycleEvent::Approve) => {
            app.status = ApplicationStatus::Approved;
            Ok(())
        }
        (ApplicationStatus::Pending, LifecycleEvent::Reject { reason }) => {
            app.status = ApplicationStatus::Rejected;
            app.rejection_reason = reason.clone();
            Ok(())
        }
        (from, event) => Err(InvalidTransition {
            from,
            to: event.target(),
        }),
    }
}

/// Last day the pass is honored: `visit_date + (valid_days - 1)`.
pub fn pass_expires_on(app: &Application) -> NaiveDate {
    app.visit_date + Duration::days(i64::from(app.valid_days) - 1)
}

/// Status as every consumer must see it on `today`. An approved application
/// past its validity window reads as expired even though the stored status
/// still says approved.
pub fn effective_status(app: &Application, today: NaiveDate) -> ApplicationStatus {
    match app.status {
        ApplicationStatus::Approved if today > pass_expires_on(app) => ApplicationStatus::Expired,
        status => status,
    }
}
