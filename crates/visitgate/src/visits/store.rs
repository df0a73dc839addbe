use std::sync::Mutex;

use chrono::NaiveDate;

use super::domain::{Application, ApplicationId, ApplicationStatus, ValidationError};
use super::lifecycle::{self, InvalidTransition, LifecycleEvent};

/// Narrow a listing to one effective status, or take everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

impl StatusFilter {
    fn matches(self, status: ApplicationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => status == wanted,
        }
    }
}

/// Storage abstraction so the service and verification engine can be
/// exercised in isolation. Implementations must serialize status updates per
/// application so concurrent staff decisions cannot race.
pub trait ApplicationStore: Send + Sync {
    /// Insert a new application at the head of the collection.
    fn create(&self, app: Application) -> Result<Application, StoreError>;

    /// Apply a staff lifecycle event, returning the updated record. All
    /// fields other than status (and rejection reason) are untouched.
    fn update_status(
        &self,
        id: &ApplicationId,
        event: LifecycleEvent,
    ) -> Result<Application, StoreError>;

    /// Attach the advisory risk annotation produced after submission.
    fn set_risk_analysis(&self, id: &ApplicationId, analysis: String) -> Result<(), StoreError>;

    fn get(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError>;

    /// Most-recent-first listing with the expiry derivation applied, filtered
    /// by effective status and an optional case-insensitive search over the
    /// application id and visitor names. No side effects.
    fn list(
        &self,
        filter: StatusFilter,
        search: Option<&str>,
        today: NaiveDate,
    ) -> Result<Vec<Application>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("application {0} already exists")]
    Conflict(ApplicationId),
    #[error("application {0} not found")]
    NotFound(ApplicationId),
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Ordered in-memory store. The single mutex makes every operation a
/// check-and-write in one critical section, which is what keeps simultaneous
/// approve/reject calls on the same id from losing updates.
#[derive(Debug, Default)]
pub struct InMemoryApplicationStore {
    records: Mutex<Vec<Application>>,
}

impl ApplicationStore for InMemoryApplicationStore {
    fn create(&self, app: Application) -> Result<Application, StoreError> {
        app.validate()?;
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.iter().any(|existing| existing.id == app.id) {
            return Err(StoreError::Conflict(app.id));
        }
        guard.insert(0, app.clone());
        Ok(app)
    }

    fn update_status(
        &self,
        id: &ApplicationId,
        event: LifecycleEvent,
    ) -> Result<Application, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let app = guard
            .iter_mut()
            .find(|app| &app.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        lifecycle::apply(app, &event)?;
        Ok(app.clone())
    }

    fn set_risk_analysis(&self, id: &ApplicationId, analysis: String) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let app = guard
            .iter_mut()
            .find(|app| &app.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        app.ai_risk_analysis = Some(analysis);
        Ok(())
    }

    fn get(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.iter().find(|app| &app.id == id).cloned())
    }

    fn list(
        &self,
        filter: StatusFilter,
        search: Option<&str>,
        today: NaiveDate,
    ) -> Result<Vec<Application>, StoreError> {
        let needle = search.map(str::to_lowercase);
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard
            .iter()
            .map(|app| {
                let mut app = app.clone();
                app.status = lifecycle::effective_status(&app, today);
                app
            })
            .filter(|app| filter.matches(app.status))
            .filter(|app| match &needle {
                Some(needle) => matches_search(app, needle),
                None => true,
            })
            .collect())
    }
}

fn matches_search(app: &Application, needle: &str) -> bool {
    app.id.0.to_lowercase().contains(needle)
        || app
            .visitors
            .iter()
            .any(|visitor| visitor.name.to_lowercase().contains(needle))
}
