use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::info;

use crate::risk::RiskAnalyzer;
use crate::verification::{VerificationEngine, VerificationLog, VerificationOutcome, VerifyError};

use super::domain::{
    Application, ApplicationId, ApplicationStatus, NewApplication, ValidationError,
};
use super::lifecycle::LifecycleEvent;
use super::store::{ApplicationStore, StatusFilter, StoreError};

/// Service composing the application store, the verification engine with its
/// audit log, and the advisory risk annotator.
pub struct VisitService<S, R> {
    store: Arc<S>,
    risk: Arc<R>,
    log: Arc<VerificationLog>,
    engine: Arc<VerificationEngine<S>>,
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisitStats {
    pub today: usize,
    pub total: usize,
    pub pending: usize,
}

impl<S, R> VisitService<S, R>
where
    S: ApplicationStore + 'static,
    R: RiskAnalyzer + 'static,
{
    pub fn new(store: Arc<S>, risk: Arc<R>) -> Self {
        let log = Arc::new(VerificationLog::default());
        let engine = Arc::new(VerificationEngine::new(Arc::clone(&store), Arc::clone(&log)));
        Self {
            store,
            risk,
            log,
            engine,
        }
    }

    /// Validate and store a new application as `pending`, assigning its id.
    /// Risk annotation runs separately; see [`Self::annotate_risk`].
    pub fn submit(&self, submission: NewApplication) -> Result<Application, ServiceError> {
        submission.validate()?;

        let now = Local::now().naive_local();
        let id = ApplicationId::generate(now.date());
        let application = submission.into_application(id, now);
        let stored = self.store.create(application)?;

        info!(application = %stored.id, visitors = stored.visitors.len(), "application submitted");
        Ok(stored)
    }

    /// Fetch the stored application, ask the annotator for an advisory, and
    /// write it back. Advisory only: callers spawn this and move on.
    pub async fn annotate_risk(&self, id: &ApplicationId) -> Result<(), ServiceError> {
        let app = self
            .store
            .get(id)?
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let advisory = self
            .risk
            .analyze(&app.purpose, &app.location, app.visitors.len())
            .await;
        self.store.set_risk_analysis(id, advisory)?;
        Ok(())
    }

    /// Apply a staff approve/reject decision.
    pub fn decide(
        &self,
        id: &ApplicationId,
        event: LifecycleEvent,
    ) -> Result<Application, ServiceError> {
        let updated = self.store.update_status(id, event)?;
        info!(application = %updated.id, status = updated.status.label(), "application status updated");
        Ok(updated)
    }

    pub fn get(&self, id: &ApplicationId) -> Result<Option<Application>, ServiceError> {
        Ok(self.store.get(id)?)
    }

    pub fn list(
        &self,
        filter: StatusFilter,
        search: Option<&str>,
        today: NaiveDate,
    ) -> Result<Vec<Application>, ServiceError> {
        Ok(self.store.list(filter, search, today)?)
    }

    pub fn stats(&self, today: NaiveDate) -> Result<VisitStats, ServiceError> {
        let apps = self.store.list(StatusFilter::All, None, today)?;
        Ok(VisitStats {
            today: apps.iter().filter(|app| app.visit_date == today).count(),
            total: apps.len(),
            pending: apps
                .iter()
                .filter(|app| app.status == ApplicationStatus::Pending)
                .count(),
        })
    }

    /// Verify a pass code as of `today`, appending one audit record.
    pub fn verify(
        &self,
        raw_code: &str,
        today: NaiveDate,
    ) -> Result<VerificationOutcome, ServiceError> {
        Ok(self.engine.verify(raw_code, today)?)
    }

    /// Newest-first audit trail.
    pub fn verifications(&self) -> Vec<crate::verification::VerificationRecord> {
        self.log.entries()
    }

    /// Shared engine handle, used to wire up a scan simulator or a real
    /// decoder against the same store and log.
    pub fn engine(&self) -> Arc<VerificationEngine<S>> {
        Arc::clone(&self.engine)
    }

    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }
}

/// Error raised by the visit service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Verify(#[from] VerifyError),
}
