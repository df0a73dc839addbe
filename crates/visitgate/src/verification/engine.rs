//! Maps a scanned or typed pass code to an admit/deny decision.
//!
//! Every completed verification, admit or deny, appends exactly one audit
//! record. Codes may carry a visitor-index suffix (`VS...-2`); the prefix
//! before the first `-` is tried first and the raw string second, so ids that
//! themselves contain a dash still resolve.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::visits::{
    effective_status, Application, ApplicationId, ApplicationStatus, ApplicationStore, StoreError,
};

use super::log::{VerificationLog, VerificationRecord, VerificationStatus};

/// Why a pass was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotFound,
    Rejected,
    Expired,
    NotYetApproved,
}

impl DenyReason {
    pub const fn label(self) -> &'static str {
        match self {
            DenyReason::NotFound => "not-found",
            DenyReason::Rejected => "rejected",
            DenyReason::Expired => "expired",
            DenyReason::NotYetApproved => "not-yet-approved",
        }
    }

    const fn message(self) -> &'static str {
        match self {
            DenyReason::NotFound => "invalid code: no matching application",
            DenyReason::Rejected => "verification failed: application was rejected",
            DenyReason::Expired => "verification failed: visitor pass has expired",
            DenyReason::NotYetApproved => "verification failed: application is not yet approved",
        }
    }
}

/// Gate decision for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitDecision {
    Admit,
    Deny(DenyReason),
}

impl AdmitDecision {
    pub const fn is_admit(self) -> bool {
        matches!(self, AdmitDecision::Admit)
    }
}

/// Result of one verification attempt, including the audit record appended
/// for it. The matched application (when any) rides along for display.
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    pub decision: AdmitDecision,
    pub application: Option<Application>,
    pub record: VerificationRecord,
}

/// Error raised before a verification is attempted. An empty code never
/// reaches the lookup and never logs.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("verification code must not be empty")]
    EmptyCode,
    #[error(transparent)]
    Store(#[from] StoreError),
}

const ADMIT_MESSAGE: &str = "verification passed: entry permitted";
const UNKNOWN_VISITOR: &str = "unknown";
const UNKNOWN_ID_NUMBER: &str = "---";

pub struct VerificationEngine<S> {
    store: Arc<S>,
    log: Arc<VerificationLog>,
}

impl<S: ApplicationStore> VerificationEngine<S> {
    pub fn new(store: Arc<S>, log: Arc<VerificationLog>) -> Self {
        Self { store, log }
    }

    pub fn log(&self) -> &VerificationLog {
        &self.log
    }

    /// Verify a raw code against the store as of `today`.
    pub fn verify(
        &self,
        raw_code: &str,
        today: NaiveDate,
    ) -> Result<VerificationOutcome, VerifyError> {
        let code = raw_code.trim();
        if code.is_empty() {
            return Err(VerifyError::EmptyCode);
        }

        let app = self.resolve(code)?;

        let Some(app) = app else {
            let reason = DenyReason::NotFound;
            let record = self.log.append(
                code.to_string(),
                UNKNOWN_VISITOR.to_string(),
                UNKNOWN_ID_NUMBER.to_string(),
                VerificationStatus::Failed,
                reason.message().to_string(),
            );
            return Ok(VerificationOutcome {
                decision: AdmitDecision::Deny(reason),
                application: None,
                record,
            });
        };

        let decision = match effective_status(&app, today) {
            ApplicationStatus::Rejected => AdmitDecision::Deny(DenyReason::Rejected),
            ApplicationStatus::Expired => AdmitDecision::Deny(DenyReason::Expired),
            ApplicationStatus::Pending => AdmitDecision::Deny(DenyReason::NotYetApproved),
            ApplicationStatus::Approved => AdmitDecision::Admit,
        };

        let (status, message) = match decision {
            AdmitDecision::Admit => (VerificationStatus::Success, ADMIT_MESSAGE),
            AdmitDecision::Deny(reason) => (VerificationStatus::Failed, reason.message()),
        };

        let record = self.log.append(
            app.id.0.clone(),
            app.lead_visitor_label(),
            app.lead_visitor().id_number.clone(),
            status,
            message.to_string(),
        );

        Ok(VerificationOutcome {
            decision,
            application: Some(app),
            record,
        })
    }

    /// Exact-id lookup on the `-`-stripped prefix, falling back to the raw
    /// code.
    fn resolve(&self, code: &str) -> Result<Option<Application>, StoreError> {
        let prefix = code.split('-').next().unwrap_or(code);
        if let Some(app) = self.store.get(&ApplicationId(prefix.to_string()))? {
            return Ok(Some(app));
        }
        if prefix != code {
            return self.store.get(&ApplicationId(code.to_string()));
        }
        Ok(None)
    }
}
