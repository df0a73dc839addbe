//! Pass verification: the engine, its append-only audit log, and the
//! replaceable scan simulator that exercises it in lieu of a real decoder.

pub mod engine;
pub mod log;
pub mod scanner;

pub use engine::{
    AdmitDecision, DenyReason, VerificationEngine, VerificationOutcome, VerifyError,
};
pub use log::{VerificationLog, VerificationRecord, VerificationStatus};
pub use scanner::{ApprovedBiasFeed, CodeFeed, ScanEvent, ScanHandle, ScanSimulator};
