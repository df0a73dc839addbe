//! Visit application intake, approval lifecycle, and listing.

pub mod domain;
pub mod lifecycle;
pub mod router;
pub mod seed;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationStatus, IdType, NewApplication, ValidationError,
    Visitor,
};
pub use lifecycle::{effective_status, pass_expires_on, InvalidTransition, LifecycleEvent};
pub use router::visit_router;
pub use service::{ServiceError, VisitService, VisitStats};
pub use store::{ApplicationStore, InMemoryApplicationStore, StatusFilter, StoreError};
