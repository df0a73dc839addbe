use super::common::*;
use crate::risk::FALLBACK_ADVISORY;
use crate::verification::AdmitDecision;
use crate::visits::domain::{ApplicationStatus, ValidationError};
use crate::visits::lifecycle::LifecycleEvent;
use crate::visits::service::{ServiceError, VisitStats};
use crate::visits::store::{ApplicationStore, StatusFilter, StoreError};

#[test]
fn submit_assigns_a_badge_id_and_pending_status() {
    let (service, store) = build_service();

    let stored = service.submit(submission()).expect("submission stores");
    assert!(stored.id.0.starts_with("VS"));
    assert_eq!(stored.status, ApplicationStatus::Pending);
    assert!(stored.ai_risk_analysis.is_none());

    let fetched = store
        .get(&stored.id)
        .expect("store reads")
        .expect("record present");
    assert_eq!(fetched, stored);
}

#[test]
fn submit_propagates_validation_errors() {
    let (service, store) = build_service();

    let mut invalid = submission();
    invalid.visitors.clear();

    match service.submit(invalid) {
        Err(ServiceError::Validation(ValidationError::NoVisitors)) => {}
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(store
        .list(StatusFilter::All, None, date(2024, 6, 1))
        .expect("list succeeds")
        .is_empty());
}

#[test]
fn decide_applies_staff_events_and_refuses_repeats() {
    let (service, _store) = build_service();
    let stored = service.submit(submission()).expect("submission stores");

    let approved = service
        .decide(&stored.id, LifecycleEvent::Approve)
        .expect("pending approves");
    assert_eq!(approved.status, ApplicationStatus::Approved);

    match service.decide(&stored.id, LifecycleEvent::Reject { reason: None }) {
        Err(ServiceError::Store(StoreError::Transition(err))) => {
            assert_eq!(err.from, ApplicationStatus::Approved);
        }
        other => panic!("expected invalid transition, got {other:?}"),
    }
}

#[test]
fn stats_count_today_total_and_pending() {
    let (service, store) = build_service();
    let today = date(2024, 6, 14);
    store
        .create(application("VS1", ApplicationStatus::Pending, today, 1))
        .expect("insert");
    store
        .create(application(
            "VS2",
            ApplicationStatus::Approved,
            today + chrono::Duration::days(1),
            1,
        ))
        .expect("insert");
    store
        .create(application(
            "VS3",
            ApplicationStatus::Rejected,
            today,
            1,
        ))
        .expect("insert");

    let stats = service.stats(today).expect("stats compute");
    assert_eq!(
        stats,
        VisitStats {
            today: 2,
            total: 3,
            pending: 1,
        }
    );
}

#[test]
fn verify_goes_through_the_shared_engine_and_log() {
    let (service, store) = build_service();
    let today = date(2024, 6, 14);
    store
        .create(application("VS100", ApplicationStatus::Approved, today, 1))
        .expect("insert");

    let outcome = service.verify("VS100", today).expect("verifies");
    assert_eq!(outcome.decision, AdmitDecision::Admit);
    assert_eq!(service.verifications().len(), 1);
}

#[tokio::test]
async fn annotate_risk_writes_the_advisory_back() {
    let (service, store) = build_service();
    let stored = service.submit(submission()).expect("submission stores");

    service
        .annotate_risk(&stored.id)
        .await
        .expect("annotation completes");

    let annotated = store
        .get(&stored.id)
        .expect("store reads")
        .expect("record present");
    assert_eq!(annotated.ai_risk_analysis.as_deref(), Some(FALLBACK_ADVISORY));
}

#[tokio::test]
async fn annotate_risk_reports_unknown_applications() {
    let (service, _store) = build_service();

    match service
        .annotate_risk(&crate::visits::domain::ApplicationId("VS404".to_string()))
        .await
    {
        Err(ServiceError::Store(StoreError::NotFound(_))) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}
