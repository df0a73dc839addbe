use super::common::*;
use crate::visits::domain::{ApplicationId, ApplicationStatus, ValidationError};
use crate::visits::lifecycle::LifecycleEvent;
use crate::visits::store::{ApplicationStore, InMemoryApplicationStore, StatusFilter, StoreError};

#[test]
fn create_prepends_most_recent_first() {
    let store = InMemoryApplicationStore::default();
    store
        .create(application(
            "VS100",
            ApplicationStatus::Pending,
            date(2024, 6, 1),
            1,
        ))
        .expect("first insert");
    store
        .create(application(
            "VS101",
            ApplicationStatus::Pending,
            date(2024, 6, 2),
            1,
        ))
        .expect("second insert");

    let listed = store
        .list(StatusFilter::All, None, date(2024, 5, 1))
        .expect("list succeeds");
    assert_eq!(listed[0].id.0, "VS101");
    assert_eq!(listed[1].id.0, "VS100");
}

#[test]
fn create_rejects_duplicate_ids() {
    let store = InMemoryApplicationStore::default();
    let app = application("VS100", ApplicationStatus::Pending, date(2024, 6, 1), 1);
    store.create(app.clone()).expect("first insert");

    match store.create(app) {
        Err(StoreError::Conflict(id)) => assert_eq!(id.0, "VS100"),
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn create_enforces_visitor_bounds() {
    let store = InMemoryApplicationStore::default();

    let mut empty = application("VS100", ApplicationStatus::Pending, date(2024, 6, 1), 1);
    empty.visitors.clear();
    assert!(matches!(
        store.create(empty),
        Err(StoreError::Invalid(ValidationError::NoVisitors))
    ));

    let mut over_cap = application("VS101", ApplicationStatus::Pending, date(2024, 6, 1), 1);
    over_cap.visitors = visitors(&["A", "B", "C"]);
    over_cap.max_visitors = 2;
    assert!(matches!(
        store.create(over_cap),
        Err(StoreError::Invalid(ValidationError::TooManyVisitors {
            count: 3,
            max: 2
        }))
    ));

    assert!(store
        .list(StatusFilter::All, None, date(2024, 6, 1))
        .expect("list succeeds")
        .is_empty());
}

#[test]
fn update_status_reports_unknown_ids() {
    let store = InMemoryApplicationStore::default();
    match store.update_status(
        &ApplicationId("VS999".to_string()),
        LifecycleEvent::Approve,
    ) {
        Err(StoreError::NotFound(id)) => assert_eq!(id.0, "VS999"),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn refused_transition_preserves_the_record() {
    let store = InMemoryApplicationStore::default();
    store
        .create(application(
            "VS100",
            ApplicationStatus::Rejected,
            date(2024, 6, 1),
            1,
        ))
        .expect("insert");

    assert!(matches!(
        store.update_status(&ApplicationId("VS100".to_string()), LifecycleEvent::Approve),
        Err(StoreError::Transition(_))
    ));

    let stored = store
        .get(&ApplicationId("VS100".to_string()))
        .expect("store reads")
        .expect("record present");
    assert_eq!(stored.status, ApplicationStatus::Rejected);
}

#[test]
fn list_applies_the_expiry_derivation_to_filters() {
    let store = InMemoryApplicationStore::default();
    store
        .create(application(
            "VS100",
            ApplicationStatus::Approved,
            date(2024, 6, 1),
            1,
        ))
        .expect("insert");

    let expired = store
        .list(
            StatusFilter::Only(ApplicationStatus::Expired),
            None,
            date(2024, 6, 5),
        )
        .expect("list succeeds");
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].status, ApplicationStatus::Expired);

    let approved = store
        .list(
            StatusFilter::Only(ApplicationStatus::Approved),
            None,
            date(2024, 6, 5),
        )
        .expect("list succeeds");
    assert!(approved.is_empty());
}

#[test]
fn search_matches_id_and_visitor_names_case_insensitively() {
    let store = InMemoryApplicationStore::default();
    store
        .create(application(
            "VS100",
            ApplicationStatus::Pending,
            date(2024, 6, 1),
            1,
        ))
        .expect("insert");
    store
        .create(application(
            "VS200",
            ApplicationStatus::Pending,
            date(2024, 6, 1),
            1,
        ))
        .expect("insert");

    let by_id = store
        .list(StatusFilter::All, Some("vs1"), date(2024, 6, 1))
        .expect("list succeeds");
    assert_eq!(by_id.len(), 1);
    assert_eq!(by_id[0].id.0, "VS100");

    let by_name = store
        .list(StatusFilter::All, Some("wang"), date(2024, 6, 1))
        .expect("list succeeds");
    assert_eq!(by_name.len(), 2);

    let no_match = store
        .list(StatusFilter::All, Some("nobody"), date(2024, 6, 1))
        .expect("list succeeds");
    assert!(no_match.is_empty());
}

#[test]
fn set_risk_analysis_attaches_the_advisory() {
    let store = InMemoryApplicationStore::default();
    store
        .create(application(
            "VS100",
            ApplicationStatus::Pending,
            date(2024, 6, 1),
            1,
        ))
        .expect("insert");

    store
        .set_risk_analysis(
            &ApplicationId("VS100".to_string()),
            "Low Risk: routine business visit.".to_string(),
        )
        .expect("annotation stores");

    let stored = store
        .get(&ApplicationId("VS100".to_string()))
        .expect("store reads")
        .expect("record present");
    assert_eq!(
        stored.ai_risk_analysis.as_deref(),
        Some("Low Risk: routine business visit.")
    );
}
