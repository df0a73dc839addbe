use super::common::*;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::risk::NoopRiskAnalyzer;
use crate::visits::domain::ApplicationStatus;
use crate::visits::router::{
    approve_handler, detail_handler, list_handler, reject_handler, submit_handler, verify_handler,
    ListQuery, RejectRequest, VerifyRequest,
};
use crate::visits::store::{ApplicationStore, InMemoryApplicationStore};

#[tokio::test]
async fn submit_handler_accepts_a_valid_application() {
    let (service, _store) = build_service();

    let response = submit_handler::<InMemoryApplicationStore, NoopRiskAnalyzer>(
        State(service),
        axum::Json(submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn submit_handler_rejects_an_empty_visitor_list() {
    let (service, _store) = build_service();
    let mut invalid = submission();
    invalid.visitors.clear();

    let response = submit_handler::<InMemoryApplicationStore, NoopRiskAnalyzer>(
        State(service),
        axum::Json(invalid),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn detail_handler_returns_not_found_for_unknown_ids() {
    let (service, _store) = build_service();

    let response = detail_handler::<InMemoryApplicationStore, NoopRiskAnalyzer>(
        State(service),
        Path("VS404".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reject_after_approve_conflicts() {
    let (service, store) = build_service();
    store
        .create(application(
            "VS100",
            ApplicationStatus::Pending,
            date(2099, 1, 2),
            1,
        ))
        .expect("insert");

    let approved = approve_handler::<InMemoryApplicationStore, NoopRiskAnalyzer>(
        State(service.clone()),
        Path("VS100".to_string()),
    )
    .await;
    assert_eq!(approved.status(), StatusCode::OK);

    let rejected = reject_handler::<InMemoryApplicationStore, NoopRiskAnalyzer>(
        State(service),
        Path("VS100".to_string()),
        Some(axum::Json(RejectRequest { reason: None })),
    )
    .await;
    assert_eq!(rejected.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn verify_handler_rejects_empty_codes() {
    let (service, _store) = build_service();

    let response = verify_handler::<InMemoryApplicationStore, NoopRiskAnalyzer>(
        State(service),
        axum::Json(VerifyRequest {
            code: "   ".to_string(),
            today: Some(date(2024, 6, 14)),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_handler_rejects_unknown_status_values() {
    let (service, _store) = build_service();

    let response = list_handler::<InMemoryApplicationStore, NoopRiskAnalyzer>(
        State(service),
        Query(ListQuery {
            status: Some("archived".to_string()),
            search: None,
            today: Some(date(2024, 6, 14)),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
