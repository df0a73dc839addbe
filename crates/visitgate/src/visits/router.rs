use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::risk::RiskAnalyzer;
use crate::verification::{AdmitDecision, VerifyError};

use super::domain::{ApplicationId, ApplicationStatus, NewApplication};
use super::lifecycle::LifecycleEvent;
use super::service::{ServiceError, VisitService};
use super::store::{ApplicationStore, StatusFilter, StoreError};

/// Router builder exposing HTTP endpoints for intake, staff decisions, and
/// checkpoint verification.
pub fn visit_router<S, R>(service: Arc<VisitService<S, R>>) -> Router
where
    S: ApplicationStore + 'static,
    R: RiskAnalyzer + 'static,
{
    Router::new()
        .route(
            "/api/v1/visits/applications",
            post(submit_handler::<S, R>).get(list_handler::<S, R>),
        )
        .route(
            "/api/v1/visits/applications/:application_id",
            get(detail_handler::<S, R>),
        )
        .route(
            "/api/v1/visits/applications/:application_id/approve",
            post(approve_handler::<S, R>),
        )
        .route(
            "/api/v1/visits/applications/:application_id/reject",
            post(reject_handler::<S, R>),
        )
        .route("/api/v1/visits/verify", post(verify_handler::<S, R>))
        .route(
            "/api/v1/visits/verifications",
            get(verifications_handler::<S, R>),
        )
        .route("/api/v1/visits/stats", get(stats_handler::<S, R>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    pub(crate) status: Option<String>,
    pub(crate) search: Option<String>,
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsQuery {
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RejectRequest {
    #[serde(default)]
    pub(crate) reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyRequest {
    pub(crate) code: String,
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn submit_handler<S, R>(
    State(service): State<Arc<VisitService<S, R>>>,
    axum::Json(submission): axum::Json<NewApplication>,
) -> Response
where
    S: ApplicationStore + 'static,
    R: RiskAnalyzer + 'static,
{
    match service.submit(submission) {
        Ok(application) => {
            let id = application.id.clone();
            let background = Arc::clone(&service);
            tokio::spawn(async move {
                if let Err(err) = background.annotate_risk(&id).await {
                    warn!(%err, application = %id, "risk annotation could not be stored");
                }
            });
            (StatusCode::ACCEPTED, axum::Json(application)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<S, R>(
    State(service): State<Arc<VisitService<S, R>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    S: ApplicationStore + 'static,
    R: RiskAnalyzer + 'static,
{
    let filter = match &query.status {
        Some(raw) => match ApplicationStatus::parse(raw) {
            Some(status) => StatusFilter::Only(status),
            None => {
                let payload = json!({ "error": format!("unknown status '{raw}'") });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        },
        None => StatusFilter::All,
    };
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());

    match service.list(filter, query.search.as_deref(), today) {
        Ok(applications) => (StatusCode::OK, axum::Json(applications)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn detail_handler<S, R>(
    State(service): State<Arc<VisitService<S, R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: ApplicationStore + 'static,
    R: RiskAnalyzer + 'static,
{
    let id = ApplicationId(application_id);
    match service.get(&id) {
        Ok(Some(application)) => (StatusCode::OK, axum::Json(application)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": format!("application {id} not found") });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn approve_handler<S, R>(
    State(service): State<Arc<VisitService<S, R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: ApplicationStore + 'static,
    R: RiskAnalyzer + 'static,
{
    decide(&service, application_id, LifecycleEvent::Approve)
}

pub(crate) async fn reject_handler<S, R>(
    State(service): State<Arc<VisitService<S, R>>>,
    Path(application_id): Path<String>,
    body: Option<axum::Json<RejectRequest>>,
) -> Response
where
    S: ApplicationStore + 'static,
    R: RiskAnalyzer + 'static,
{
    let reason = body.and_then(|axum::Json(request)| request.reason);
    decide(&service, application_id, LifecycleEvent::Reject { reason })
}

fn decide<S, R>(
    service: &VisitService<S, R>,
    application_id: String,
    event: LifecycleEvent,
) -> Response
where
    S: ApplicationStore + 'static,
    R: RiskAnalyzer + 'static,
{
    let id = ApplicationId(application_id);
    match service.decide(&id, event) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn verify_handler<S, R>(
    State(service): State<Arc<VisitService<S, R>>>,
    axum::Json(request): axum::Json<VerifyRequest>,
) -> Response
where
    S: ApplicationStore + 'static,
    R: RiskAnalyzer + 'static,
{
    let today = request.today.unwrap_or_else(|| Local::now().date_naive());
    match service.verify(&request.code, today) {
        Ok(outcome) => {
            let reason = match outcome.decision {
                AdmitDecision::Admit => None,
                AdmitDecision::Deny(reason) => Some(reason.label()),
            };
            let payload = json!({
                "success": outcome.decision.is_admit(),
                "reason": reason,
                "message": outcome.record.message,
                "application": outcome.application,
                "record": outcome.record,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn verifications_handler<S, R>(
    State(service): State<Arc<VisitService<S, R>>>,
) -> Response
where
    S: ApplicationStore + 'static,
    R: RiskAnalyzer + 'static,
{
    (StatusCode::OK, axum::Json(service.verifications())).into_response()
}

pub(crate) async fn stats_handler<S, R>(
    State(service): State<Arc<VisitService<S, R>>>,
    Query(query): Query<StatsQuery>,
) -> Response
where
    S: ApplicationStore + 'static,
    R: RiskAnalyzer + 'static,
{
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    match service.stats(today) {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: ServiceError) -> Response {
    let status = match &err {
        ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
        ServiceError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
        ServiceError::Store(StoreError::Transition(_)) => StatusCode::CONFLICT,
        ServiceError::Store(StoreError::Invalid(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Verify(VerifyError::EmptyCode) => StatusCode::BAD_REQUEST,
        ServiceError::Store(StoreError::Unavailable(_)) | ServiceError::Verify(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
