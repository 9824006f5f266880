use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use serde_json::json;

use super::domain::{RequestId, ServiceType, UserId, VehicleId, VehicleSpec};
use super::lifecycle::MechanicAction;
use super::plans::PlanTier;
use super::repository::{RepositoryError, ServiceRequestRepository, VehicleRepository};
use super::service::{MarketplaceError, MarketplaceService};

/// Router builder exposing the marketplace HTTP surface.
///
/// The identity collaborator authenticates upstream and forwards `owner_id` /
/// `requester_id` / `mechanic_id` plus the session tier; nothing here checks
/// credentials.
pub fn marketplace_router<V, R>(service: Arc<MarketplaceService<V, R>>) -> Router
where
    V: VehicleRepository + 'static,
    R: ServiceRequestRepository + 'static,
{
    Router::new()
        .route("/api/v1/plans", get(plans_handler::<V, R>))
        .route(
            "/api/v1/vehicles",
            post(register_vehicle_handler::<V, R>).get(list_vehicles_handler::<V, R>),
        )
        .route(
            "/api/v1/vehicles/:vehicle_id",
            delete(remove_vehicle_handler::<V, R>),
        )
        .route(
            "/api/v1/requests",
            post(submit_request_handler::<V, R>).get(open_requests_handler::<V, R>),
        )
        .route(
            "/api/v1/requests/:request_id",
            get(request_status_handler::<V, R>),
        )
        .route(
            "/api/v1/requests/:request_id/accept",
            post(accept_handler::<V, R>),
        )
        .route(
            "/api/v1/requests/:request_id/reject",
            post(reject_handler::<V, R>),
        )
        .route(
            "/api/v1/requests/:request_id/start",
            post(start_handler::<V, R>),
        )
        .route(
            "/api/v1/requests/:request_id/complete",
            post(complete_handler::<V, R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterVehicleRequest {
    pub(crate) owner_id: String,
    pub(crate) tier: String,
    pub(crate) vehicle: VehicleSpec,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwnerQuery {
    pub(crate) owner_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequestRequest {
    pub(crate) requester_id: String,
    pub(crate) tier: String,
    pub(crate) vehicle_id: String,
    pub(crate) service_type: ServiceType,
    pub(crate) description: String,
    /// Timezone-naive submission timestamp; defaults to the server's local
    /// wall clock when omitted.
    #[serde(default)]
    pub(crate) submitted_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransitionRequest {
    pub(crate) mechanic_id: String,
}

fn parse_tier(raw: &str) -> Result<PlanTier, Response> {
    raw.parse::<PlanTier>().map_err(|err| {
        let payload = json!({ "error": err.to_string() });
        (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
    })
}

fn error_response(error: MarketplaceError) -> Response {
    let status = match &error {
        MarketplaceError::VehicleLimitReached { .. }
        | MarketplaceError::RequestLimitReached { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        MarketplaceError::UnknownVehicle => StatusCode::NOT_FOUND,
        MarketplaceError::NotAssigned => StatusCode::FORBIDDEN,
        MarketplaceError::Transition(_) => StatusCode::CONFLICT,
        MarketplaceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        MarketplaceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        MarketplaceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = match &error {
        MarketplaceError::VehicleLimitReached { .. }
        | MarketplaceError::RequestLimitReached { .. } => json!({
            "error": error.to_string(),
            "hint": "upgrade your plan to raise the limit",
        }),
        _ => json!({ "error": error.to_string() }),
    };

    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn plans_handler<V, R>(
    State(service): State<Arc<MarketplaceService<V, R>>>,
) -> Response
where
    V: VehicleRepository + 'static,
    R: ServiceRequestRepository + 'static,
{
    let plans = service.policy().catalog().plans();
    (StatusCode::OK, axum::Json(json!({ "plans": plans }))).into_response()
}

pub(crate) async fn register_vehicle_handler<V, R>(
    State(service): State<Arc<MarketplaceService<V, R>>>,
    axum::Json(payload): axum::Json<RegisterVehicleRequest>,
) -> Response
where
    V: VehicleRepository + 'static,
    R: ServiceRequestRepository + 'static,
{
    let tier = match parse_tier(&payload.tier) {
        Ok(tier) => tier,
        Err(response) => return response,
    };

    let owner = UserId(payload.owner_id);
    match service.register_vehicle(&owner, tier, payload.vehicle) {
        Ok(vehicle) => (StatusCode::CREATED, axum::Json(vehicle)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_vehicles_handler<V, R>(
    State(service): State<Arc<MarketplaceService<V, R>>>,
    Query(query): Query<OwnerQuery>,
) -> Response
where
    V: VehicleRepository + 'static,
    R: ServiceRequestRepository + 'static,
{
    let owner = UserId(query.owner_id);
    match service.vehicles_for(&owner) {
        Ok(vehicles) => {
            (StatusCode::OK, axum::Json(json!({ "vehicles": vehicles }))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_vehicle_handler<V, R>(
    State(service): State<Arc<MarketplaceService<V, R>>>,
    Path(vehicle_id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> Response
where
    V: VehicleRepository + 'static,
    R: ServiceRequestRepository + 'static,
{
    let owner = UserId(query.owner_id);
    match service.remove_vehicle(&owner, &VehicleId(vehicle_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_request_handler<V, R>(
    State(service): State<Arc<MarketplaceService<V, R>>>,
    axum::Json(payload): axum::Json<SubmitRequestRequest>,
) -> Response
where
    V: VehicleRepository + 'static,
    R: ServiceRequestRepository + 'static,
{
    let tier = match parse_tier(&payload.tier) {
        Ok(tier) => tier,
        Err(response) => return response,
    };

    let requester = UserId(payload.requester_id);
    let vehicle_id = VehicleId(payload.vehicle_id);
    let now = payload
        .submitted_at
        .unwrap_or_else(|| Local::now().naive_local());

    match service.submit_request(
        &requester,
        tier,
        &vehicle_id,
        payload.service_type,
        payload.description,
        now,
    ) {
        Ok(request) => (StatusCode::CREATED, axum::Json(request.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn request_status_handler<V, R>(
    State(service): State<Arc<MarketplaceService<V, R>>>,
    Path(request_id): Path<String>,
) -> Response
where
    V: VehicleRepository + 'static,
    R: ServiceRequestRepository + 'static,
{
    match service.request(&RequestId(request_id)) {
        Ok(request) => (StatusCode::OK, axum::Json(request.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn open_requests_handler<V, R>(
    State(service): State<Arc<MarketplaceService<V, R>>>,
) -> Response
where
    V: VehicleRepository + 'static,
    R: ServiceRequestRepository + 'static,
{
    match service.open_requests() {
        Ok(requests) => {
            let views: Vec<_> = requests.iter().map(|request| request.view()).collect();
            (StatusCode::OK, axum::Json(json!({ "requests": views }))).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn transition_response<V, R>(
    service: Arc<MarketplaceService<V, R>>,
    request_id: String,
    mechanic_id: String,
    action: MechanicAction,
) -> Response
where
    V: VehicleRepository + 'static,
    R: ServiceRequestRepository + 'static,
{
    let mechanic = UserId(mechanic_id);
    let id = RequestId(request_id);
    let result = match action {
        MechanicAction::Accept => service.accept(&mechanic, &id),
        MechanicAction::Reject => service.reject(&mechanic, &id),
        MechanicAction::Start => service.start(&mechanic, &id),
        MechanicAction::Complete => service.complete(&mechanic, &id),
    };

    match result {
        Ok(request) => (StatusCode::OK, axum::Json(request.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn accept_handler<V, R>(
    State(service): State<Arc<MarketplaceService<V, R>>>,
    Path(request_id): Path<String>,
    axum::Json(payload): axum::Json<TransitionRequest>,
) -> Response
where
    V: VehicleRepository + 'static,
    R: ServiceRequestRepository + 'static,
{
    transition_response(service, request_id, payload.mechanic_id, MechanicAction::Accept).await
}

pub(crate) async fn reject_handler<V, R>(
    State(service): State<Arc<MarketplaceService<V, R>>>,
    Path(request_id): Path<String>,
    axum::Json(payload): axum::Json<TransitionRequest>,
) -> Response
where
    V: VehicleRepository + 'static,
    R: ServiceRequestRepository + 'static,
{
    transition_response(service, request_id, payload.mechanic_id, MechanicAction::Reject).await
}

pub(crate) async fn start_handler<V, R>(
    State(service): State<Arc<MarketplaceService<V, R>>>,
    Path(request_id): Path<String>,
    axum::Json(payload): axum::Json<TransitionRequest>,
) -> Response
where
    V: VehicleRepository + 'static,
    R: ServiceRequestRepository + 'static,
{
    transition_response(service, request_id, payload.mechanic_id, MechanicAction::Start).await
}

pub(crate) async fn complete_handler<V, R>(
    State(service): State<Arc<MarketplaceService<V, R>>>,
    Path(request_id): Path<String>,
    axum::Json(payload): axum::Json<TransitionRequest>,
) -> Response
where
    V: VehicleRepository + 'static,
    R: ServiceRequestRepository + 'static,
{
    transition_response(
        service,
        request_id,
        payload.mechanic_id,
        MechanicAction::Complete,
    )
    .await
}
