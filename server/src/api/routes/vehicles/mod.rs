//! Vehicle API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};

use crate::api::auth::CurrentUser;
use crate::api::extractors::{IdPath, ValidatedJson};
use crate::api::types::ApiError;
use crate::data::TransactionalService;

use types::{CreateVehicleRequest, ListVehiclesResponse, VehicleDto};

/// Shared state for Vehicles API endpoints
#[derive(Clone)]
pub struct VehiclesApiState {
    pub database: Arc<TransactionalService>,
}

/// Build Vehicles API routes
pub fn routes(database: Arc<TransactionalService>) -> Router<()> {
    let state = VehiclesApiState { database };

    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/{id}", delete(delete_vehicle))
        .with_state(state)
}

/// List the caller's vehicles
#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    tag = "vehicles",
    responses(
        (status = 200, description = "Caller's vehicles", body = ListVehiclesResponse)
    )
)]
pub async fn list_vehicles(
    State(state): State<VehiclesApiState>,
    user: CurrentUser,
) -> Result<Json<ListVehiclesResponse>, ApiError> {
    let rows = state
        .database
        .repository()
        .list_vehicles(user.user_id())
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(ListVehiclesResponse {
        data: rows.into_iter().map(VehicleDto::from).collect(),
    }))
}

/// Register a vehicle for the caller
#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    tag = "vehicles",
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle registered", body = VehicleDto),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Plate already registered by the caller")
    )
)]
pub async fn create_vehicle(
    State(state): State<VehiclesApiState>,
    user: CurrentUser,
    ValidatedJson(body): ValidatedJson<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<VehicleDto>), ApiError> {
    let vehicle = state
        .database
        .repository()
        .create_vehicle(&body.into_new_vehicle(user.user_id()))
        .await
        .map_err(ApiError::from_data)?;

    Ok((StatusCode::CREATED, Json(VehicleDto::from(vehicle))))
}

/// Remove one of the caller's vehicles
///
/// Other users' vehicles are reported as not found.
#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{id}",
    tag = "vehicles",
    params(
        ("id" = String, Path, description = "Vehicle ID")
    ),
    responses(
        (status = 204, description = "Vehicle removed"),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn delete_vehicle(
    State(state): State<VehiclesApiState>,
    user: CurrentUser,
    path: IdPath,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .database
        .repository()
        .delete_vehicle(&path.id, user.user_id())
        .await
        .map_err(ApiError::from_data)?;

    if !deleted {
        return Err(ApiError::not_found(
            "VEHICLE_NOT_FOUND",
            format!("Vehicle not found: {}", path.id),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
