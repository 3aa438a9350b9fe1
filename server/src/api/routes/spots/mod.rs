//! Spot API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::auth::CurrentUser;
use crate::api::extractors::{IdPath, ValidatedJson, ValidatedQuery};
use crate::api::types::{ApiError, ListQuery, PaginatedResponse};
use crate::data::TransactionalService;
use crate::data::types::SpotRow;
use crate::domain::search::{SearchCriteria, SearchLimits, SearchParams, build_spot_query};

use types::{CreateSpotRequest, SpotDto, UpdateSpotRequest};

/// Shared state for Spots API endpoints
#[derive(Clone)]
pub struct SpotsApiState {
    pub database: Arc<TransactionalService>,
    pub search_limits: SearchLimits,
}

/// Build Spots API routes
pub fn routes(database: Arc<TransactionalService>, search_limits: SearchLimits) -> Router<()> {
    let state = SpotsApiState {
        database,
        search_limits,
    };

    Router::new()
        .route("/", get(search_spots).post(create_spot))
        .route("/mine", get(list_my_spots))
        .route(
            "/{id}",
            get(get_spot).put(update_spot).delete(delete_spot),
        )
        .with_state(state)
}

fn spot_not_found(id: &str) -> ApiError {
    ApiError::not_found("SPOT_NOT_FOUND", format!("Spot not found: {}", id))
}

/// Load a spot the caller may modify: 404 if missing, 403 if not the owner
async fn load_owned_spot(
    state: &SpotsApiState,
    user: &CurrentUser,
    id: &str,
) -> Result<SpotRow, ApiError> {
    let spot = state
        .database
        .repository()
        .get_spot(id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| spot_not_found(id))?;

    user.auth.require_owner(&spot.owner_id, "spot")?;
    Ok(spot)
}

/// Search active spots
///
/// Unparseable numeric parameters are ignored. `lat`, `lng` and `radius`
/// must all be present for the radius filter to apply.
#[utoipa::path(
    get,
    path = "/api/v1/spots",
    tag = "spots",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching spots with pagination metadata"),
        (status = 400, description = "minPrice greater than maxPrice")
    )
)]
pub async fn search_spots(
    State(state): State<SpotsApiState>,
    _user: CurrentUser,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<PaginatedResponse<SpotDto>>, ApiError> {
    let Query(params) =
        params.map_err(|e| ApiError::bad_request("QUERY_PARSE_ERROR", e.body_text()))?;

    let criteria = SearchCriteria::from_params(&params, state.search_limits)?;
    let query = build_spot_query(&criteria);

    tracing::debug!(
        page = criteria.page,
        page_size = criteria.page_size,
        geo = criteria.geo.is_some(),
        amenities = criteria.amenities.len(),
        "Searching spots"
    );

    let (rows, total) = state
        .database
        .repository()
        .search_spots(&query)
        .await
        .map_err(ApiError::from_data)?;

    let data: Vec<SpotDto> = rows
        .into_iter()
        .map(|row| {
            let dto = SpotDto::from(row);
            match criteria.geo {
                Some(geo) => dto.with_distance_from(geo.center),
                None => dto,
            }
        })
        .collect();

    Ok(Json(PaginatedResponse::new(
        data,
        criteria.page,
        criteria.page_size,
        total,
    )))
}

/// List the caller's own spots, including deactivated ones
#[utoipa::path(
    get,
    path = "/api/v1/spots/mine",
    tag = "spots",
    params(ListQuery),
    responses(
        (status = 200, description = "Caller's spots with pagination metadata")
    )
)]
pub async fn list_my_spots(
    State(state): State<SpotsApiState>,
    user: CurrentUser,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> Result<Json<PaginatedResponse<SpotDto>>, ApiError> {
    let (rows, total) = state
        .database
        .repository()
        .list_spots_for_owner(user.user_id(), query.page, query.limit)
        .await
        .map_err(ApiError::from_data)?;

    let data: Vec<SpotDto> = rows.into_iter().map(SpotDto::from).collect();

    Ok(Json(PaginatedResponse::new(
        data,
        query.page,
        query.limit,
        total,
    )))
}

/// Get a single spot; deactivated spots are visible only to their owner
#[utoipa::path(
    get,
    path = "/api/v1/spots/{id}",
    tag = "spots",
    params(
        ("id" = String, Path, description = "Spot ID")
    ),
    responses(
        (status = 200, description = "Spot details", body = SpotDto),
        (status = 404, description = "Spot not found")
    )
)]
pub async fn get_spot(
    State(state): State<SpotsApiState>,
    user: CurrentUser,
    path: IdPath,
) -> Result<Json<SpotDto>, ApiError> {
    let spot = state
        .database
        .repository()
        .get_spot(&path.id)
        .await
        .map_err(ApiError::from_data)?
        .filter(|s| s.active || user.auth.owns(&s.owner_id))
        .ok_or_else(|| spot_not_found(&path.id))?;

    Ok(Json(SpotDto::from(spot)))
}

/// List a new spot owned by the caller
#[utoipa::path(
    post,
    path = "/api/v1/spots",
    tag = "spots",
    request_body = CreateSpotRequest,
    responses(
        (status = 201, description = "Spot created", body = SpotDto),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_spot(
    State(state): State<SpotsApiState>,
    user: CurrentUser,
    ValidatedJson(body): ValidatedJson<CreateSpotRequest>,
) -> Result<(StatusCode, Json<SpotDto>), ApiError> {
    let new_spot = body.into_new_spot(user.user_id());

    let spot = state
        .database
        .repository()
        .create_spot(&new_spot)
        .await
        .map_err(ApiError::from_data)?;

    tracing::debug!(spot_id = %spot.id, owner_id = %spot.owner_id, "Spot created");

    Ok((StatusCode::CREATED, Json(SpotDto::from(spot))))
}

/// Update a spot (owner only)
#[utoipa::path(
    put,
    path = "/api/v1/spots/{id}",
    tag = "spots",
    params(
        ("id" = String, Path, description = "Spot ID")
    ),
    request_body = UpdateSpotRequest,
    responses(
        (status = 200, description = "Spot updated", body = SpotDto),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Caller does not own the spot"),
        (status = 404, description = "Spot not found")
    )
)]
pub async fn update_spot(
    State(state): State<SpotsApiState>,
    user: CurrentUser,
    path: IdPath,
    ValidatedJson(body): ValidatedJson<UpdateSpotRequest>,
) -> Result<Json<SpotDto>, ApiError> {
    let current = load_owned_spot(&state, &user, &path.id).await?;

    let update = body.into_update();
    if update.is_empty() {
        return Ok(Json(SpotDto::from(current)));
    }

    let spot = state
        .database
        .repository()
        .update_spot(&path.id, &update)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| spot_not_found(&path.id))?;

    Ok(Json(SpotDto::from(spot)))
}

/// Deactivate a spot (owner only); it no longer appears in search.
/// Deactivating an already inactive spot is a no-op.
#[utoipa::path(
    delete,
    path = "/api/v1/spots/{id}",
    tag = "spots",
    params(
        ("id" = String, Path, description = "Spot ID")
    ),
    responses(
        (status = 204, description = "Spot deactivated"),
        (status = 403, description = "Caller does not own the spot"),
        (status = 404, description = "Spot not found")
    )
)]
pub async fn delete_spot(
    State(state): State<SpotsApiState>,
    user: CurrentUser,
    path: IdPath,
) -> Result<StatusCode, ApiError> {
    let spot = load_owned_spot(&state, &user, &path.id).await?;
    if !spot.active {
        return Ok(StatusCode::NO_CONTENT);
    }

    let deactivated = state
        .database
        .repository()
        .deactivate_spot(&path.id)
        .await
        .map_err(ApiError::from_data)?;

    tracing::debug!(spot_id = %path.id, deactivated, "Spot deactivated");
    Ok(StatusCode::NO_CONTENT)
}
