//! Booking API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::auth::CurrentUser;
use crate::api::extractors::{IdPath, ValidatedJson, ValidatedQuery};
use crate::api::types::{ApiError, ListQuery, PaginatedResponse};
use crate::data::TransactionalService;
use crate::data::types::{BookingRow, CancelResult, NewBooking};

use types::{BookingDto, CreateBookingRequest};

/// Shared state for Bookings API endpoints
#[derive(Clone)]
pub struct BookingsApiState {
    pub database: Arc<TransactionalService>,
}

/// Build Bookings API routes
pub fn routes(database: Arc<TransactionalService>) -> Router<()> {
    let state = BookingsApiState { database };

    Router::new()
        .route("/", get(list_bookings).post(create_booking))
        .route("/{id}", get(get_booking))
        .route("/{id}/cancel", post(cancel_booking))
        .with_state(state)
}

fn booking_not_found(id: &str) -> ApiError {
    ApiError::not_found("BOOKING_NOT_FOUND", format!("Booking not found: {}", id))
}

/// Load a booking made by the caller; anyone else's is reported as missing
async fn load_own_booking(
    state: &BookingsApiState,
    user: &CurrentUser,
    id: &str,
) -> Result<BookingRow, ApiError> {
    state
        .database
        .repository()
        .get_booking(id)
        .await
        .map_err(ApiError::from_data)?
        .filter(|b| user.auth.owns(&b.user_id))
        .ok_or_else(|| booking_not_found(id))
}

/// List the caller's bookings, most recent start first
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "bookings",
    params(ListQuery),
    responses(
        (status = 200, description = "Caller's bookings with pagination metadata")
    )
)]
pub async fn list_bookings(
    State(state): State<BookingsApiState>,
    user: CurrentUser,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> Result<Json<PaginatedResponse<BookingDto>>, ApiError> {
    let (rows, total) = state
        .database
        .repository()
        .list_bookings(user.user_id(), query.page, query.limit)
        .await
        .map_err(ApiError::from_data)?;

    let data: Vec<BookingDto> = rows.into_iter().map(BookingDto::from).collect();

    Ok(Json(PaginatedResponse::new(
        data,
        query.page,
        query.limit,
        total,
    )))
}

/// Book a spot for a time window
///
/// The spot must be active and available. The total price is the booked
/// hours times the spot's hourly price.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingDto),
        (status = 400, description = "Invalid request or unavailable spot"),
        (status = 404, description = "Spot or vehicle not found"),
        (status = 409, description = "Overlaps an existing booking")
    )
)]
pub async fn create_booking(
    State(state): State<BookingsApiState>,
    user: CurrentUser,
    ValidatedJson(body): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingDto>), ApiError> {
    let window = body.window()?;
    let repo = state.database.repository();

    let spot = repo
        .get_spot(&body.spot_id)
        .await
        .map_err(ApiError::from_data)?
        .filter(|s| s.active)
        .ok_or_else(|| {
            ApiError::not_found("SPOT_NOT_FOUND", format!("Spot not found: {}", body.spot_id))
        })?;

    if !spot.available {
        return Err(ApiError::bad_request(
            "SPOT_UNAVAILABLE",
            "Spot is not accepting bookings",
        ));
    }

    if let Some(vehicle_id) = &body.vehicle_id {
        repo.get_vehicle(vehicle_id)
            .await
            .map_err(ApiError::from_data)?
            .filter(|v| user.auth.owns(&v.user_id))
            .ok_or_else(|| {
                ApiError::not_found(
                    "VEHICLE_NOT_FOUND",
                    format!("Vehicle not found: {}", vehicle_id),
                )
            })?;
    }

    let new_booking = NewBooking {
        spot_id: spot.id,
        user_id: user.user_id().to_string(),
        vehicle_id: body.vehicle_id,
        start_time: window.start,
        end_time: window.end,
        total_price: window.total_price(spot.price_per_hour),
    };

    let booking = repo
        .create_booking(&new_booking)
        .await
        .map_err(ApiError::from_data)?;

    tracing::debug!(
        booking_id = %booking.id,
        spot_id = %booking.spot_id,
        total_price = booking.total_price,
        "Booking created"
    );

    Ok((StatusCode::CREATED, Json(BookingDto::from(booking))))
}

/// Get one of the caller's bookings
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = String, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking details", body = BookingDto),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingsApiState>,
    user: CurrentUser,
    path: IdPath,
) -> Result<Json<BookingDto>, ApiError> {
    let booking = load_own_booking(&state, &user, &path.id).await?;
    Ok(Json(BookingDto::from(booking)))
}

/// Cancel one of the caller's bookings, freeing its time slot
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/cancel",
    tag = "bookings",
    params(
        ("id" = String, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingDto),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking already cancelled")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingsApiState>,
    user: CurrentUser,
    path: IdPath,
) -> Result<Json<BookingDto>, ApiError> {
    load_own_booking(&state, &user, &path.id).await?;

    match state
        .database
        .repository()
        .cancel_booking(&path.id)
        .await
        .map_err(ApiError::from_data)?
    {
        CancelResult::Cancelled(booking) => {
            tracing::debug!(booking_id = %booking.id, "Booking cancelled");
            Ok(Json(BookingDto::from(booking)))
        }
        CancelResult::AlreadyCancelled => Err(ApiError::conflict(
            "ALREADY_CANCELLED",
            format!("Booking already cancelled: {}", path.id),
        )),
        CancelResult::NotFound => Err(booking_not_found(&path.id)),
    }
}
