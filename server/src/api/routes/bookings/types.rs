//! Booking API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::is_valid_id;
use crate::api::types::ApiError;
use crate::core::constants::MAX_BOOKING_HOURS;
use crate::data::types::{BookingRow, BookingStatus};

const SECS_PER_HOUR: i64 = 3600;

/// Booking DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: String,
    pub spot_id: String,
    pub vehicle_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_price: f64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BookingRow> for BookingDto {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            spot_id: row.spot_id,
            vehicle_id: row.vehicle_id,
            start_time: DateTime::from_timestamp(row.start_time, 0).unwrap_or_else(Utc::now),
            end_time: DateTime::from_timestamp(row.end_time, 0).unwrap_or_else(Utc::now),
            total_price: row.total_price,
            status: row.status,
            created_at: DateTime::from_timestamp(row.created_at, 0).unwrap_or_else(Utc::now),
            updated_at: DateTime::from_timestamp(row.updated_at, 0).unwrap_or_else(Utc::now),
        }
    }
}

/// Request body for booking a spot. Times are RFC 3339.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, max = 256, message = "Spot ID must be 1-256 characters"))]
    pub spot_id: String,

    #[validate(length(min = 1, max = 256, message = "Vehicle ID must be 1-256 characters"))]
    pub vehicle_id: Option<String>,

    pub start_time: DateTime<Utc>,

    pub end_time: DateTime<Utc>,
}

/// A validated booking window in unix seconds, `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    pub start: i64,
    pub end: i64,
}

impl BookingWindow {
    pub fn hours(&self) -> f64 {
        (self.end - self.start) as f64 / SECS_PER_HOUR as f64
    }

    /// `hours × price_per_hour`, rounded to cents
    pub fn total_price(&self, price_per_hour: f64) -> f64 {
        (self.hours() * price_per_hour * 100.0).round() / 100.0
    }
}

impl CreateBookingRequest {
    /// Check ids and the time window; sub-second precision is dropped
    pub fn window(&self) -> Result<BookingWindow, ApiError> {
        if !is_valid_id(&self.spot_id) {
            return Err(ApiError::bad_request("INVALID_ID", "Invalid spot ID format"));
        }
        if let Some(vehicle_id) = &self.vehicle_id
            && !is_valid_id(vehicle_id)
        {
            return Err(ApiError::bad_request("INVALID_ID", "Invalid vehicle ID format"));
        }

        let window = BookingWindow {
            start: self.start_time.timestamp(),
            end: self.end_time.timestamp(),
        };
        if window.start >= window.end {
            return Err(ApiError::bad_request(
                "INVALID_TIME_RANGE",
                "start_time must be before end_time",
            ));
        }
        if window.end - window.start > MAX_BOOKING_HOURS * SECS_PER_HOUR {
            return Err(ApiError::bad_request(
                "INVALID_TIME_RANGE",
                format!("Bookings may last at most {} hours", MAX_BOOKING_HOURS),
            ));
        }
        Ok(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bad_request_code(err: ApiError) -> String {
        match err {
            ApiError::BadRequest { code, .. } => code,
            other => panic!("unexpected {other:?}"),
        }
    }

    fn request(start: &str, end: &str) -> CreateBookingRequest {
        serde_json::from_value(serde_json::json!({
            "spot_id": "spot-1",
            "start_time": start,
            "end_time": end,
        }))
        .unwrap()
    }

    #[test]
    fn test_window_and_price() {
        let req = request("2026-01-01T10:00:00Z", "2026-01-01T12:30:00Z");
        let window = req.window().ok().unwrap();
        assert_eq!(window.end - window.start, 9000);
        assert_eq!(window.hours(), 2.5);
        assert_eq!(window.total_price(12.0), 30.0);
        assert_eq!(window.total_price(3.333), 8.33);
    }

    #[test]
    fn test_window_rejects_inverted_and_empty_ranges() {
        let err = request("2026-01-01T12:00:00Z", "2026-01-01T10:00:00Z")
            .window()
            .unwrap_err();
        assert_eq!(bad_request_code(err), "INVALID_TIME_RANGE");

        assert!(
            request("2026-01-01T12:00:00Z", "2026-01-01T12:00:00Z")
                .window()
                .is_err()
        );
    }

    #[test]
    fn test_window_rejects_overlong_booking() {
        assert!(
            request("2026-01-01T00:00:00Z", "2026-03-01T00:00:00Z")
                .window()
                .is_err()
        );
    }

    #[test]
    fn test_window_accepts_offsets() {
        let req = request("2026-01-01T10:00:00+02:00", "2026-01-01T09:00:00Z");
        let window = req.window().ok().unwrap();
        assert_eq!(window.hours(), 1.0);
    }

    #[test]
    fn test_window_rejects_bad_vehicle_id() {
        let mut req = request("2026-01-01T10:00:00Z", "2026-01-01T11:00:00Z");
        req.vehicle_id = Some("bad id".to_string());
        assert_eq!(bad_request_code(req.window().unwrap_err()), "INVALID_ID");
    }
}
