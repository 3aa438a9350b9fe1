//! Marketplace row types: spots, vehicles and bookings
//!
//! Timestamps are unix seconds. Amenities are stored as a JSON array of
//! normalized (trimmed, lowercase) strings.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Spot types
// ============================================================================

/// Spot row from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotRow {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub price_per_hour: f64,
    pub lat: f64,
    pub lng: f64,
    pub amenities: BTreeSet<String>,
    pub available: bool,
    pub active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields for a new spot listing
#[derive(Debug, Clone)]
pub struct NewSpot {
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub price_per_hour: f64,
    pub lat: f64,
    pub lng: f64,
    pub amenities: BTreeSet<String>,
    pub available: bool,
}

/// Partial spot update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct SpotUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub price_per_hour: Option<f64>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub amenities: Option<BTreeSet<String>>,
    pub available: Option<bool>,
}

impl SpotUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.price_per_hour.is_none()
            && self.lat.is_none()
            && self.lng.is_none()
            && self.amenities.is_none()
            && self.available.is_none()
    }
}

// ============================================================================
// Vehicle types
// ============================================================================

/// Vehicle row from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRow {
    pub id: String,
    pub user_id: String,
    pub make: String,
    pub model: String,
    pub license_plate: String,
    pub color: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub user_id: String,
    pub make: String,
    pub model: String,
    pub license_plate: String,
    pub color: Option<String>,
}

// ============================================================================
// Booking types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether a booking in this status holds its time slot
    pub fn blocks_slot(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Booking row from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRow {
    pub id: String,
    pub spot_id: String,
    pub user_id: String,
    pub vehicle_id: Option<String>,
    pub start_time: i64,
    pub end_time: i64,
    pub total_price: f64,
    pub status: BookingStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub spot_id: String,
    pub user_id: String,
    pub vehicle_id: Option<String>,
    pub start_time: i64,
    pub end_time: i64,
    pub total_price: f64,
}

/// Outcome of a booking cancellation
#[derive(Debug, Clone, PartialEq)]
pub enum CancelResult {
    Cancelled(BookingRow),
    AlreadyCancelled,
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_status_round_trip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("CONFIRMED"), Some(BookingStatus::Confirmed));
        assert_eq!(BookingStatus::parse("refunded"), None);
    }

    #[test]
    fn test_only_cancelled_frees_slot() {
        assert!(BookingStatus::Pending.blocks_slot());
        assert!(BookingStatus::Confirmed.blocks_slot());
        assert!(!BookingStatus::Cancelled.blocks_slot());
    }

    #[test]
    fn test_spot_update_is_empty() {
        assert!(SpotUpdate::default().is_empty());
        let update = SpotUpdate {
            available: Some(false),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
