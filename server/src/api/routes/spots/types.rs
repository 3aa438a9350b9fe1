//! Spot API types

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::data::types::{NewSpot, SpotRow, SpotUpdate};
use crate::domain::search::criteria::normalize_amenity;
use crate::domain::search::{GeoPoint, distance_km};

/// Most amenities a single spot may list
pub const MAX_AMENITIES: usize = 20;

/// Spot DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct SpotDto {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub price_per_hour: f64,
    pub location: GeoPoint,
    pub amenities: Vec<String>,
    pub available: bool,
    pub active: bool,
    /// Distance from the search center; present only for radius searches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SpotDto {
    /// Annotate with the great-circle distance from `center`, rounded to metres
    pub fn with_distance_from(mut self, center: GeoPoint) -> Self {
        let km = distance_km(center, self.location);
        self.distance_km = Some((km * 1000.0).round() / 1000.0);
        self
    }
}

impl From<SpotRow> for SpotDto {
    fn from(row: SpotRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            description: row.description,
            address: row.address,
            city: row.city,
            state: row.state,
            price_per_hour: row.price_per_hour,
            location: GeoPoint {
                lat: row.lat,
                lng: row.lng,
            },
            amenities: row.amenities.into_iter().collect(),
            available: row.available,
            active: row.active,
            distance_km: None,
            created_at: DateTime::from_timestamp(row.created_at, 0).unwrap_or_else(Utc::now),
            updated_at: DateTime::from_timestamp(row.updated_at, 0).unwrap_or_else(Utc::now),
        }
    }
}

fn validate_amenities(amenities: &[String]) -> Result<(), ValidationError> {
    if amenities.len() > MAX_AMENITIES {
        return Err(ValidationError::new("amenities_too_many").with_message(
            format!("At most {} amenities are allowed", MAX_AMENITIES).into(),
        ));
    }
    if amenities
        .iter()
        .any(|a| a.trim().is_empty() || a.len() > 50 || a.contains(','))
    {
        return Err(ValidationError::new("amenity_invalid").with_message(
            "Amenities must be 1-50 characters and must not contain commas".into(),
        ));
    }
    Ok(())
}

fn normalize_amenities(amenities: &[String]) -> BTreeSet<String> {
    amenities.iter().map(|a| normalize_amenity(a)).collect()
}

fn default_available() -> bool {
    true
}

/// Request body for listing a new spot
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSpotRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 300, message = "Address must be 1-300 characters"))]
    pub address: String,

    #[validate(length(min = 1, max = 100, message = "City must be 1-100 characters"))]
    pub city: String,

    #[validate(length(min = 1, max = 100, message = "State must be 1-100 characters"))]
    pub state: String,

    #[validate(range(min = 0.0, max = 10000.0, message = "Price per hour must be 0-10000"))]
    pub price_per_hour: f64,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lng: f64,

    #[serde(default)]
    #[validate(custom(function = "validate_amenities"))]
    pub amenities: Vec<String>,

    #[serde(default = "default_available")]
    pub available: bool,
}

impl CreateSpotRequest {
    pub fn into_new_spot(self, owner_id: &str) -> NewSpot {
        NewSpot {
            owner_id: owner_id.to_string(),
            amenities: normalize_amenities(&self.amenities),
            title: self.title.trim().to_string(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            price_per_hour: self.price_per_hour,
            lat: self.lat,
            lng: self.lng,
            available: self.available,
        }
    }
}

/// Request body for updating a spot; omitted fields are unchanged
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSpotRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 300, message = "Address must be 1-300 characters"))]
    pub address: Option<String>,

    #[validate(length(min = 1, max = 100, message = "City must be 1-100 characters"))]
    pub city: Option<String>,

    #[validate(length(min = 1, max = 100, message = "State must be 1-100 characters"))]
    pub state: Option<String>,

    #[validate(range(min = 0.0, max = 10000.0, message = "Price per hour must be 0-10000"))]
    pub price_per_hour: Option<f64>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lng: Option<f64>,

    #[validate(custom(function = "validate_amenities"))]
    pub amenities: Option<Vec<String>>,

    pub available: Option<bool>,
}

impl UpdateSpotRequest {
    pub fn into_update(self) -> SpotUpdate {
        SpotUpdate {
            amenities: self.amenities.as_deref().map(normalize_amenities),
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description,
            address: self.address.map(|a| a.trim().to_string()),
            city: self.city.map(|c| c.trim().to_string()),
            state: self.state.map(|s| s.trim().to_string()),
            price_per_hour: self.price_per_hour,
            lat: self.lat,
            lng: self.lng,
            available: self.available,
        }
    }
}
