//! Vehicle API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::data::types::{NewVehicle, VehicleRow};

/// Vehicle DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleDto {
    pub id: String,
    pub make: String,
    pub model: String,
    pub license_plate: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<VehicleRow> for VehicleDto {
    fn from(row: VehicleRow) -> Self {
        Self {
            id: row.id,
            make: row.make,
            model: row.model,
            license_plate: row.license_plate,
            color: row.color,
            created_at: DateTime::from_timestamp(row.created_at, 0).unwrap_or_else(Utc::now),
        }
    }
}

/// List of the caller's vehicles
#[derive(Debug, Serialize, ToSchema)]
pub struct ListVehiclesResponse {
    pub data: Vec<VehicleDto>,
}

fn validate_license_plate(plate: &str) -> Result<(), ValidationError> {
    let plate = plate.trim();
    if plate.is_empty() || plate.len() > 20 {
        return Err(ValidationError::new("plate_length")
            .with_message("License plate must be 1-20 characters".into()));
    }
    if !plate
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-')
    {
        return Err(ValidationError::new("plate_chars").with_message(
            "License plate may contain only letters, digits, spaces and dashes".into(),
        ));
    }
    Ok(())
}

/// Canonical plate form: trimmed, uppercase, single spaces
pub fn normalize_plate(plate: &str) -> String {
    plate
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Request body for registering a vehicle
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 50, message = "Make must be 1-50 characters"))]
    pub make: String,

    #[validate(length(min = 1, max = 50, message = "Model must be 1-50 characters"))]
    pub model: String,

    #[validate(custom(function = "validate_license_plate"))]
    pub license_plate: String,

    #[validate(length(max = 30, message = "Color must be at most 30 characters"))]
    pub color: Option<String>,
}

impl CreateVehicleRequest {
    pub fn into_new_vehicle(self, user_id: &str) -> NewVehicle {
        NewVehicle {
            user_id: user_id.to_string(),
            make: self.make.trim().to_string(),
            model: self.model.trim().to_string(),
            license_plate: normalize_plate(&self.license_plate),
            color: self
                .color
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate("  abc   123 "), "ABC 123");
        assert_eq!(normalize_plate("xy-9"), "XY-9");
    }

    #[test]
    fn test_plate_validation() {
        assert!(validate_license_plate("ABC 123").is_ok());
        assert!(validate_license_plate("   ").is_err());
        assert!(validate_license_plate("ABC_123").is_err());
        assert!(validate_license_plate(&"A".repeat(21)).is_err());
    }

    #[test]
    fn test_into_new_vehicle_drops_blank_color() {
        let req = CreateVehicleRequest {
            make: " Honda ".to_string(),
            model: "Civic".to_string(),
            license_plate: "abc 123".to_string(),
            color: Some("  ".to_string()),
        };
        assert!(req.validate().is_ok());
        let v = req.into_new_vehicle("u1");
        assert_eq!(v.make, "Honda");
        assert_eq!(v.license_plate, "ABC 123");
        assert!(v.color.is_none());
    }
}
