//! Great-circle distance on a spherical earth
//!
//! Uses the spherical law of cosines. The cosine of the central angle is
//! clamped to [-1, 1] before `acos`, and identical points short-circuit to
//! exactly 1.0, so floating-point drift can never produce NaN.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mean earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// WGS84 coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Returns `None` for non-finite or out-of-range coordinates
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        if !lat.is_finite() || !lng.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return None;
        }
        Some(Self { lat, lng })
    }

    pub fn trig(&self) -> PointTrig {
        let (sin_lat, cos_lat) = self.lat.to_radians().sin_cos();
        let (sin_lng, cos_lng) = self.lng.to_radians().sin_cos();
        PointTrig {
            sin_lat,
            cos_lat,
            sin_lng,
            cos_lng,
        }
    }
}

/// Sines and cosines of a point's coordinates, stored alongside each spot so
/// the radius filter needs only arithmetic in SQL.
///
/// With these, `cos(lng2 - lng1)` expands to
/// `cos_lng1 * cos_lng2 + sin_lng1 * sin_lng2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointTrig {
    pub sin_lat: f64,
    pub cos_lat: f64,
    pub sin_lng: f64,
    pub cos_lng: f64,
}

/// Search center plus a strictly positive radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoRadius {
    pub center: GeoPoint,
    pub radius_km: f64,
}

impl GeoRadius {
    pub fn new(center: GeoPoint, radius_km: f64) -> Option<Self> {
        (radius_km.is_finite() && radius_km > 0.0).then_some(Self { center, radius_km })
    }

    /// True when `point` lies within the radius (inclusive)
    pub fn contains(&self, point: GeoPoint) -> bool {
        distance_km(self.center, point) <= self.radius_km
    }

    /// Smallest central-angle cosine still inside the radius.
    ///
    /// `acos` is decreasing on [-1, 1], so `R * acos(c) <= radius` holds
    /// exactly when `c >= cos(radius / R)`. Radii spanning half the globe or
    /// more cover every point.
    pub fn min_angle_cos(&self) -> f64 {
        let angle = self.radius_km / EARTH_RADIUS_KM;
        if angle >= std::f64::consts::PI {
            -1.0
        } else {
            angle.cos()
        }
    }
}

/// Cosine of the central angle between two points, clamped to [-1, 1]
pub fn central_angle_cos(a: GeoPoint, b: GeoPoint) -> f64 {
    if a.lat == b.lat && a.lng == b.lng {
        return 1.0;
    }

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    (lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * delta_lng.cos()).clamp(-1.0, 1.0)
}

/// Great-circle distance in kilometres
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    EARTH_RADIUS_KM * central_angle_cos(a, b).acos()
}
