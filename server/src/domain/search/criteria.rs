//! Search criteria
//!
//! `SearchParams` is the raw transport shape (every field an optional
//! string). `SearchCriteria::from_params` turns it into typed criteria.
//! Unparseable numbers are treated as absent rather than as errors, so a
//! malformed bound simply drops its clause from the query.

use std::collections::BTreeSet;

use serde::Deserialize;
use thiserror::Error;
use utoipa::IntoParams;

use super::geo::{GeoPoint, GeoRadius};
use crate::core::constants::{DEFAULT_SEARCH_PAGE_SIZE, MAX_SEARCH_PAGE_SIZE};

/// Raw spot search query parameters
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Page number (1-based)
    pub page: Option<String>,
    /// Page size
    pub limit: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    /// Minimum hourly price (inclusive)
    pub min_price: Option<String>,
    /// Maximum hourly price (inclusive)
    pub max_price: Option<String>,
    /// Comma-separated amenity list; a spot matches if it has any of them
    pub amenities: Option<String>,
    /// Free-text search over title, description, address and city
    pub search: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    /// Search radius in kilometres (requires lat and lng)
    pub radius: Option<String>,
    /// Only spots currently marked available (true) or unavailable (false)
    pub available: Option<String>,
}

/// Page size bounds applied while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_SEARCH_PAGE_SIZE,
            max_page_size: MAX_SEARCH_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CriteriaError {
    #[error("Minimum price ({min}) cannot be greater than maximum price ({max})")]
    InvertedPriceRange { min: f64, max: f64 },
}

/// Typed, validated search criteria for one request
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    /// Empty means "no amenity filter"
    pub amenities: BTreeSet<String>,
    pub free_text: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub available: Option<bool>,
    pub geo: Option<GeoRadius>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            price_min: None,
            price_max: None,
            amenities: BTreeSet::new(),
            free_text: None,
            city: None,
            state: None,
            available: None,
            geo: None,
            page: 1,
            page_size: DEFAULT_SEARCH_PAGE_SIZE,
        }
    }
}

impl SearchCriteria {
    pub fn from_params(params: &SearchParams, limits: SearchLimits) -> Result<Self, CriteriaError> {
        let price_min = parse_number(params.min_price.as_deref());
        let price_max = parse_number(params.max_price.as_deref());

        if let (Some(min), Some(max)) = (price_min, price_max)
            && min > max
        {
            return Err(CriteriaError::InvertedPriceRange { min, max });
        }

        let geo = match (
            parse_number(params.lat.as_deref()),
            parse_number(params.lng.as_deref()),
            parse_number(params.radius.as_deref()),
        ) {
            (Some(lat), Some(lng), Some(radius)) => {
                GeoPoint::new(lat, lng).and_then(|center| GeoRadius::new(center, radius))
            }
            _ => None,
        };

        let page = parse_positive(params.page.as_deref()).unwrap_or(1);
        let page_size = parse_positive(params.limit.as_deref())
            .unwrap_or(limits.default_page_size)
            .min(limits.max_page_size);

        Ok(Self {
            price_min,
            price_max,
            amenities: parse_amenity_list(params.amenities.as_deref()),
            free_text: non_empty(params.search.as_deref()),
            city: non_empty(params.city.as_deref()),
            state: non_empty(params.state.as_deref()),
            available: parse_bool(params.available.as_deref()),
            geo,
            page,
            page_size,
        })
    }

    /// Row offset of the first record on the requested page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

/// Canonical amenity form used both when storing and when filtering
pub fn normalize_amenity(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn parse_amenity_list(raw: Option<&str>) -> BTreeSet<String> {
    raw.map(|s| {
        s.split(',')
            .map(normalize_amenity)
            .filter(|a| !a.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.map(str::trim)
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|v| *v >= 1)
}

fn parse_bool(raw: Option<&str>) -> Option<bool> {
    match raw.map(|s| s.trim().to_lowercase()).as_deref() {
        Some("true" | "1" | "yes") => Some(true),
        Some("false" | "0" | "no") => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SearchParams {
        SearchParams::default()
    }

    #[test]
    fn test_empty_params_produce_defaults() {
        let c = SearchCriteria::from_params(&params(), SearchLimits::default()).unwrap();
        assert_eq!(c, SearchCriteria::default());
    }

    #[test]
    fn test_unparseable_numbers_are_absent() {
        let p = SearchParams {
            min_price: Some("cheap".into()),
            max_price: Some("".into()),
            page: Some("-3".into()),
            limit: Some("lots".into()),
            ..params()
        };
        let c = SearchCriteria::from_params(&p, SearchLimits::default()).unwrap();
        assert_eq!(c.price_min, None);
        assert_eq!(c.price_max, None);
        assert_eq!(c.page, 1);
        assert_eq!(c.page_size, DEFAULT_SEARCH_PAGE_SIZE);
    }

    #[test]
    fn test_zero_min_price_is_kept() {
        let p = SearchParams {
            min_price: Some("0".into()),
            ..params()
        };
        let c = SearchCriteria::from_params(&p, SearchLimits::default()).unwrap();
        assert_eq!(c.price_min, Some(0.0));
        assert_eq!(c.price_max, None);
    }

    #[test]
    fn test_inverted_price_range_is_rejected() {
        let p = SearchParams {
            min_price: Some("60".into()),
            max_price: Some("50".into()),
            ..params()
        };
        let err = SearchCriteria::from_params(&p, SearchLimits::default()).unwrap_err();
        assert_eq!(
            err,
            CriteriaError::InvertedPriceRange {
                min: 60.0,
                max: 50.0
            }
        );
    }

    #[test]
    fn test_amenities_are_split_trimmed_and_lowercased() {
        let p = SearchParams {
            amenities: Some(" Covered, ev_charging,,SECURITY ".into()),
            ..params()
        };
        let c = SearchCriteria::from_params(&p, SearchLimits::default()).unwrap();
        let expected: BTreeSet<String> = ["covered", "ev_charging", "security"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(c.amenities, expected);
    }

    #[test]
    fn test_geo_requires_all_three_parameters() {
        let p = SearchParams {
            lat: Some("40.7".into()),
            lng: Some("-74.0".into()),
            ..params()
        };
        let c = SearchCriteria::from_params(&p, SearchLimits::default()).unwrap();
        assert!(c.geo.is_none());

        let p = SearchParams {
            lat: Some("40.7".into()),
            lng: Some("-74.0".into()),
            radius: Some("5".into()),
            ..params()
        };
        let c = SearchCriteria::from_params(&p, SearchLimits::default()).unwrap();
        let geo = c.geo.unwrap();
        assert_eq!(geo.center, GeoPoint { lat: 40.7, lng: -74.0 });
        assert_eq!(geo.radius_km, 5.0);
    }

    #[test]
    fn test_geo_with_invalid_radius_or_coordinates_is_absent() {
        let p = SearchParams {
            lat: Some("40.7".into()),
            lng: Some("-74.0".into()),
            radius: Some("0".into()),
            ..params()
        };
        assert!(
            SearchCriteria::from_params(&p, SearchLimits::default())
                .unwrap()
                .geo
                .is_none()
        );

        let p = SearchParams {
            lat: Some("140".into()),
            lng: Some("-74.0".into()),
            radius: Some("5".into()),
            ..params()
        };
        assert!(
            SearchCriteria::from_params(&p, SearchLimits::default())
                .unwrap()
                .geo
                .is_none()
        );
    }

    #[test]
    fn test_page_size_is_capped() {
        let limits = SearchLimits {
            default_page_size: 10,
            max_page_size: 25,
        };
        let p = SearchParams {
            limit: Some("1000".into()),
            page: Some("3".into()),
            ..params()
        };
        let c = SearchCriteria::from_params(&p, limits).unwrap();
        assert_eq!(c.page_size, 25);
        assert_eq!(c.page, 3);
        assert_eq!(c.offset(), 50);
    }

    #[test]
    fn test_text_and_location_fields_are_trimmed() {
        let p = SearchParams {
            search: Some("  downtown garage ".into()),
            city: Some(" Austin ".into()),
            state: Some("   ".into()),
            available: Some("TRUE".into()),
            ..params()
        };
        let c = SearchCriteria::from_params(&p, SearchLimits::default()).unwrap();
        assert_eq!(c.free_text.as_deref(), Some("downtown garage"));
        assert_eq!(c.city.as_deref(), Some("Austin"));
        assert_eq!(c.state, None);
        assert_eq!(c.available, Some(true));
    }

    #[test]
    fn test_unknown_boolean_is_absent() {
        assert_eq!(parse_bool(Some("maybe")), None);
        assert_eq!(parse_bool(Some("0")), Some(false));
        assert_eq!(parse_bool(None), None);
    }
}
