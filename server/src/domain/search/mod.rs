//! Spot search
//!
//! - `criteria` - transport parameters to typed `SearchCriteria`
//! - `query` - `SearchCriteria` to a SQL predicate with pagination
//! - `geo` - great-circle distance used by the radius filter

pub mod criteria;
pub mod geo;
pub mod query;

pub use criteria::{CriteriaError, SearchCriteria, SearchLimits, SearchParams};
pub use geo::{GeoPoint, GeoRadius, distance_km};
pub use query::{SpotQuery, SqlParams, SqlValue, build_spot_query};
