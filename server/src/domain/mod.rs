//! Domain logic independent of transport and storage
//!
//! - `search` - spot search criteria, query builder and geo distance
//! - `filters` - client-side filter state controller

pub mod filters;
pub mod search;

pub use filters::{FilterController, FilterState};
pub use search::{SearchCriteria, SpotQuery, build_spot_query};
