//! ParkSpot server: a parking-spot marketplace HTTP API
//!
//! - `core` - CLI, configuration, storage directories, shutdown
//! - `data` - SQLite persistence behind `MarketplaceRepository`
//! - `domain` - spot search query builder and filter state controller
//! - `api` - axum routes, identity middleware, OpenAPI

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
