//! Repository trait for the marketplace store
//!
//! Route handlers depend on this trait rather than on SQLite directly.
//! `Arc<SqliteService>` implements it in `sqlite::repository_impl`.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::{
    BookingRow, CancelResult, NewBooking, NewSpot, NewVehicle, SpotRow, SpotUpdate, VehicleRow,
};
use crate::domain::search::SpotQuery;

#[async_trait]
pub trait MarketplaceRepository: Send + Sync {
    // ==================== Spot Operations ====================

    /// Execute a built search; returns one page and the total match count
    async fn search_spots(&self, query: &SpotQuery) -> Result<(Vec<SpotRow>, u64), DataError>;

    /// Get a spot by ID, including deactivated spots
    async fn get_spot(&self, id: &str) -> Result<Option<SpotRow>, DataError>;

    /// List an owner's spots with pagination
    async fn list_spots_for_owner(
        &self,
        owner_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<SpotRow>, u64), DataError>;

    async fn create_spot(&self, spot: &NewSpot) -> Result<SpotRow, DataError>;

    /// Apply a partial update; `None` if the spot doesn't exist
    async fn update_spot(&self, id: &str, update: &SpotUpdate)
    -> Result<Option<SpotRow>, DataError>;

    /// Hide a spot from search; false if missing or already inactive
    async fn deactivate_spot(&self, id: &str) -> Result<bool, DataError>;

    // ==================== Vehicle Operations ====================

    async fn list_vehicles(&self, user_id: &str) -> Result<Vec<VehicleRow>, DataError>;

    async fn get_vehicle(&self, id: &str) -> Result<Option<VehicleRow>, DataError>;

    /// Register a vehicle; duplicate plate for the same user is `Conflict`
    async fn create_vehicle(&self, vehicle: &NewVehicle) -> Result<VehicleRow, DataError>;

    async fn delete_vehicle(&self, id: &str, user_id: &str) -> Result<bool, DataError>;

    // ==================== Booking Operations ====================

    async fn list_bookings(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<BookingRow>, u64), DataError>;

    async fn get_booking(&self, id: &str) -> Result<Option<BookingRow>, DataError>;

    /// Create a pending booking; an overlapping active booking is `Conflict`
    async fn create_booking(&self, booking: &NewBooking) -> Result<BookingRow, DataError>;

    async fn cancel_booking(&self, id: &str) -> Result<CancelResult, DataError>;
}
