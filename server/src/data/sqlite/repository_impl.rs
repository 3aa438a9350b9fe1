//! MarketplaceRepository trait implementation for SQLite

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::MarketplaceRepository;
use crate::data::types::{
    BookingRow, CancelResult, NewBooking, NewSpot, NewVehicle, SpotRow, SpotUpdate, VehicleRow,
};
use crate::domain::search::SpotQuery;

use super::SqliteService;
use super::repositories::{booking, spot, vehicle};

#[async_trait]
impl MarketplaceRepository for Arc<SqliteService> {
    // ==================== Spot Operations ====================

    async fn search_spots(&self, query: &SpotQuery) -> Result<(Vec<SpotRow>, u64), DataError> {
        spot::search_spots(self.pool(), query)
            .await
            .map_err(Into::into)
    }

    async fn get_spot(&self, id: &str) -> Result<Option<SpotRow>, DataError> {
        spot::get_spot(self.pool(), id).await.map_err(Into::into)
    }

    async fn list_spots_for_owner(
        &self,
        owner_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<SpotRow>, u64), DataError> {
        spot::list_for_owner(self.pool(), owner_id, page, limit)
            .await
            .map_err(Into::into)
    }

    async fn create_spot(&self, new_spot: &NewSpot) -> Result<SpotRow, DataError> {
        spot::create_spot(self.pool(), new_spot)
            .await
            .map_err(Into::into)
    }

    async fn update_spot(
        &self,
        id: &str,
        update: &SpotUpdate,
    ) -> Result<Option<SpotRow>, DataError> {
        spot::update_spot(self.pool(), id, update)
            .await
            .map_err(Into::into)
    }

    async fn deactivate_spot(&self, id: &str) -> Result<bool, DataError> {
        spot::deactivate_spot(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    // ==================== Vehicle Operations ====================

    async fn list_vehicles(&self, user_id: &str) -> Result<Vec<VehicleRow>, DataError> {
        vehicle::list_for_user(self.pool(), user_id)
            .await
            .map_err(Into::into)
    }

    async fn get_vehicle(&self, id: &str) -> Result<Option<VehicleRow>, DataError> {
        vehicle::get_vehicle(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn create_vehicle(&self, new_vehicle: &NewVehicle) -> Result<VehicleRow, DataError> {
        vehicle::create_vehicle(self.pool(), new_vehicle)
            .await
            .map_err(Into::into)
    }

    async fn delete_vehicle(&self, id: &str, user_id: &str) -> Result<bool, DataError> {
        vehicle::delete_vehicle(self.pool(), id, user_id)
            .await
            .map_err(Into::into)
    }

    // ==================== Booking Operations ====================

    async fn list_bookings(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<BookingRow>, u64), DataError> {
        booking::list_for_user(self.pool(), user_id, page, limit)
            .await
            .map_err(Into::into)
    }

    async fn get_booking(&self, id: &str) -> Result<Option<BookingRow>, DataError> {
        booking::get_booking(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn create_booking(&self, new_booking: &NewBooking) -> Result<BookingRow, DataError> {
        booking::create_booking(self.pool(), new_booking)
            .await
            .map_err(Into::into)
    }

    async fn cancel_booking(&self, id: &str) -> Result<CancelResult, DataError> {
        booking::cancel_booking(self.pool(), id)
            .await
            .map_err(Into::into)
    }
}
