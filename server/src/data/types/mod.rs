//! Row types shared by the repository trait and its SQLite implementation

mod marketplace;

pub use marketplace::{
    BookingRow, BookingStatus, CancelResult, NewBooking, NewSpot, NewVehicle, SpotRow, SpotUpdate,
    VehicleRow,
};
