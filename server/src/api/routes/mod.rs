//! API route handlers

pub mod bookings;
pub mod health;
pub mod spots;
pub mod vehicles;
