//! SQLite repositories
//!
//! Types (SpotRow, BookingRow, etc.) should be imported from `crate::data::types`.

pub mod booking;
pub mod spot;
pub mod vehicle;

pub use booking::{cancel_booking, create_booking, get_booking, list_for_user as list_bookings};
pub use spot::{
    create_spot, deactivate_spot, get_spot, list_for_owner as list_spots_for_owner, search_spots,
    update_spot,
};
pub use vehicle::{
    create_vehicle, delete_vehicle, get_vehicle, list_for_user as list_vehicles,
};

/// Offset for a `LIMIT ? OFFSET ?` bind; SQLite integers are signed
fn sql_offset(offset: u64) -> i64 {
    i64::try_from(offset).unwrap_or(i64::MAX)
}

/// `COUNT(*)` result as an unsigned total
fn row_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

/// Offset of `page` (1-based) at `limit` rows per page
fn page_offset(page: u32, limit: u32) -> i64 {
    sql_offset(u64::from(page.saturating_sub(1)) * u64::from(limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(0, 20), 0);
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(3, 20), 40);
        assert_eq!(page_offset(u32::MAX, u32::MAX), i64::MAX);
    }

    #[test]
    fn test_sql_offset_saturates() {
        assert_eq!(sql_offset(0), 0);
        assert_eq!(sql_offset(i64::MAX as u64), i64::MAX);
        assert_eq!(sql_offset(u64::MAX), i64::MAX);
    }

    #[test]
    fn test_row_count_never_wraps() {
        assert_eq!(row_count(7), 7);
        assert_eq!(row_count(-1), 0);
    }
}
