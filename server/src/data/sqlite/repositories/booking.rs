//! Booking repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{BookingRow, BookingStatus, CancelResult, NewBooking};

type BookingTuple = (
    String,
    String,
    String,
    Option<String>,
    i64,
    i64,
    f64,
    String,
    i64,
    i64,
);

const BOOKING_COLUMNS: &str = "id, spot_id, user_id, vehicle_id, start_time, end_time, total_price, status, created_at, updated_at";

fn booking_from_tuple(row: BookingTuple) -> BookingRow {
    let (
        id,
        spot_id,
        user_id,
        vehicle_id,
        start_time,
        end_time,
        total_price,
        status,
        created_at,
        updated_at,
    ) = row;

    BookingRow {
        id,
        spot_id,
        user_id,
        vehicle_id,
        start_time,
        end_time,
        total_price,
        // CHECK constraint keeps this in range
        status: BookingStatus::parse(&status).unwrap_or_default(),
        created_at,
        updated_at,
    }
}

/// List a user's bookings, most recent start first
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: &str,
    page: u32,
    limit: u32,
) -> Result<(Vec<BookingRow>, u64), SqliteError> {
    let offset = super::page_offset(page, limit);

    let sql = format!(
        "SELECT {} FROM bookings WHERE user_id = ? ORDER BY start_time DESC, rowid DESC LIMIT ? OFFSET ?",
        BOOKING_COLUMNS
    );
    let rows: Vec<BookingTuple> = sqlx::query_as(&sql)
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok((
        rows.into_iter().map(booking_from_tuple).collect(),
        super::row_count(count.0),
    ))
}

pub async fn get_booking(pool: &SqlitePool, id: &str) -> Result<Option<BookingRow>, SqliteError> {
    let sql = format!("SELECT {} FROM bookings WHERE id = ?", BOOKING_COLUMNS);
    let row: Option<BookingTuple> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(booking_from_tuple))
}

/// Create a pending booking.
///
/// Fails with `Conflict` if a non-cancelled booking on the same spot
/// overlaps `[start_time, end_time)`. The overlap check and insert are one
/// statement, so concurrent requests cannot both claim the slot.
pub async fn create_booking(
    pool: &SqlitePool,
    booking: &NewBooking,
) -> Result<BookingRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        r#"
        INSERT INTO bookings (
            id, spot_id, user_id, vehicle_id, start_time, end_time, total_price,
            status, created_at, updated_at
        )
        SELECT ?, ?, ?, ?, ?, ?, ?, 'pending', ?, ?
        WHERE NOT EXISTS (
            SELECT 1 FROM bookings
            WHERE spot_id = ? AND status != 'cancelled'
              AND start_time < ? AND end_time > ?
        )
        "#,
    )
    .bind(&id)
    .bind(&booking.spot_id)
    .bind(&booking.user_id)
    .bind(&booking.vehicle_id)
    .bind(booking.start_time)
    .bind(booking.end_time)
    .bind(booking.total_price)
    .bind(now)
    .bind(now)
    .bind(&booking.spot_id)
    .bind(booking.end_time)
    .bind(booking.start_time)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(SqliteError::Conflict(
            "Spot is already booked for an overlapping time".to_string(),
        ));
    }

    Ok(BookingRow {
        id,
        spot_id: booking.spot_id.clone(),
        user_id: booking.user_id.clone(),
        vehicle_id: booking.vehicle_id.clone(),
        start_time: booking.start_time,
        end_time: booking.end_time,
        total_price: booking.total_price,
        status: BookingStatus::Pending,
        created_at: now,
        updated_at: now,
    })
}

/// Cancel a booking, freeing its slot
pub async fn cancel_booking(pool: &SqlitePool, id: &str) -> Result<CancelResult, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "UPDATE bookings SET status = 'cancelled', updated_at = ? WHERE id = ? AND status != 'cancelled'",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        return Ok(get_booking(pool, id)
            .await?
            .map_or(CancelResult::NotFound, CancelResult::Cancelled));
    }

    Ok(match get_booking(pool, id).await? {
        Some(_) => CancelResult::AlreadyCancelled,
        None => CancelResult::NotFound,
    })
}
