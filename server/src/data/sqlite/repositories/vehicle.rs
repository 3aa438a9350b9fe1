//! Vehicle repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{NewVehicle, VehicleRow};

type VehicleTuple = (String, String, String, String, String, Option<String>, i64);

fn vehicle_from_tuple(
    (id, user_id, make, model, license_plate, color, created_at): VehicleTuple,
) -> VehicleRow {
    VehicleRow {
        id,
        user_id,
        make,
        model,
        license_plate,
        color,
        created_at,
    }
}

/// List a user's vehicles, newest first
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<VehicleRow>, SqliteError> {
    let rows: Vec<VehicleTuple> = sqlx::query_as(
        r#"
        SELECT id, user_id, make, model, license_plate, color, created_at
        FROM vehicles
        WHERE user_id = ?
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(vehicle_from_tuple).collect())
}

pub async fn get_vehicle(pool: &SqlitePool, id: &str) -> Result<Option<VehicleRow>, SqliteError> {
    let row: Option<VehicleTuple> = sqlx::query_as(
        "SELECT id, user_id, make, model, license_plate, color, created_at FROM vehicles WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(vehicle_from_tuple))
}

/// Register a vehicle. A plate already registered by the same user is a conflict.
pub async fn create_vehicle(
    pool: &SqlitePool,
    vehicle: &NewVehicle,
) -> Result<VehicleRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO vehicles (id, user_id, make, model, license_plate, color, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&vehicle.user_id)
    .bind(&vehicle.make)
    .bind(&vehicle.model)
    .bind(&vehicle.license_plate)
    .bind(&vehicle.color)
    .bind(now)
    .execute(pool)
    .await
    .map_err(SqliteError::from);

    match result {
        Ok(_) => {}
        Err(e) if e.is_unique_violation() => {
            return Err(SqliteError::Conflict(format!(
                "Vehicle with plate {} is already registered",
                vehicle.license_plate
            )));
        }
        Err(e) => return Err(e),
    }

    Ok(VehicleRow {
        id,
        user_id: vehicle.user_id.clone(),
        make: vehicle.make.clone(),
        model: vehicle.model.clone(),
        license_plate: vehicle.license_plate.clone(),
        color: vehicle.color.clone(),
        created_at: now,
    })
}

/// Delete a user's vehicle. Returns true if deleted.
pub async fn delete_vehicle(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM vehicles WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test_pool() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(crate::data::sqlite::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    fn new_vehicle(user_id: &str, plate: &str) -> NewVehicle {
        NewVehicle {
            user_id: user_id.to_string(),
            make: "Toyota".to_string(),
            model: "Corolla".to_string(),
            license_plate: plate.to_string(),
            color: Some("blue".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_vehicles() {
        let pool = setup_test_pool().await;
        let created = create_vehicle(&pool, &new_vehicle("u1", "ABC123"))
            .await
            .unwrap();
        create_vehicle(&pool, &new_vehicle("u2", "XYZ999"))
            .await
            .unwrap();

        let listed = list_for_user(&pool, "u1").await.unwrap();
        assert_eq!(listed, vec![created.clone()]);

        let fetched = get_vehicle(&pool, &created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_duplicate_plate_per_user_conflicts() {
        let pool = setup_test_pool().await;
        create_vehicle(&pool, &new_vehicle("u1", "ABC123"))
            .await
            .unwrap();

        let result = create_vehicle(&pool, &new_vehicle("u1", "ABC123")).await;
        assert!(matches!(result, Err(SqliteError::Conflict(_))));

        // Different user may register the same plate
        assert!(
            create_vehicle(&pool, &new_vehicle("u2", "ABC123"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_delete_vehicle_scoped_to_owner() {
        let pool = setup_test_pool().await;
        let v = create_vehicle(&pool, &new_vehicle("u1", "ABC123"))
            .await
            .unwrap();

        assert!(!delete_vehicle(&pool, &v.id, "u2").await.unwrap());
        assert!(delete_vehicle(&pool, &v.id, "u1").await.unwrap());
        assert!(get_vehicle(&pool, &v.id).await.unwrap().is_none());
    }
}
