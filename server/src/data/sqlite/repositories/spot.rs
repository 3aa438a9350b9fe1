//! Spot repository for SQLite operations

use std::collections::BTreeSet;

use sqlx::SqlitePool;
use sqlx::query::QueryAs;
use sqlx::sqlite::{Sqlite, SqliteArguments};

use crate::data::sqlite::SqliteError;
use crate::data::types::{NewSpot, SpotRow, SpotUpdate};
use crate::domain::search::geo::GeoPoint;
use crate::domain::search::query::{SpotQuery, SqlParams, SqlValue};

/// Spot columns, qualified with the `s` alias used by the search builder
const SPOT_COLUMNS: &str = "s.id, s.owner_id, s.title, s.description, s.address, s.city, s.state, \
     s.price_per_hour, s.lat, s.lng, s.amenities, s.available, s.active, s.created_at, s.updated_at";

type SpotTuple = (
    String,
    String,
    String,
    Option<String>,
    String,
    String,
    String,
    f64,
    f64,
    f64,
    String,
    bool,
    bool,
    i64,
    i64,
);

fn spot_from_tuple(row: SpotTuple) -> SpotRow {
    let (
        id,
        owner_id,
        title,
        description,
        address,
        city,
        state,
        price_per_hour,
        lat,
        lng,
        amenities,
        available,
        active,
        created_at,
        updated_at,
    ) = row;

    let amenities = serde_json::from_str::<BTreeSet<String>>(&amenities).unwrap_or_else(|e| {
        tracing::warn!(spot_id = %id, error = %e, "Invalid amenities JSON, treating as empty");
        BTreeSet::new()
    });

    SpotRow {
        id,
        owner_id,
        title,
        description,
        address,
        city,
        state,
        price_per_hour,
        lat,
        lng,
        amenities,
        available,
        active,
        created_at,
        updated_at,
    }
}

fn amenities_json(amenities: &BTreeSet<String>) -> String {
    serde_json::to_string(amenities).unwrap_or_else(|_| "[]".to_string())
}

/// Bind builder parameters in order
fn bind_params<'q, O>(
    mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    params: &'q SqlParams,
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for value in &params.values {
        query = match value {
            SqlValue::Text(s) => query.bind(s.as_str()),
            SqlValue::Real(v) => query.bind(*v),
            SqlValue::Integer(v) => query.bind(*v),
        };
    }
    query
}

/// Execute a built search; returns the page of spots and the total match count
pub async fn search_spots(
    pool: &SqlitePool,
    query: &SpotQuery,
) -> Result<(Vec<SpotRow>, u64), SqliteError> {
    let count_sql = format!("SELECT COUNT(*) FROM spots s WHERE {}", query.predicate);
    let (total,): (i64,) = bind_params(sqlx::query_as(&count_sql), &query.params)
        .fetch_one(pool)
        .await?;

    let select_sql = format!(
        "SELECT {} FROM spots s WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
        SPOT_COLUMNS, query.predicate, query.order_by
    );
    let rows: Vec<SpotTuple> = bind_params(sqlx::query_as(&select_sql), &query.params)
        .bind(i64::from(query.limit))
        .bind(super::sql_offset(query.offset))
        .fetch_all(pool)
        .await?;

    tracing::trace!(total, returned = rows.len(), "Spot search executed");

    Ok((
        rows.into_iter().map(spot_from_tuple).collect(),
        super::row_count(total),
    ))
}

/// Get a spot by ID (active or not)
pub async fn get_spot(pool: &SqlitePool, id: &str) -> Result<Option<SpotRow>, SqliteError> {
    let sql = format!("SELECT {} FROM spots s WHERE s.id = ?", SPOT_COLUMNS);
    let row: Option<SpotTuple> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(spot_from_tuple))
}

/// List an owner's spots (including deactivated), newest first
pub async fn list_for_owner(
    pool: &SqlitePool,
    owner_id: &str,
    page: u32,
    limit: u32,
) -> Result<(Vec<SpotRow>, u64), SqliteError> {
    let offset = super::page_offset(page, limit);

    let sql = format!(
        "SELECT {} FROM spots s WHERE s.owner_id = ? ORDER BY s.created_at DESC, s.rowid DESC LIMIT ? OFFSET ?",
        SPOT_COLUMNS
    );
    let rows: Vec<SpotTuple> = sqlx::query_as(&sql)
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM spots WHERE owner_id = ?")
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

    Ok((
        rows.into_iter().map(spot_from_tuple).collect(),
        super::row_count(count.0),
    ))
}

/// Create a new spot with a generated CUID2 ID
pub async fn create_spot(pool: &SqlitePool, spot: &NewSpot) -> Result<SpotRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    let row = SpotRow {
        id,
        owner_id: spot.owner_id.clone(),
        title: spot.title.clone(),
        description: spot.description.clone(),
        address: spot.address.clone(),
        city: spot.city.clone(),
        state: spot.state.clone(),
        price_per_hour: spot.price_per_hour,
        lat: spot.lat,
        lng: spot.lng,
        amenities: spot.amenities.clone(),
        available: spot.available,
        active: true,
        created_at: now,
        updated_at: now,
    };
    let trig = GeoPoint {
        lat: row.lat,
        lng: row.lng,
    }
    .trig();

    sqlx::query(
        r#"
        INSERT INTO spots (
            id, owner_id, title, description, address, city, state, price_per_hour,
            lat, lng, sin_lat, cos_lat, sin_lng, cos_lng, amenities, available, active,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
        "#,
    )
    .bind(&row.id)
    .bind(&row.owner_id)
    .bind(&row.title)
    .bind(&row.description)
    .bind(&row.address)
    .bind(&row.city)
    .bind(&row.state)
    .bind(row.price_per_hour)
    .bind(row.lat)
    .bind(row.lng)
    .bind(trig.sin_lat)
    .bind(trig.cos_lat)
    .bind(trig.sin_lng)
    .bind(trig.cos_lng)
    .bind(amenities_json(&row.amenities))
    .bind(row.available)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(row)
}

/// Apply a partial update. Returns `None` if the spot doesn't exist.
pub async fn update_spot(
    pool: &SqlitePool,
    id: &str,
    update: &SpotUpdate,
) -> Result<Option<SpotRow>, SqliteError> {
    let mut tx = pool.begin().await?;

    let sql = format!("SELECT {} FROM spots s WHERE s.id = ?", SPOT_COLUMNS);
    let current: Option<SpotTuple> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

    let Some(current) = current else {
        return Ok(None);
    };
    let mut row = spot_from_tuple(current);

    if let Some(v) = &update.title {
        row.title = v.clone();
    }
    if let Some(v) = &update.description {
        row.description = Some(v.clone());
    }
    if let Some(v) = &update.address {
        row.address = v.clone();
    }
    if let Some(v) = &update.city {
        row.city = v.clone();
    }
    if let Some(v) = &update.state {
        row.state = v.clone();
    }
    if let Some(v) = update.price_per_hour {
        row.price_per_hour = v;
    }
    if let Some(v) = update.lat {
        row.lat = v;
    }
    if let Some(v) = update.lng {
        row.lng = v;
    }
    if let Some(v) = &update.amenities {
        row.amenities = v.clone();
    }
    if let Some(v) = update.available {
        row.available = v;
    }
    row.updated_at = chrono::Utc::now().timestamp();

    let trig = GeoPoint {
        lat: row.lat,
        lng: row.lng,
    }
    .trig();

    sqlx::query(
        r#"
        UPDATE spots SET
            title = ?, description = ?, address = ?, city = ?, state = ?,
            price_per_hour = ?, lat = ?, lng = ?,
            sin_lat = ?, cos_lat = ?, sin_lng = ?, cos_lng = ?,
            amenities = ?, available = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&row.title)
    .bind(&row.description)
    .bind(&row.address)
    .bind(&row.city)
    .bind(&row.state)
    .bind(row.price_per_hour)
    .bind(row.lat)
    .bind(row.lng)
    .bind(trig.sin_lat)
    .bind(trig.cos_lat)
    .bind(trig.sin_lng)
    .bind(trig.cos_lng)
    .bind(amenities_json(&row.amenities))
    .bind(row.available)
    .bind(row.updated_at)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Some(row))
}

/// Soft-delete: hide the spot from search. Returns true if a row changed.
pub async fn deactivate_spot(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result =
        sqlx::query("UPDATE spots SET active = 0, updated_at = ? WHERE id = ? AND active = 1")
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::criteria::{SearchCriteria, parse_amenity_list};
    use crate::domain::search::geo::GeoRadius;
    use crate::domain::search::query::build_spot_query;

    async fn setup_test_pool() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(crate::data::sqlite::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    fn new_spot(title: &str, city: &str, price: f64, amenities: &str) -> NewSpot {
        NewSpot {
            owner_id: "host-1".to_string(),
            title: title.to_string(),
            description: None,
            address: "1 Main St".to_string(),
            city: city.to_string(),
            state: "TX".to_string(),
            price_per_hour: price,
            lat: 30.2672,
            lng: -97.7431,
            amenities: parse_amenity_list(Some(amenities)),
            available: true,
        }
    }

    async fn search(pool: &SqlitePool, criteria: SearchCriteria) -> (Vec<SpotRow>, u64) {
        search_spots(pool, &build_spot_query(&criteria)).await.unwrap()
    }

    fn titles(rows: &[SpotRow]) -> Vec<&str> {
        rows.iter().map(|r| r.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_and_get_spot() {
        let pool = setup_test_pool().await;
        let created = create_spot(&pool, &new_spot("Garage", "Austin", 5.0, "covered"))
            .await
            .unwrap();

        let fetched = get_spot(&pool, &created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(fetched.active);
        assert!(fetched.amenities.contains("covered"));
    }

    #[tokio::test]
    async fn test_get_missing_spot() {
        let pool = setup_test_pool().await;
        assert!(get_spot(&pool, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_price_bounds_are_inclusive() {
        let pool = setup_test_pool().await;
        for (title, price) in [("a", 5.0), ("b", 10.0), ("c", 20.0), ("d", 21.0)] {
            create_spot(&pool, &new_spot(title, "Austin", price, ""))
                .await
                .unwrap();
        }

        let (rows, total) = search(
            &pool,
            SearchCriteria {
                price_min: Some(10.0),
                price_max: Some(20.0),
                ..Default::default()
            },
        )
        .await;
        assert_eq!(total, 2);
        let mut got = titles(&rows);
        got.sort();
        assert_eq!(got, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_search_amenities_any_of() {
        let pool = setup_test_pool().await;
        create_spot(&pool, &new_spot("covered-only", "Austin", 5.0, "covered"))
            .await
            .unwrap();
        create_spot(&pool, &new_spot("security-only", "Austin", 5.0, "security"))
            .await
            .unwrap();
        create_spot(&pool, &new_spot("plain", "Austin", 5.0, "ev_charging"))
            .await
            .unwrap();

        let (rows, total) = search(
            &pool,
            SearchCriteria {
                amenities: parse_amenity_list(Some("covered,security")),
                ..Default::default()
            },
        )
        .await;
        assert_eq!(total, 2);
        assert!(!titles(&rows).contains(&"plain"));
    }

    #[tokio::test]
    async fn test_search_free_text_uses_fts_index() {
        let pool = setup_test_pool().await;
        create_spot(&pool, &new_spot("Downtown garage", "Austin", 5.0, ""))
            .await
            .unwrap();
        create_spot(&pool, &new_spot("Driveway", "Dallas", 5.0, ""))
            .await
            .unwrap();

        let (rows, _) = search(
            &pool,
            SearchCriteria {
                free_text: Some("GARAGE".into()),
                ..Default::default()
            },
        )
        .await;
        assert_eq!(titles(&rows), vec!["Downtown garage"]);

        let (rows, _) = search(
            &pool,
            SearchCriteria {
                free_text: Some("dallas".into()),
                ..Default::default()
            },
        )
        .await;
        assert_eq!(titles(&rows), vec!["Driveway"]);
    }

    #[tokio::test]
    async fn test_fts_index_follows_updates() {
        let pool = setup_test_pool().await;
        let spot = create_spot(&pool, &new_spot("Driveway", "Austin", 5.0, ""))
            .await
            .unwrap();
        update_spot(
            &pool,
            &spot.id,
            &SpotUpdate {
                title: Some("Carport".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let text = |t: &str| SearchCriteria {
            free_text: Some(t.into()),
            ..Default::default()
        };
        assert_eq!(search(&pool, text("driveway")).await.1, 0);
        assert_eq!(search(&pool, text("carport")).await.1, 1);
    }

    #[tokio::test]
    async fn test_search_city_is_case_insensitive() {
        let pool = setup_test_pool().await;
        create_spot(&pool, &new_spot("a", "Austin", 5.0, ""))
            .await
            .unwrap();
        create_spot(&pool, &new_spot("b", "Houston", 5.0, ""))
            .await
            .unwrap();

        let (rows, total) = search(
            &pool,
            SearchCriteria {
                city: Some("austin".into()),
                ..Default::default()
            },
        )
        .await;
        assert_eq!(total, 1);
        assert_eq!(titles(&rows), vec!["a"]);
    }

    #[tokio::test]
    async fn test_search_geo_radius() {
        let pool = setup_test_pool().await;
        let mut at_center = new_spot("center", "Austin", 5.0, "");
        at_center.lat = 30.2672;
        at_center.lng = -97.7431;
        let mut nearby = new_spot("nearby", "Austin", 5.0, "");
        nearby.lat = 30.2850;
        nearby.lng = -97.7335;
        let mut far = new_spot("far", "Dallas", 5.0, "");
        far.lat = 32.7767;
        far.lng = -96.7970;
        for s in [&at_center, &nearby, &far] {
            create_spot(&pool, s).await.unwrap();
        }

        let center = GeoPoint::new(30.2672, -97.7431).unwrap();
        let (rows, total) = search(
            &pool,
            SearchCriteria {
                geo: GeoRadius::new(center, 5.0),
                ..Default::default()
            },
        )
        .await;
        assert_eq!(total, 2);
        let mut got = titles(&rows);
        got.sort();
        assert_eq!(got, vec!["center", "nearby"]);

        // A tiny radius still finds the spot sitting exactly on the center
        let (rows, _) = search(
            &pool,
            SearchCriteria {
                geo: GeoRadius::new(center, 0.0001),
                ..Default::default()
            },
        )
        .await;
        assert_eq!(titles(&rows), vec!["center"]);
    }

    #[tokio::test]
    async fn test_search_excludes_deactivated() {
        let pool = setup_test_pool().await;
        let spot = create_spot(&pool, &new_spot("gone", "Austin", 5.0, ""))
            .await
            .unwrap();
        assert!(deactivate_spot(&pool, &spot.id).await.unwrap());
        assert!(!deactivate_spot(&pool, &spot.id).await.unwrap());

        let (_, total) = search(&pool, SearchCriteria::default()).await;
        assert_eq!(total, 0);

        // Still visible to its owner
        let (owned, owned_total) = list_for_owner(&pool, "host-1", 1, 10).await.unwrap();
        assert_eq!(owned_total, 1);
        assert!(!owned[0].active);
    }

    #[tokio::test]
    async fn test_search_pagination() {
        let pool = setup_test_pool().await;
        for i in 0..25 {
            create_spot(&pool, &new_spot(&format!("spot-{i:02}"), "Austin", 5.0, ""))
                .await
                .unwrap();
        }

        let page = |page| SearchCriteria {
            page,
            page_size: 10,
            ..Default::default()
        };

        let (first, total) = search(&pool, page(1)).await;
        assert_eq!(total, 25);
        assert_eq!(first.len(), 10);
        // Same-second inserts fall back to insertion order, newest first
        assert_eq!(first[0].title, "spot-24");

        let (last, _) = search(&pool, page(3)).await;
        assert_eq!(last.len(), 5);
        assert_eq!(last[4].title, "spot-00");
    }

    #[tokio::test]
    async fn test_update_spot_recomputes_location() {
        let pool = setup_test_pool().await;
        let spot = create_spot(&pool, &new_spot("moving", "Austin", 5.0, ""))
            .await
            .unwrap();

        let updated = update_spot(
            &pool,
            &spot.id,
            &SpotUpdate {
                lat: Some(32.7767),
                lng: Some(-96.7970),
                price_per_hour: Some(7.5),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.price_per_hour, 7.5);
        assert_eq!(updated.title, "moving");

        let dallas = GeoPoint::new(32.7767, -96.7970).unwrap();
        let (rows, _) = search(
            &pool,
            SearchCriteria {
                geo: GeoRadius::new(dallas, 1.0),
                ..Default::default()
            },
        )
        .await;
        assert_eq!(titles(&rows), vec!["moving"]);
    }

    #[tokio::test]
    async fn test_update_missing_spot() {
        let pool = setup_test_pool().await;
        let result = update_spot(&pool, "missing", &SpotUpdate::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
