//! Spot search query builder
//!
//! Turns `SearchCriteria` into a single SQL predicate over the `spots`
//! table (aliased), plus ordering and pagination. Every clause is ANDed;
//! a dimension with no input contributes no clause at all.

use super::criteria::SearchCriteria;
use super::geo::GeoRadius;
use crate::utils::sql::fts5_match_query;

/// Table alias used for `spots` in generated SQL
pub const SPOT_ALIAS: &str = "s";

/// Newest first; rowid breaks ties between spots created in the same second
pub const SPOT_ORDER_BY: &str = "s.created_at DESC, s.rowid DESC";

/// A bound SQL parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Real(f64),
    Integer(i64),
}

/// Collects SQL parameters during query building (maintains insertion order)
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SqlParams {
    pub values: Vec<SqlValue>,
}

impl SqlParams {
    fn text(&mut self, v: impl Into<String>) {
        self.values.push(SqlValue::Text(v.into()));
    }

    fn real(&mut self, v: f64) {
        self.values.push(SqlValue::Real(v));
    }

    fn integer(&mut self, v: i64) {
        self.values.push(SqlValue::Integer(v));
    }
}

/// Complete query description handed to the storage layer
#[derive(Debug, Clone, PartialEq)]
pub struct SpotQuery {
    /// WHERE clause body with `?` placeholders
    pub predicate: String,
    pub params: SqlParams,
    pub order_by: &'static str,
    pub limit: u32,
    pub offset: u64,
}

/// Build the composite predicate and pagination for a spot search
pub fn build_spot_query(criteria: &SearchCriteria) -> SpotQuery {
    let mut params = SqlParams::default();
    let mut clauses = vec![format!("{}.active = 1", SPOT_ALIAS)];

    if let Some(min) = criteria.price_min {
        params.real(min);
        clauses.push(format!("{}.price_per_hour >= ?", SPOT_ALIAS));
    }
    if let Some(max) = criteria.price_max {
        params.real(max);
        clauses.push(format!("{}.price_per_hour <= ?", SPOT_ALIAS));
    }

    if let Some(city) = &criteria.city {
        params.text(city);
        clauses.push(format!("{}.city = ? COLLATE NOCASE", SPOT_ALIAS));
    }
    if let Some(state) = &criteria.state {
        params.text(state);
        clauses.push(format!("{}.state = ? COLLATE NOCASE", SPOT_ALIAS));
    }

    if let Some(available) = criteria.available {
        params.integer(i64::from(available));
        clauses.push(format!("{}.available = ?", SPOT_ALIAS));
    }

    if let Some(sql) = build_amenities_filter(criteria.amenities.iter(), &mut params, SPOT_ALIAS) {
        clauses.push(sql);
    }

    if let Some(text) = &criteria.free_text
        && let Some(sql) = build_text_filter(text, &mut params, SPOT_ALIAS)
    {
        clauses.push(sql);
    }

    if let Some(geo) = &criteria.geo {
        clauses.push(build_geo_filter(geo, &mut params, SPOT_ALIAS));
    }

    SpotQuery {
        predicate: clauses.join(" AND "),
        params,
        order_by: SPOT_ORDER_BY,
        limit: criteria.page_size,
        offset: criteria.offset(),
    }
}

/// Amenity filter with "any of" semantics: a spot matches when at least one
/// of its amenities is in the requested set.
pub fn build_amenities_filter<'a>(
    amenities: impl ExactSizeIterator<Item = &'a String>,
    params: &mut SqlParams,
    alias: &str,
) -> Option<String> {
    if amenities.len() == 0 {
        return None;
    }

    let placeholders: Vec<&str> = amenities
        .map(|a| {
            params.text(a.as_str());
            "?"
        })
        .collect();

    Some(format!(
        "EXISTS (SELECT 1 FROM json_each({}.amenities) AS a WHERE a.value IN ({}))",
        alias,
        placeholders.join(", ")
    ))
}

/// Full-text filter delegated to the FTS5 index. Returns `None` when the
/// input has no searchable tokens.
pub fn build_text_filter(text: &str, params: &mut SqlParams, alias: &str) -> Option<String> {
    let expr = fts5_match_query(text)?;
    params.text(expr);
    Some(format!(
        "{}.rowid IN (SELECT rowid FROM spots_fts WHERE spots_fts MATCH ?)",
        alias
    ))
}

/// Great-circle radius filter (spherical law of cosines).
///
/// Compares the cosine of the central angle against `cos(radius / R)`
/// instead of taking `acos` in SQL; see `GeoRadius::min_angle_cos`. The
/// cosine uses the per-spot `sin_*`/`cos_*` columns, is clamped to
/// [-1, 1], and is forced to 1.0 when the spot sits exactly on the center.
pub fn build_geo_filter(geo: &GeoRadius, params: &mut SqlParams, alias: &str) -> String {
    let center = geo.center;
    let trig = center.trig();

    params.real(center.lat);
    params.real(center.lng);
    params.real(trig.sin_lat);
    params.real(trig.cos_lat);
    params.real(trig.cos_lng);
    params.real(trig.sin_lng);
    params.real(geo.min_angle_cos());

    format!(
        "(CASE WHEN {a}.lat = ? AND {a}.lng = ? THEN 1.0 ELSE \
         min(1.0, max(-1.0, \
         ? * {a}.sin_lat + ? * {a}.cos_lat * (? * {a}.cos_lng + ? * {a}.sin_lng))) END) >= ?",
        a = alias
    )
}
