//! SQLite schema definitions
//!
//! Version 1 is the complete initial schema; later versions are applied as
//! incremental migrations (see `migrations.rs`).

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- 1. Spots
-- =============================================================================
CREATE TABLE IF NOT EXISTS spots (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    title TEXT NOT NULL CHECK(length(title) >= 1 AND length(title) <= 200),
    description TEXT,
    address TEXT NOT NULL,
    city TEXT NOT NULL,
    state TEXT NOT NULL,
    price_per_hour REAL NOT NULL CHECK(price_per_hour >= 0),
    lat REAL NOT NULL CHECK(lat >= -90 AND lat <= 90),
    lng REAL NOT NULL CHECK(lng >= -180 AND lng <= 180),
    -- sin/cos of lat and lng in radians, written with lat/lng (radius filter)
    sin_lat REAL NOT NULL,
    cos_lat REAL NOT NULL,
    sin_lng REAL NOT NULL,
    cos_lng REAL NOT NULL,
    amenities TEXT NOT NULL DEFAULT '[]' CHECK(json_valid(amenities)),
    available INTEGER NOT NULL DEFAULT 1 CHECK(available IN (0, 1)),
    active INTEGER NOT NULL DEFAULT 1 CHECK(active IN (0, 1)),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_spots_owner ON spots(owner_id);
CREATE INDEX IF NOT EXISTS idx_spots_active_created ON spots(active, created_at DESC);

-- Full-text index over searchable spot fields (external content, kept in
-- sync by the triggers below)
CREATE VIRTUAL TABLE IF NOT EXISTS spots_fts USING fts5(
    title, description, address, city,
    content='spots', content_rowid='rowid'
);

CREATE TRIGGER IF NOT EXISTS spots_fts_insert AFTER INSERT ON spots BEGIN
    INSERT INTO spots_fts(rowid, title, description, address, city)
    VALUES (new.rowid, new.title, new.description, new.address, new.city);
END;

CREATE TRIGGER IF NOT EXISTS spots_fts_delete AFTER DELETE ON spots BEGIN
    INSERT INTO spots_fts(spots_fts, rowid, title, description, address, city)
    VALUES ('delete', old.rowid, old.title, old.description, old.address, old.city);
END;

CREATE TRIGGER IF NOT EXISTS spots_fts_update AFTER UPDATE ON spots BEGIN
    INSERT INTO spots_fts(spots_fts, rowid, title, description, address, city)
    VALUES ('delete', old.rowid, old.title, old.description, old.address, old.city);
    INSERT INTO spots_fts(rowid, title, description, address, city)
    VALUES (new.rowid, new.title, new.description, new.address, new.city);
END;

-- =============================================================================
-- 2. Vehicles
-- =============================================================================
CREATE TABLE IF NOT EXISTS vehicles (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    make TEXT NOT NULL,
    model TEXT NOT NULL,
    license_plate TEXT NOT NULL CHECK(length(license_plate) >= 1),
    color TEXT,
    created_at INTEGER NOT NULL,
    UNIQUE(user_id, license_plate)
);

-- =============================================================================
-- 3. Bookings (references spots + vehicles)
-- =============================================================================
CREATE TABLE IF NOT EXISTS bookings (
    id TEXT PRIMARY KEY,
    spot_id TEXT NOT NULL REFERENCES spots(id),
    user_id TEXT NOT NULL,
    vehicle_id TEXT REFERENCES vehicles(id) ON DELETE SET NULL,
    start_time INTEGER NOT NULL,
    end_time INTEGER NOT NULL CHECK(end_time > start_time),
    total_price REAL NOT NULL CHECK(total_price >= 0),
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK(status IN ('pending', 'confirmed', 'cancelled')),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_bookings_user ON bookings(user_id, start_time DESC);
CREATE INDEX IF NOT EXISTS idx_bookings_spot_time ON bookings(spot_id, start_time, end_time);
"#;

/// Version 2: case-insensitive location indexes for city/state filters
pub const MIGRATION_V2: &str = r#"
CREATE INDEX IF NOT EXISTS idx_spots_city ON spots(city COLLATE NOCASE);
CREATE INDEX IF NOT EXISTS idx_spots_state ON spots(state COLLATE NOCASE)
"#;
