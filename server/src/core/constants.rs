// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "ParkSpot";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "parkspot";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".parkspot";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "parkspot.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "PARKSPOT_CONFIG";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "PARKSPOT_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "PARKSPOT_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "PARKSPOT_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "PARKSPOT_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5390;

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "PARKSPOT_DATA_DIR";

// =============================================================================
// Identity
// =============================================================================

/// Header carrying the user id set by the upstream gateway
pub const USER_ID_HEADER: &str = "x-user-id";

/// User id assumed for every request when auth is disabled
pub const DEFAULT_USER_ID: &str = "local";

/// Longest user id accepted from the gateway header
pub const MAX_USER_ID_LEN: usize = 128;

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "parkspot.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -64000 = 64MB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// SQLite WAL auto-checkpoint threshold (pages, ~4MB at 1000)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// WAL checkpoint interval in seconds (5 minutes)
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Search
// =============================================================================

/// Environment variable for the default spot search page size
pub const ENV_SEARCH_DEFAULT_PAGE_SIZE: &str = "PARKSPOT_SEARCH_PAGE_SIZE";

/// Environment variable for the largest spot search page size
pub const ENV_SEARCH_MAX_PAGE_SIZE: &str = "PARKSPOT_SEARCH_MAX_PAGE_SIZE";

/// Page size used when a search request gives none
pub const DEFAULT_SEARCH_PAGE_SIZE: u32 = 20;

/// Upper bound on the page size a search request may ask for
pub const MAX_SEARCH_PAGE_SIZE: u32 = 100;

/// Page size for owner, vehicle and booking listings
pub const DEFAULT_LIST_PAGE_SIZE: u32 = 20;

// =============================================================================
// Bookings
// =============================================================================

/// Longest booking accepted, in hours (30 days)
pub const MAX_BOOKING_HOURS: i64 = 30 * 24;

// =============================================================================
// Request Body Limits
// =============================================================================

/// Default body limit for API requests (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

// =============================================================================
// Shutdown
// =============================================================================

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_page_sizes_are_consistent() {
        assert!(DEFAULT_SEARCH_PAGE_SIZE >= 1);
        assert!(DEFAULT_SEARCH_PAGE_SIZE <= MAX_SEARCH_PAGE_SIZE);
        assert!(DEFAULT_LIST_PAGE_SIZE <= MAX_SEARCH_PAGE_SIZE);
    }

    #[test]
    fn test_env_vars_share_prefix() {
        for var in [
            ENV_CONFIG,
            ENV_DEBUG,
            ENV_HOST,
            ENV_PORT,
            ENV_LOG,
            ENV_DATA_DIR,
            ENV_SEARCH_DEFAULT_PAGE_SIZE,
            ENV_SEARCH_MAX_PAGE_SIZE,
        ] {
            assert!(var.starts_with("PARKSPOT_"), "{var}");
        }
    }
}
