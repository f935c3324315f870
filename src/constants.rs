//! Constants for the admin service and the local fallback store.
//!
//! Contains the default base URL, environment variable names, storage keys,
//! pagination defaults and the artificial latencies of the local store.
//! These are used internally by [`AdminClient`](crate::client::AdminClient),
//! [`LocalStore`](crate::store::LocalStore) and the screens, but are also
//! exported for advanced usage.

// ---------------------------------------------------------------------------
// Base URL & environment
// ---------------------------------------------------------------------------

/// Base URL used when no override is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Environment variable overriding the API base URL.
pub const ENV_API_BASE_URL: &str = "MF_ADMIN_API_BASE_URL";

/// Environment variable naming the local storage directory.
pub const ENV_DATA_DIR: &str = "MF_ADMIN_DATA_DIR";

/// Environment variable scaling the local store's artificial latency.
///
/// Holds the list latency in milliseconds; create and clear are derived from it.
pub const ENV_LATENCY_MS: &str = "MF_ADMIN_LATENCY_MS";

/// Directory used for the file-backed store when none is configured.
pub const DEFAULT_DATA_DIR: &str = ".mf-admin";

// ---------------------------------------------------------------------------
// Local storage
// ---------------------------------------------------------------------------

/// Storage key names of the two persisted collections.
pub mod storage_keys {
    /// JSON array of `MutualFund`.
    pub const FUNDS: &str = "mf_admin_funds";
    /// JSON array of `Scheme`.
    pub const SCHEMES: &str = "mf_admin_schemes";
}

/// Artificial latencies applied by the local store, in milliseconds.
pub mod latency {
    /// List and delete operations.
    pub const LIST_MS: u64 = 300;
    /// Create operations.
    pub const CREATE_MS: u64 = 400;
    /// Clearing every collection.
    pub const CLEAR_MS: u64 = 500;
}

/// Fund name shown for a scheme whose `fundId` matches no fund.
pub const UNKNOWN_FUND: &str = "Unknown Fund";

// ---------------------------------------------------------------------------
// Pagination & table
// ---------------------------------------------------------------------------

/// Page size used by the funds and schemes screens.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page sizes offered by the migration screen.
pub const MIGRATION_PAGE_SIZES: [u32; 3] = [5, 10, 20];

/// Number of placeholder rows a loading table renders.
pub const SKELETON_ROWS: usize = 5;

/// Message rendered by an empty table.
pub const EMPTY_TABLE_MESSAGE: &str = "No data records found.";

/// Placeholder for a missing value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Funds scanned when the console resolves a fund by name.
pub const FUND_LOOKUP_LIMIT: u32 = 100;
