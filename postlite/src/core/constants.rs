// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "postlite";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".postlite";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "postlite.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "POSTLITE_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "POSTLITE_LOG";

// =============================================================================
// Environment Variables - Database
// =============================================================================

/// Environment variable for the database file path
pub const ENV_DB_PATH: &str = "POSTLITE_DB_PATH";

/// Environment variable for the schema file applied at startup
pub const ENV_SCHEMA: &str = "POSTLITE_SCHEMA";

/// Environment variable to use a private in-memory database
pub const ENV_IN_MEMORY: &str = "POSTLITE_IN_MEMORY";

/// Environment variable for the connection pool size
pub const ENV_MAX_CONNECTIONS: &str = "POSTLITE_MAX_CONNECTIONS";

// =============================================================================
// SQLite Defaults
// =============================================================================

/// Default database file, relative to the working directory
pub const DEFAULT_DB_PATH: &str = "data/sqlite/postlite.db";

/// Default schema file, relative to the working directory
pub const DEFAULT_SCHEMA_PATH: &str = "data/sqlite/create_db.sql";

/// Default connection pool size (file mode)
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default busy timeout in seconds
pub const DEFAULT_BUSY_TIMEOUT_SECS: u64 = 30;
