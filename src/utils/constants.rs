/// Sink table names
pub const UNIFIED_TABLE: &str = "weather_data";
pub const DAILY_TABLE: &str = "daily_temperature";

/// Directory names under the data root
pub const RAW_DIR: &str = "raw";
pub const PROCESSED_DIR: &str = "processed";
pub const DB_DIR: &str = "db";

/// Filename prefix for daily-summary artifacts
pub const DAILY_FILE_PREFIX: &str = "daily_temp";

/// Observation site code written into legacy export headers
pub const DEFAULT_SITE_CODE: &str = "60_127";

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
