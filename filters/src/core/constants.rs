// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "fleetdesk";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".fleetdesk";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "fleetdesk.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "FLEETDESK_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "FLEETDESK_LOG";

// =============================================================================
// Saved Views
// =============================================================================

/// Environment variable to override the saved views directory
pub const ENV_VIEWS_DIR: &str = "FLEETDESK_VIEWS_DIR";

/// Saved views directory name (under the dotfile folder)
pub const VIEWS_DIR_NAME: &str = "views";
