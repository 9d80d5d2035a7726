pub const APP_NAME: &str = "beandregs";

pub const DEFAULT_WIDTH: u32 = 300;
pub const DEFAULT_HEIGHT: u32 = 300;
pub const DEFAULT_OUTPUT_DIR: &str = "beandregs-output";
pub const DEFAULT_RESIZE_DIR: &str = "beandregs-output/resized";
pub const DEFAULT_LOG_FILE: &str = "beandregs-output/images.log";

/// Table in the config file that holds our keys.
pub const CONFIG_SECTION: &str = "beandregs";

/// Debug-level diagnostic log, written to the current directory.
pub const DIAGNOSTIC_LOG_FILE: &str = "beandregs.log";

pub const ORIGINAL_PREFIX: &str = "orig-";

pub const COMMENT_MARKER: char = '#';
pub const FIELD_SEPARATOR: char = '=';

pub const FETCH_TIMEOUT_SECS: u64 = 60;
pub const SPINNER_TICK_MILLIS: u64 = 100;
pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";

// Console message prefixes
pub const ITEM_PREFIX: &str = "[*]";
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const ERROR_PREFIX: &str = "❌";
pub const SUMMARY_PREFIX: &str = "📊";
