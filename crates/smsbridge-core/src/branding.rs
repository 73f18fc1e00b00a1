//! Centralized branding constants
//!
//! Application identity used for defaults across the workspace.

/// Human-readable product name
pub const DISPLAY_NAME: &str = "FinLog";

/// Application id; relay deliveries are scoped to this id
pub const APP_ID: &str = "com.finlog.finlog";

/// Bridge channel name shared with the consumer surface
pub const CHANNEL: &str = "com.finlog.finlog/sms";

/// Prefix for rotated log files (e.g. `smsbridge.2026-01-22.log`)
pub const LOG_PREFIX: &str = "smsbridge";

/// Default database file name
pub const DATABASE_FILE: &str = "smsbridge.db";

/// Platform action carrying inbound SMS deliveries
pub const SMS_RECEIVED_ACTION: &str = "android.provider.Telephony.SMS_RECEIVED";

/// Get the default data directory for the current platform
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(APP_ID)
}
