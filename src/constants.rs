// src/constants.rs

pub const BASE_URL_ENV: &str = "INTRUCT_API_BASE_URL";
pub const CONFIG_DIR_NAME: &str = ".intruct";
pub const PROGRESS_FILE_NAME: &str = "lesson_completion.json";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const USER_AGENT: &str = concat!("intruct-client/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Sentinel body the backend returns on any endpoint while the user's
/// registration is unfinished: `{"error": "registration was not completed"}`.
pub const REGISTRATION_NOT_COMPLETED_ERROR: &str = "registration was not completed";

/// Translates the short content-language codes used by the language selector
/// into the language-name strings the course-generation backend expects.
/// Unknown codes are passed through unchanged by the caller.
pub fn backend_language_name(code: &str) -> Option<&'static str> {
    match code {
        "en" => Some("English"),
        "sr" => Some("Srpski"),
        "zh" => Some("中文"),
        "hi" => Some("हिन्दी"),
        "ru" => Some("Русский"),
        "de" => Some("Deutsch"),
        "es" => Some("Español"),
        "fr" => Some("Français"),
        "pt" => Some("Português"),
        _ => None,
    }
}
