//! Application configuration and constants.

use std::env;
use std::path::PathBuf;

use crate::generation::GEMINI_API_URL;

#[derive(Debug, Clone)]
pub struct Config {
    /// Main loop tick rate in milliseconds (target 60 FPS = ~16ms)
    pub tick_rate_ms: u64,

    /// How long a card shows "Copied!" after a copy
    pub copy_feedback_ms: u64,

    /// Modulo for animation frame counter
    pub animation_frame_mod: usize,

    /// Timeout for one generation request
    pub request_timeout_secs: u64,

    /// Credential for the generation service
    pub api_key: Option<String>,

    /// Base URL of the generation service
    pub api_base_url: String,

    /// Where tracing output goes; stdout belongs to the terminal UI
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            copy_feedback_ms: 2000,
            animation_frame_mod: 360,
            request_timeout_secs: 60,
            api_key: None,
            api_base_url: GEMINI_API_URL.to_string(),
            log_file: PathBuf::from("prompt-gallery.log"),
        }
    }
}

impl Config {
    /// Read the credential and overrides from the environment (and `.env`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let api_key = env::var("API_KEY").ok().filter(|k| !k.trim().is_empty());
        let api_base_url = env::var("GEMINI_API_URL").unwrap_or(defaults.api_base_url.clone());
        let log_file = env::var("PROMPT_GALLERY_LOG")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file.clone());

        Self {
            api_key,
            api_base_url,
            log_file,
            ..defaults
        }
    }
}

/// Keys shown in the footer of each screen
pub const GALLERY_HINTS: &[(&str, &str)] = &[
    ("←/→", "category"),
    ("↑/↓", "select"),
    ("Enter", "use prompt"),
    ("c", "copy"),
    ("q", "quit"),
];

pub const GENERATOR_HINTS: &[(&str, &str)] = &[
    ("Esc", "back"),
    ("g", "generate"),
    ("c", "copy"),
    ("↑/↓", "scroll"),
    ("F2", "raw/preview"),
];
