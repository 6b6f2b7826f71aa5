use std::env;
use std::path::PathBuf;

use crate::render::DEFAULT_FIELD_IMAGE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub match_dir: PathBuf,
    pub sheet: Option<String>,
    pub field_image: String,
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            match_dir: PathBuf::from("."),
            sheet: None,
            field_image: DEFAULT_FIELD_IMAGE.to_string(),
            export_dir: PathBuf::from("exports"),
        }
    }
}

impl AppConfig {
    /// Reads `FUTSAL_*` variables; blank values fall back to defaults.
    ///
    /// Call `dotenvy` first if `.env` files should be honoured.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            match_dir: non_empty_env("FUTSAL_MATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.match_dir),
            sheet: non_empty_env("FUTSAL_SHEET"),
            field_image: non_empty_env("FUTSAL_FIELD_IMAGE").unwrap_or(defaults.field_image),
            export_dir: non_empty_env("FUTSAL_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
