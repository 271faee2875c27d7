use crate::render::{ChartStyle, PageLayout};
use crate::render::page::DEFAULT_CELL_CHAR_CAP;
use crate::views::DEFAULT_TOP_N;
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Report-wide settings, persisted as JSON.
///
/// Missing fields fall back to their defaults, so an older or partial
/// config file still loads.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReportSettings {
    pub layout: PageLayout,
    pub chart_style: ChartStyle,
    /// Data rows per table page before the truncation marker (default: 20)
    pub max_rows: usize,
    /// Characters kept per table cell (default: 24)
    pub cell_char_cap: usize,
    /// Rows kept by top-N views when the recipe does not say (default: 10)
    pub top_n: usize,
    /// Rows shown on the raw preview page (default: 5)
    pub preview_rows: usize,
    /// Put each chart and its table on separate pages
    pub split_chart_pages: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            layout: PageLayout::default(),
            chart_style: ChartStyle::default(),
            max_rows: 20,
            cell_char_cap: DEFAULT_CELL_CHAR_CAP,
            top_n: DEFAULT_TOP_N,
            preview_rows: 5,
            split_chart_pages: false,
        }
    }
}

impl ReportSettings {
    /// Replaces zero limits with their defaults.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        if self.max_rows == 0 {
            self.max_rows = defaults.max_rows;
        }
        if self.cell_char_cap == 0 {
            self.cell_char_cap = defaults.cell_char_cap;
        }
        if self.top_n == 0 {
            self.top_n = defaults.top_n;
        }
        self
    }
}

pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("datadeck")
        .join("config.json")
}

pub fn load_settings() -> ReportSettings {
    load_settings_from(&get_config_path())
}

/// Reads settings from `path`, falling back to defaults when the file is
/// missing or cannot be parsed.
pub fn load_settings_from(path: &Path) -> ReportSettings {
    if path.exists()
        && let Ok(content) = std::fs::read_to_string(path)
    {
        match serde_json::from_str::<ReportSettings>(&content) {
            Ok(settings) => return settings.normalized(),
            Err(e) => tracing::warn!("Ignoring invalid config at {}: {e}", path.display()),
        }
    }
    ReportSettings::default()
}

pub fn save_settings(settings: &ReportSettings) -> Result<()> {
    save_settings_to(settings, &get_config_path())
}

pub fn save_settings_to(settings: &ReportSettings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_round_trip() -> Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("nested").join("config.json");
        let settings = ReportSettings {
            max_rows: 12,
            split_chart_pages: true,
            ..ReportSettings::default()
        };
        save_settings_to(&settings, &path)?;
        assert_eq!(load_settings_from(&path), settings);
        Ok(())
    }

    #[test]
    fn test_partial_and_invalid_files() -> Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("config.json");

        std::fs::write(&path, r#"{"max_rows": 7, "top_n": 0}"#)?;
        let settings = load_settings_from(&path);
        assert_eq!(settings.max_rows, 7);
        assert_eq!(settings.top_n, DEFAULT_TOP_N);
        assert_eq!(settings.preview_rows, 5);

        std::fs::write(&path, "not json")?;
        assert_eq!(load_settings_from(&path), ReportSettings::default());

        assert_eq!(
            load_settings_from(&tmp.path().join("missing.json")),
            ReportSettings::default()
        );
        Ok(())
    }
}
