//! Configuration file support for one-pager rendering
//!
//! Loads project-specific configuration from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.onepagerrc.json` next to the data file
//! 3. `onepager.config.json` next to the data file
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::dataset::{DuplicatePolicy, LoadOptions};
use crate::html::DashboardOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TITLE: &str = "Judiciary One-Pagers";
pub const DEFAULT_HEADER_COLOR: &str = "#006400";
pub const DEFAULT_SECTION_COLOR: &str = "#9CAF88";

/// Config file names probed during discovery, in priority order
const CONFIG_FILE_NAMES: &[&str] = &[".onepagerrc.json", "onepager.config.json"];

/// One-pager configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OnepagerConfig {
    /// Page title and heading (default: "Judiciary One-Pagers")
    #[serde(default)]
    pub title: Option<String>,

    /// Worksheet to read from a workbook (default: first sheet)
    #[serde(default)]
    pub sheet: Option<String>,

    /// Handling of repeated Court_Name values (default: first)
    #[serde(default)]
    pub duplicates: Option<DuplicatePolicy>,

    /// Dashboard output path, relative to the config file
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Dashboard colours
    #[serde(default)]
    pub theme: Option<ThemeConfig>,
}

/// Dashboard colours as `#rgb` or `#rrggbb`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    /// Docket heading background (default: #006400)
    pub header_color: Option<String>,
    /// Section heading background (default: #9CAF88)
    pub section_color: Option<String>,
}

/// Resolved configuration with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub title: String,
    pub sheet: Option<String>,
    pub duplicates: DuplicatePolicy,
    pub output: Option<PathBuf>,
    pub header_color: String,
    pub section_color: String,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl OnepagerConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref title) = self.title {
            if title.trim().is_empty() {
                anyhow::bail!("title must not be blank");
            }
        }

        if let Some(ref sheet) = self.sheet {
            if sheet.trim().is_empty() {
                anyhow::bail!("sheet must not be blank");
            }
        }

        if let Some(ref output) = self.output {
            if output.as_os_str().is_empty() {
                anyhow::bail!("output must not be empty");
            }
        }

        if let Some(ref theme) = self.theme {
            for (name, value) in [
                ("header_color", &theme.header_color),
                ("section_color", &theme.section_color),
            ] {
                if let Some(color) = value {
                    if !is_hex_color(color) {
                        anyhow::bail!(
                            "theme.{} must be a hex colour like #006400 (got {:?})",
                            name,
                            color
                        );
                    }
                }
            }
        }

        Ok(())
    }

    /// Resolve config into the form used by the loader and renderers
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let (header_color, section_color) = match &self.theme {
            Some(t) => (
                t.header_color.clone().unwrap_or_else(|| DEFAULT_HEADER_COLOR.to_string()),
                t.section_color.clone().unwrap_or_else(|| DEFAULT_SECTION_COLOR.to_string()),
            ),
            None => (
                DEFAULT_HEADER_COLOR.to_string(),
                DEFAULT_SECTION_COLOR.to_string(),
            ),
        };

        Ok(ResolvedConfig {
            title: self
                .title
                .as_deref()
                .map(str::trim)
                .unwrap_or(DEFAULT_TITLE)
                .to_string(),
            sheet: self.sheet.clone(),
            duplicates: self.duplicates.unwrap_or_default(),
            output: self.output.clone(),
            header_color,
            section_color,
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        OnepagerConfig::default().resolve()
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            sheet: self.sheet.clone(),
            duplicates: self.duplicates,
        }
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            title: self.title.clone(),
            header_color: self.header_color.clone(),
            section_color: self.section_color.clone(),
        }
    }
}

pub(crate) fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Discover and load a config file from a directory
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(dir: &Path) -> Result<Option<(OnepagerConfig, PathBuf)>> {
    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<OnepagerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: OnepagerConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config for a data directory
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config in `dir`.
/// Returns default config if nothing is found.
pub fn load_and_resolve(dir: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(dir)? {
            Some((config, path)) => (config, Some(path)),
            None => (OnepagerConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    // Relative output paths are anchored at the config file's directory
    let anchored = match (&resolved.output, source_path.as_deref().and_then(Path::parent)) {
        (Some(output), Some(parent)) if output.is_relative() => Some(parent.join(output)),
        _ => None,
    };
    if anchored.is_some() {
        resolved.output = anchored;
    }
    resolved.config_path = source_path;
    Ok(resolved)
}
