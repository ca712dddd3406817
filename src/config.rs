//! Layout defaults.
//!
//! A read-only registry of default spacings and sharing toggles, loaded from
//! YAML. Call-site values always win over these defaults; see [`layered`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default sharing toggles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShareDefaults {
    /// Share x axes between panels with equal column extents.
    #[serde(default = "default_true")]
    pub x: bool,
    /// Share y axes between panels with equal row extents.
    #[serde(default = "default_true")]
    pub y: bool,
    /// Let x labels span shared panels.
    #[serde(default = "default_true")]
    pub span_x: bool,
    /// Let y labels span shared panels.
    #[serde(default = "default_true")]
    pub span_y: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ShareDefaults {
    fn default() -> Self {
        Self { x: true, y: true, span_x: true, span_y: true }
    }
}

/// Default spacings, relative to the mean panel width or height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridspecDefaults {
    /// Space between main-grid columns.
    #[serde(default = "default_space")]
    pub wspace: f32,
    /// Space between main-grid rows.
    #[serde(default = "default_space")]
    pub hspace: f32,
    /// Width of a colorbar inner panel.
    #[serde(default = "default_cbar")]
    pub cbar: f32,
    /// Room for an x label and tick labels.
    #[serde(default = "default_lab")]
    pub xlab: f32,
    /// Room for a y label and tick labels.
    #[serde(default = "default_lab")]
    pub ylab: f32,
    /// Room when no labels are drawn.
    #[serde(default = "default_nolab")]
    pub nolab: f32,
    /// Size of an outer strip row or column.
    #[serde(default = "default_strip_ratio")]
    pub strip_ratio: f32,
    /// Space between the main grid and an outer strip.
    #[serde(default = "default_strip_space")]
    pub strip_space: f32,
    /// Figure margin on every side, as a fraction of the figure.
    #[serde(default = "default_margin")]
    pub margin: f32,
}

fn default_space() -> f32 {
    0.1
}
fn default_cbar() -> f32 {
    0.08
}
fn default_lab() -> f32 {
    0.25
}
fn default_nolab() -> f32 {
    0.05
}
fn default_strip_ratio() -> f32 {
    0.1
}
fn default_strip_space() -> f32 {
    0.05
}
fn default_margin() -> f32 {
    0.05
}

impl Default for GridspecDefaults {
    fn default() -> Self {
        Self {
            wspace: default_space(),
            hspace: default_space(),
            cbar: default_cbar(),
            xlab: default_lab(),
            ylab: default_lab(),
            nolab: default_nolab(),
            strip_ratio: default_strip_ratio(),
            strip_space: default_strip_space(),
            margin: default_margin(),
        }
    }
}

/// Layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Sharing toggles.
    #[serde(default)]
    pub share: ShareDefaults,

    /// Spacing defaults.
    #[serde(default)]
    pub gridspec: GridspecDefaults,
}

fn default_version() -> u32 {
    1
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            share: ShareDefaults::default(),
            gridspec: GridspecDefaults::default(),
        }
    }
}

impl LayoutConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::ConfigParse { line, message: e.to_string() }
        })
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Default location: `<config dir>/trueno-subplots/config.yaml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("trueno-subplots/config.yaml"))
    }
}

/// First present value among `layers`, highest precedence first.
///
/// ```
/// use trueno_subplots::config::layered;
///
/// assert_eq!(layered([None, Some(0.2), Some(0.1)]), Some(0.2));
/// assert_eq!(layered::<f32>([None, None]), None);
/// ```
pub fn layered<T>(layers: impl IntoIterator<Item = Option<T>>) -> Option<T> {
    layers.into_iter().flatten().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = LayoutConfig::new();

        assert_eq!(config.version, 1);
        assert!(config.share.x);
        assert!(config.share.span_y);
        assert!((config.gridspec.wspace - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_config_parse_minimal() {
        let config = LayoutConfig::parse("version: 1").unwrap();
        assert_eq!(config, LayoutConfig::default());
    }

    #[test]
    fn test_config_parse_full() {
        let yaml = r#"
version: 1
share:
  x: false
  span_y: false
gridspec:
  cbar: 0.12
  ylab: 0.3
"#;

        let config = LayoutConfig::parse(yaml).unwrap();

        assert!(!config.share.x);
        assert!(config.share.y);
        assert!(!config.share.span_y);
        approx::assert_relative_eq!(config.gridspec.cbar, 0.12);
        approx::assert_relative_eq!(config.gridspec.ylab, 0.3);
        approx::assert_relative_eq!(config.gridspec.xlab, 0.25);
    }

    #[test]
    fn test_config_parse_error_includes_line() {
        let yaml = r#"
version: 1
gridspec:
  cbar: wide
"#;

        let err = LayoutConfig::parse(yaml).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.to_string().contains('4'), "Error should include line number: {err}");
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "share:\n  y: false\n").unwrap();

        let config = LayoutConfig::load(&path).unwrap();
        assert!(!config.share.y);
    }

    #[test]
    fn test_config_load_missing() {
        let err = LayoutConfig::load("/nonexistent/path.yaml").unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
        assert_eq!(LayoutConfig::load_or_default("/nonexistent/path.yaml").version, 1);
    }

    #[test]
    fn test_layered_precedence() {
        assert_eq!(layered([Some(1), Some(2)]), Some(1));
        assert_eq!(layered([None, None, Some(3)]), Some(3));
        assert_eq!(layered(Vec::<Option<u8>>::new()), None);
    }
}
