//! Configuration loading and persistence with atomic file operations.

use crate::schema::DrawConfig;
use crate::validator::ConfigValidator;
use sdraw_common::{with_context, DrawError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// On-disk format of a configuration file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Detects the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => Err(DrawError::config(format!(
                "unsupported configuration file extension: {}",
                path.display()
            ))),
        }
    }

    /// Parses configuration text in this format.
    pub fn parse(self, content: &str) -> Result<DrawConfig> {
        match self {
            Self::Toml => Ok(toml::from_str(content)?),
            Self::Json => Ok(serde_json::from_str(content)?),
        }
    }

    /// Renders configuration text in this format.
    pub fn render(self, config: &DrawConfig) -> Result<String> {
        match self {
            Self::Toml => Ok(toml::to_string_pretty(config)?),
            Self::Json => Ok(serde_json::to_string_pretty(config)?),
        }
    }
}

/// Configuration loader with atomic file operations.
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this loader reads from and writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and validates configuration from file.
    ///
    /// A missing file yields the default configuration.
    pub fn load(&self) -> Result<DrawConfig> {
        let format = ConfigFormat::from_path(&self.path)?;

        if !self.path.exists() {
            tracing::debug!(
                "Configuration file {} not found, using defaults",
                self.path.display()
            );
            return Ok(DrawConfig::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            with_context!(e, "Failed to read configuration file {}", self.path.display())
        })?;
        let config = format.parse(&content)?;
        ConfigValidator::validate(&config)?;

        tracing::info!("Loaded configuration from {}", self.path.display());
        Ok(config)
    }

    /// Saves configuration to file atomically.
    ///
    /// The content is written to a temporary file in the same directory and
    /// renamed over the target, so readers never see a partial file.
    pub fn save(&self, config: &DrawConfig) -> Result<()> {
        ConfigValidator::validate(config)?;
        let format = ConfigFormat::from_path(&self.path)?;
        let content = format.render(config)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| with_context!(e.error, "Failed to persist {}", self.path.display()))?;

        tracing::info!("Saved configuration to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdraw_common::{AxisScale, GridSize};

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("sdraw.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/b/sdraw.JSON")).unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigFormat::from_path(Path::new("sdraw.yaml")).is_err());
        assert!(ConfigFormat::from_path(Path::new("sdraw")).is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ConfigFormat::Toml
            .parse(
                r#"
                [rectbin]
                x_scale = "linear"
                gridsize = [50, 20]
                "#,
            )
            .unwrap();

        assert_eq!(config.rectbin.x_scale, AxisScale::Linear);
        assert_eq!(config.rectbin.y_scale, AxisScale::Log);
        assert_eq!(config.rectbin.gridsize, GridSize::PerAxis(50, 20));
        assert_eq!(config.hexbin, crate::HexbinSettings::default());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path().join("absent.toml"));
        assert_eq!(loader.load().unwrap(), DrawConfig::default());
    }
}
