//! Runtime validation of loaded configuration.

use crate::schema::DrawConfig;
use sdraw_common::{DrawError, Result};
use log_levels::is_known_level;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first offending field.
    pub fn validate(config: &DrawConfig) -> Result<()> {
        if config.output.width == 0 || config.output.height == 0 {
            return Err(DrawError::validation_field(
                format!(
                    "image size must be positive, got {}x{}",
                    config.output.width, config.output.height
                ),
                "output",
            ));
        }

        if config.hexbin.gridsize == 0 {
            return Err(DrawError::validation_field(
                "hexbin gridsize must be positive",
                "hexbin.gridsize",
            ));
        }

        config
            .rectbin
            .gridsize
            .validate()
            .map_err(|_| {
                DrawError::validation_field(
                    "rectbin gridsize must be positive on both axes",
                    "rectbin.gridsize",
                )
            })?;

        config.timeseries.bins.validate().map_err(|e| {
            DrawError::validation_field(e.to_string(), "timeseries.bins")
        })?;

        if !is_known_level(&config.logging.level) {
            return Err(DrawError::validation_field(
                format!("unknown log level '{}'", config.logging.level),
                "logging.level",
            ));
        }

        Ok(())
    }
}

/// Level names accepted for the `logging.level` setting.
mod log_levels {
    const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

    /// Accepts a bare level or a comma separated list of `target=level` directives.
    pub fn is_known_level(directive: &str) -> bool {
        !directive.trim().is_empty()
            && directive.split(',').all(|part| {
                let level = part.rsplit('=').next().unwrap_or(part).trim();
                LEVELS.contains(&level.to_ascii_lowercase().as_str())
            })
    }
}
