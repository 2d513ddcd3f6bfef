//! Configuration schema definitions using serde.

use sdraw_common::{AxisScale, GridSize, LogFormat, LoggingConfig, TimeBins};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration for sdraw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DrawConfig {
    /// Logging configuration.
    pub logging: LoggingSettings,
    /// Output image configuration.
    pub output: OutputSettings,
    /// Scatter plot defaults.
    pub scatter: ScatterSettings,
    /// Hexagonal binning defaults.
    pub hexbin: HexbinSettings,
    /// Rectangular binning defaults.
    pub rectbin: RectbinSettings,
    /// Time series defaults.
    pub timeseries: TimeSeriesSettings,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Env-filter directive, e.g. `info` or `sdraw_plots=debug`.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
    /// Optional log file; logs go to stdout when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl LoggingSettings {
    /// Converts into the logging configuration used by `sdraw_common::init_logging`.
    pub fn to_logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.level.clone(),
            format: self.format,
            file_path: self.file_path.clone(),
            ..LoggingConfig::default()
        }
    }
}

/// Output image configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory that relative output file names are resolved against.
    pub directory: PathBuf,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl OutputSettings {
    /// Resolves a file name against the output directory.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.directory.join(file_name)
    }
}

/// Scatter plot defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterSettings {
    /// Figure title.
    pub title: String,
    /// Horizontal axis label.
    pub x_label: String,
    /// Vertical axis label.
    pub y_label: String,
    /// Horizontal axis scale.
    pub x_scale: AxisScale,
    /// Vertical axis scale.
    pub y_scale: AxisScale,
}

/// Hexagonal binning defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HexbinSettings {
    /// Figure title.
    pub title: String,
    /// Horizontal axis label.
    pub x_label: String,
    /// Vertical axis label.
    pub y_label: String,
    /// Horizontal axis scale.
    pub x_scale: AxisScale,
    /// Vertical axis scale.
    pub y_scale: AxisScale,
    /// Number of hexagons along the x axis.
    pub gridsize: usize,
    /// Whether bin counts are colored on a log scale.
    pub log_color: bool,
}

/// Rectangular binning defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectbinSettings {
    /// Figure title.
    pub title: String,
    /// Horizontal axis label.
    pub x_label: String,
    /// Vertical axis label.
    pub y_label: String,
    /// Horizontal axis scale.
    pub x_scale: AxisScale,
    /// Vertical axis scale.
    pub y_scale: AxisScale,
    /// Number of rectangles per axis.
    pub gridsize: GridSize,
    /// Whether bin counts are colored on a log scale.
    pub log_color: bool,
}

/// Time series defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSeriesSettings {
    /// Figure title.
    pub title: String,
    /// Binning rule for timestamps.
    pub bins: TimeBins,
    /// Whether timestamps are epoch seconds and should be labelled as dates.
    pub epoch_seconds: bool,
}
