//! Default values for every configuration section.

use crate::schema::*;
use sdraw_common::{AxisScale, GridSize, LogFormat, TimeBins};
use std::path::PathBuf;

/// Default image width in pixels.
pub const DEFAULT_WIDTH: u32 = 800;
/// Default image height in pixels.
pub const DEFAULT_HEIGHT: u32 = 600;
/// Default number of hexagons along the x axis.
pub const DEFAULT_HEXBIN_GRIDSIZE: usize = 200;
/// Default number of rectangles per axis.
pub const DEFAULT_RECTBIN_GRIDSIZE: usize = 100;

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file_path: None,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Default for ScatterSettings {
    fn default() -> Self {
        Self {
            title: "scatter points".to_string(),
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            x_scale: AxisScale::Linear,
            y_scale: AxisScale::Linear,
        }
    }
}

impl Default for HexbinSettings {
    fn default() -> Self {
        Self {
            title: "Hexagon binning points".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            x_scale: AxisScale::Log,
            y_scale: AxisScale::Log,
            gridsize: DEFAULT_HEXBIN_GRIDSIZE,
            log_color: true,
        }
    }
}

impl Default for RectbinSettings {
    fn default() -> Self {
        Self {
            title: "Rectangle binning points".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            x_scale: AxisScale::Log,
            y_scale: AxisScale::Log,
            gridsize: GridSize::Uniform(DEFAULT_RECTBIN_GRIDSIZE),
            log_color: true,
        }
    }
}

impl Default for TimeSeriesSettings {
    fn default() -> Self {
        Self {
            title: "time series".to_string(),
            bins: TimeBins::Auto,
            epoch_seconds: false,
        }
    }
}
