//! # sdraw plots
//!
//! Density plots for large point sets rendered with plotters: scatter
//! plots, hexagonal and rectangular 2D histograms with log-scaled axes and
//! log color scales, a peak-bin search over rectangular histograms, and
//! time-series histograms of event timestamps.
//!
//! ```no_run
//! use sdraw_plots::{draw_hexbin, HexbinPlot, PlotConfig};
//! use std::path::Path;
//!
//! # fn main() -> sdraw_common::Result<()> {
//! let xs = [1.0, 10.0, 100.0];
//! let ys = [2.0, 20.0, 200.0];
//! let config = PlotConfig::titled("Hexagon binning points", "x", "y");
//! let outfig = Some(Path::new("hexbin.png"));
//! let grid = draw_hexbin(&xs, &ys, outfig, &HexbinPlot::default(), &config)?;
//! assert_eq!(grid.total(), 3);
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod binning;
pub mod colormap;
pub mod filter;
pub mod hexbin;
pub mod rectbin;
pub mod renderer;
pub mod scatter;
pub mod timeseries;
pub mod types;

pub use binning::{Histogram1d, Histogram2d};
pub use colormap::ColorMap;
pub use filter::retain_for_scales;
pub use hexbin::{draw_hexbin, HexCell, HexGrid, HexbinFigure, HexbinPlot};
pub use rectbin::{draw_rectbin, PeakBin, RectHistogram, RectbinFigure};
pub use renderer::PlotRenderer;
pub use scatter::{draw_scatter_points, ScatterPlot};
pub use timeseries::{
    draw_timeseries, user_time_series, TimeAxis, TimeSeriesHistogram, TimeSeriesPlot,
    WindowedSeries,
};
pub use types::*;

// Shared option enums live in sdraw-common
pub use sdraw_common::{AxisScale, ColorNorm, GridSize, TimeBins};
