//! Scatter plot of raw points

use crate::filter::retain_for_scales;
use crate::renderer::{padded_bounds, PlotRenderer};
use crate::{PlotConfig, PointSet};
use plotters::coord::Shift;
use plotters::prelude::*;
use sdraw_common::{ensure, AxisScale, Result};
use sdraw_config::ScatterSettings;
use std::path::Path;

/// Default figure title
pub const DEFAULT_TITLE: &str = "scatter points";

/// Scatter plot of a point set, one small dot per point
#[derive(Debug, Clone)]
pub struct ScatterPlot {
    points: PointSet,
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
    /// Marker radius in pixels
    pub marker_size: u32,
}

impl ScatterPlot {
    /// Create a scatter plot with linear axes
    pub fn new(points: PointSet) -> Self {
        Self {
            points,
            x_scale: AxisScale::Linear,
            y_scale: AxisScale::Linear,
            marker_size: 2,
        }
    }

    /// Set both axis scales
    pub fn with_scales(mut self, x_scale: AxisScale, y_scale: AxisScale) -> Self {
        self.x_scale = x_scale;
        self.y_scale = y_scale;
        self
    }

    /// Default figure configuration: title `scatter points`, labels `x` and `y`
    pub fn default_config() -> PlotConfig {
        PlotConfig::titled(DEFAULT_TITLE, "x", "y")
    }

    /// Build a plot and its figure configuration from config file settings
    pub fn from_settings(points: PointSet, settings: &ScatterSettings) -> (Self, PlotConfig) {
        let plot = Self::new(points).with_scales(settings.x_scale, settings.y_scale);
        let config = PlotConfig::titled(&settings.title, &settings.x_label, &settings.y_label);
        (plot, config)
    }

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    /// Points that survive log-axis filtering, mapped into display space
    fn display_points(&self) -> Result<Vec<(f64, f64)>> {
        let kept = retain_for_scales(&self.points, self.x_scale, self.y_scale);
        ensure!(!kept.is_empty(), "no points left to draw");
        Ok(kept
            .iter()
            .map(|(x, y)| (self.x_scale.to_display(x), self.y_scale.to_display(y)))
            .collect())
    }
}

impl PlotRenderer for ScatterPlot {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        config: &PlotConfig,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let data = self.display_points()?;
        let (x_range, y_range) = padded_bounds(&data);

        let title_font = (
            config.style.title_font.family.as_str(),
            config.style.title_font.size,
        );
        let mut chart = ChartBuilder::on(root)
            .caption(&config.title, title_font)
            .margin(config.style.margins.top)
            .margin_right(config.style.margins.right)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(x_range, y_range)?;

        self.draw_axes(&mut chart, config, self.x_scale, self.y_scale)?;

        let colors = self.get_colors(&config.style.color_scheme);
        let color = colors.first().copied().unwrap_or(RGBColor(31, 119, 180));
        chart.draw_series(
            data.iter()
                .map(|&point| Circle::new(point, self.marker_size, color.filled())),
        )?;

        tracing::debug!(points = data.len(), "Drew scatter points");
        Ok(())
    }
}

/// Scatter `xs` against `ys`, writing the image only when `outfig` is given
pub fn draw_scatter_points(
    xs: &[f64],
    ys: &[f64],
    outfig: Option<&Path>,
    title: &str,
    x_label: &str,
    y_label: &str,
) -> Result<()> {
    let plot = ScatterPlot::new(PointSet::from_slices(xs, ys)?);
    match outfig {
        Some(path) => plot.render_to_file(&PlotConfig::titled(title, x_label, y_label), path),
        None => Ok(()),
    }
}
