//! Rectangular binning and peak-bin search

use crate::binning::{axis_edges, Histogram2d};
use crate::filter::retain_for_scales;
use crate::renderer::{draw_colorbar, split_colorbar, PlotRenderer};
use crate::{PlotConfig, PointSet};
use plotters::coord::Shift;
use plotters::prelude::*;
use sdraw_common::{ensure, AxisScale, ColorNorm, DrawError, GridSize, Result};
use sdraw_config::RectbinSettings;
use std::ops::Range;
use std::path::Path;

/// Default figure title
pub const DEFAULT_TITLE: &str = "Rectangle binning points";

/// Default number of rectangles per axis
pub const DEFAULT_GRIDSIZE: usize = 100;

/// Most populated bin near a query point
#[derive(Debug, Clone, PartialEq)]
pub struct PeakBin {
    pub x_bin: usize,
    pub y_bin: usize,
    /// `[lo, hi]` edges of the bin on the x axis
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub count: u64,
    /// Points inside the bin edges (both ends inclusive), in input order
    pub points: PointSet,
}

/// Rectangular 2D histogram options
///
/// Log-scaled axes get log-spaced edges starting at 1, so a log axis with
/// `n` as grid size has `n - 1` bins. Linear axes get `n` equal bins.
#[derive(Debug, Clone, PartialEq)]
pub struct RectHistogram {
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
    pub gridsize: GridSize,
    pub color_norm: ColorNorm,
}

impl Default for RectHistogram {
    fn default() -> Self {
        Self {
            x_scale: AxisScale::Log,
            y_scale: AxisScale::Log,
            gridsize: GridSize::Uniform(DEFAULT_GRIDSIZE),
            color_norm: ColorNorm::Log,
        }
    }
}

/// Bins `[first, last)` whose edges lie inside `[start, end]`
fn bin_window(edges: &[f64], start: f64, end: f64) -> Option<Range<usize>> {
    let first = edges.iter().position(|&e| e >= start)?;
    let last = edges.iter().rposition(|&e| e <= end)?;
    (first < last).then_some(first..last)
}

impl RectHistogram {
    /// Options with the given scales and grid size, log color
    pub fn new(x_scale: AxisScale, y_scale: AxisScale, gridsize: impl Into<GridSize>) -> Self {
        Self {
            x_scale,
            y_scale,
            gridsize: gridsize.into(),
            color_norm: ColorNorm::Log,
        }
    }

    /// Default figure configuration: title `Rectangle binning points`, no axis labels
    pub fn default_config() -> PlotConfig {
        PlotConfig::titled(DEFAULT_TITLE, "", "")
    }

    /// Build options and figure configuration from config file settings
    pub fn from_settings(settings: &RectbinSettings) -> (Self, PlotConfig) {
        let hist = Self {
            x_scale: settings.x_scale,
            y_scale: settings.y_scale,
            gridsize: settings.gridsize,
            color_norm: ColorNorm::from_log_flag(settings.log_color),
        };
        let config = PlotConfig::titled(&settings.title, &settings.x_label, &settings.y_label);
        (hist, config)
    }

    /// Filter `points` for the axis scales and count them into a grid
    pub fn compute(&self, points: &PointSet) -> Result<Histogram2d> {
        self.gridsize.validate()?;
        let (nx, ny) = self.gridsize.per_axis();

        let kept = retain_for_scales(points, self.x_scale, self.y_scale);
        ensure!(!kept.is_empty(), "no points left to bin");

        let x_edges = axis_edges(kept.xs(), self.x_scale, nx)?;
        let y_edges = axis_edges(kept.ys(), self.y_scale, ny)?;
        let hist = Histogram2d::compute(&kept, x_edges, y_edges)?;

        tracing::debug!(
            shape = ?hist.shape(),
            binned = hist.total(),
            max = hist.max_count(),
            "Binned {} points into rectangles",
            kept.len()
        );
        Ok(hist)
    }

    /// Renderable view of an already computed histogram
    pub fn figure<'a>(&self, hist: &'a Histogram2d) -> RectbinFigure<'a> {
        RectbinFigure {
            hist,
            x_scale: self.x_scale,
            y_scale: self.y_scale,
            color_norm: self.color_norm,
        }
    }

    /// Compute the histogram and write the image when `outfig` is given
    pub fn draw(
        &self,
        points: &PointSet,
        outfig: Option<&Path>,
        config: &PlotConfig,
    ) -> Result<Histogram2d> {
        let hist = self.compute(points)?;
        if let Some(path) = outfig {
            self.figure(&hist).render_to_file(config, path)?;
        }
        Ok(hist)
    }

    /// Find the fullest bin of `hist` inside a square window around `(x, y)`
    ///
    /// The window `[x - radius, x + radius] x [y - radius, y + radius]` is
    /// clamped to the extent of the filtered points. Only bins whose edges
    /// lie completely inside the window are searched; ties go to the first
    /// bin in x-major order.
    pub fn find_peak_rect(
        &self,
        points: &PointSet,
        hist: &Histogram2d,
        x: f64,
        y: f64,
        radius: f64,
    ) -> Result<PeakBin> {
        ensure!(
            radius.is_finite() && radius >= 0.0,
            "search radius must be a non-negative number, got {}",
            radius
        );

        let kept = retain_for_scales(points, self.x_scale, self.y_scale);
        let (x_min, x_max) = kept
            .x_range()
            .ok_or_else(|| DrawError::validation("no points to search"))?;
        let (y_min, y_max) = kept
            .y_range()
            .ok_or_else(|| DrawError::validation("no points to search"))?;

        let x_start = (x - radius).max(x_min);
        let x_end = (x + radius).min(x_max);
        let y_start = (y - radius).max(y_min);
        let y_end = (y + radius).min(y_max);

        let window = bin_window(hist.x_edges(), x_start, x_end)
            .zip(bin_window(hist.y_edges(), y_start, y_end));
        let (x_bins, y_bins) = window.ok_or_else(|| {
            DrawError::validation_field(
                format!(
                    "no complete bin inside the window [{x_start}, {x_end}] x [{y_start}, {y_end}]"
                ),
                "radius",
            )
        })?;

        let mut peak = (x_bins.start, y_bins.start);
        let mut best = 0;
        for i in x_bins.clone() {
            for j in y_bins.clone() {
                let count = hist.count(i, j);
                if count > best {
                    best = count;
                    peak = (i, j);
                }
            }
        }

        let (x_bin, y_bin) = peak;
        let x_range = hist.x_bin_range(x_bin);
        let y_range = hist.y_bin_range(y_bin);
        let members: PointSet = kept
            .iter()
            .filter(|&(px, py)| {
                x_range.0 <= px && px <= x_range.1 && y_range.0 <= py && py <= y_range.1
            })
            .collect();

        tracing::debug!(
            x_bin,
            y_bin,
            count = best,
            members = members.len(),
            "Found peak bin near ({}, {})",
            x,
            y
        );

        Ok(PeakBin {
            x_bin,
            y_bin,
            x_range,
            y_range,
            count: hist.count(x_bin, y_bin),
            points: members,
        })
    }
}

/// A computed rectangular histogram ready to be drawn
#[derive(Debug, Clone, Copy)]
pub struct RectbinFigure<'a> {
    hist: &'a Histogram2d,
    x_scale: AxisScale,
    y_scale: AxisScale,
    color_norm: ColorNorm,
}

impl PlotRenderer for RectbinFigure<'_> {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        config: &PlotConfig,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let hist = self.hist;
        let x_edges: Vec<f64> = hist.x_edges().iter().map(|&e| self.x_scale.to_display(e)).collect();
        let y_edges: Vec<f64> = hist.y_edges().iter().map(|&e| self.y_scale.to_display(e)).collect();
        let x_range = x_edges[0]..x_edges[x_edges.len() - 1];
        let y_range = y_edges[0]..y_edges[y_edges.len() - 1];

        let (plot_area, bar_area) = split_colorbar(root, config);
        let title = format!("{}{}", config.title, self.color_norm.title_suffix());
        let mut chart = ChartBuilder::on(&plot_area)
            .caption(
                title,
                (
                    config.style.title_font.family.as_str(),
                    config.style.title_font.size,
                ),
            )
            .margin(config.style.margins.top)
            .margin_right(config.style.margins.right)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(x_range, y_range)?;

        self.draw_axes(&mut chart, config, self.x_scale, self.y_scale)?;

        let vmin = hist.min_positive_count().unwrap_or(0) as f64;
        let vmax = hist.max_count() as f64;
        let colormap = config.style.colormap;
        chart.draw_series(hist.nonzero_bins().map(|((i, j), count)| {
            let t = self.color_norm.normalize(count as f64, vmin, vmax);
            Rectangle::new(
                [(x_edges[i], y_edges[j]), (x_edges[i + 1], y_edges[j + 1])],
                colormap.color_at(t).filled(),
            )
        }))?;

        draw_colorbar(&bar_area, colormap, self.color_norm, vmin, vmax)?;
        Ok(())
    }
}

/// Rectangle-bin `xs` against `ys` with `options`, writing the image when `outfig` is given
///
/// `config` carries the title and axis labels, see [`RectHistogram::default_config`].
pub fn draw_rectbin(
    xs: &[f64],
    ys: &[f64],
    outfig: Option<&Path>,
    options: &RectHistogram,
    config: &PlotConfig,
) -> Result<Histogram2d> {
    let points = PointSet::from_slices(xs, ys)?;
    options.draw(&points, outfig, config)
}
