//! Time-series density plots and fixed-window event counts

use crate::binning::{Histogram1d, MAX_BINS};
use crate::renderer::{format_number, padded_range, PlotRenderer};
use crate::PlotConfig;
use chrono::DateTime;
use plotters::coord::Shift;
use plotters::prelude::*;
use sdraw_common::{ensure, DrawError, Result, TimeBins};
use sdraw_config::TimeSeriesSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default figure title
pub const DEFAULT_TITLE: &str = "time series";

/// How the time axis is labelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeAxis {
    /// Plain numbers
    #[default]
    Numeric,
    /// Seconds since the Unix epoch, labelled as UTC dates
    EpochSeconds,
}

impl TimeAxis {
    pub fn from_epoch_flag(epoch_seconds: bool) -> Self {
        if epoch_seconds {
            Self::EpochSeconds
        } else {
            Self::Numeric
        }
    }

    /// Tick label for a time value
    pub fn format(self, value: f64) -> String {
        match self {
            Self::Numeric => format_number(value),
            Self::EpochSeconds => DateTime::from_timestamp(value.round() as i64, 0)
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| format_number(value)),
        }
    }
}

/// Binned timestamps plus the optional highlighted subset on the same edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesHistogram {
    pub series: Histogram1d,
    pub highlight: Option<Histogram1d>,
}

impl TimeSeriesHistogram {
    /// Bin `timestamps` with `bins`, then `highlight` with the resulting edges
    pub fn compute(timestamps: &[f64], highlight: &[f64], bins: &TimeBins) -> Result<Self> {
        let series = Histogram1d::compute(timestamps, bins)?;
        let highlight = if highlight.is_empty() {
            None
        } else {
            Some(Histogram1d::with_edges(highlight, series.edges.clone())?)
        };

        tracing::debug!(
            bins = series.counts.len(),
            binned = series.total(),
            highlighted = ?highlight.as_ref().map(Histogram1d::total),
            "Binned {} timestamps",
            timestamps.len()
        );
        Ok(Self { series, highlight })
    }

    /// Largest count of either series
    pub fn max_count(&self) -> u64 {
        self.series
            .counts
            .iter()
            .chain(self.highlight.iter().flat_map(|h| h.counts.iter()))
            .copied()
            .max()
            .unwrap_or(0)
    }
}

/// Histogram of event timestamps, with an optional highlighted subset
#[derive(Debug, Clone)]
pub struct TimeSeriesPlot {
    timestamps: Vec<f64>,
    highlight: Vec<f64>,
    pub bins: TimeBins,
    pub time_axis: TimeAxis,
}

impl TimeSeriesPlot {
    pub fn new(timestamps: Vec<f64>) -> Self {
        Self {
            timestamps,
            highlight: Vec::new(),
            bins: TimeBins::Auto,
            time_axis: TimeAxis::Numeric,
        }
    }

    /// Overlay a second set of timestamps binned on the same edges
    pub fn with_highlight(mut self, highlight: Vec<f64>) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn with_bins(mut self, bins: TimeBins) -> Self {
        self.bins = bins;
        self
    }

    pub fn with_time_axis(mut self, time_axis: TimeAxis) -> Self {
        self.time_axis = time_axis;
        self
    }

    pub fn default_config() -> PlotConfig {
        PlotConfig::titled(DEFAULT_TITLE, "", "")
    }

    /// Build a plot and its figure configuration from config file settings
    pub fn from_settings(timestamps: Vec<f64>, settings: &TimeSeriesSettings) -> (Self, PlotConfig) {
        let plot = Self::new(timestamps)
            .with_bins(settings.bins.clone())
            .with_time_axis(TimeAxis::from_epoch_flag(settings.epoch_seconds));
        (plot, PlotConfig::titled(&settings.title, "", ""))
    }

    pub fn histogram(&self) -> Result<TimeSeriesHistogram> {
        TimeSeriesHistogram::compute(&self.timestamps, &self.highlight, &self.bins)
    }
}

impl PlotRenderer for TimeSeriesPlot {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        config: &PlotConfig,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let hist = self.histogram()?;
        let edges = &hist.series.edges;
        let x_range = padded_range(edges[0], edges[edges.len() - 1]);
        let y_max = hist.max_count().max(1) as f64 * 1.1;

        let mut chart = ChartBuilder::on(root)
            .caption(
                &config.title,
                (
                    config.style.title_font.family.as_str(),
                    config.style.title_font.size,
                ),
            )
            .margin(config.style.margins.top)
            .margin_right(config.style.margins.right)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(x_range, 0.0..y_max)?;

        let time_axis = self.time_axis;
        let x_fmt = move |v: &f64| time_axis.format(*v);
        let y_fmt = |v: &f64| format_number(*v);
        self.draw_mesh(&mut chart, config, &x_fmt, &y_fmt)?;

        let outline = hist.series.outline();
        chart.draw_series(LineSeries::new(outline.iter().copied(), &RED))?;
        chart.draw_series(outline.iter().map(|&p| Cross::new(p, 4, RED)))?;

        if let Some(highlight) = &hist.highlight {
            let outline = highlight.outline();
            chart.draw_series(LineSeries::new(outline.iter().copied(), &BLUE))?;
            chart.draw_series(outline.iter().map(|&p| TriangleMarker::new(p, 4, BLUE)))?;
        }
        Ok(())
    }
}

/// Plot the timestamp histogram, optionally saving the image and a JSON dump
///
/// The image goes to `save_dir/save_name` and the binned series to
/// `save_dir/dump_name`, each only when its name is given.
pub fn draw_timeseries(
    timestamps: &[f64],
    highlight: &[f64],
    bins: &TimeBins,
    save_dir: &Path,
    save_name: Option<&str>,
    dump_name: Option<&str>,
) -> Result<TimeSeriesHistogram> {
    let plot = TimeSeriesPlot::new(timestamps.to_vec())
        .with_highlight(highlight.to_vec())
        .with_bins(bins.clone());
    let hist = plot.histogram()?;

    if let Some(name) = save_name {
        plot.render_to_file(&TimeSeriesPlot::default_config(), &save_dir.join(name))?;
    }

    if let Some(name) = dump_name {
        std::fs::create_dir_all(save_dir)?;
        let path = save_dir.join(name);
        std::fs::write(&path, serde_json::to_string_pretty(&hist)?)?;
        tracing::info!("Dumped time series to {}", path.display());
    }

    Ok(hist)
}

/// Event counts over fixed-width windows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowedSeries {
    /// Window start offset, the smallest timestamp
    pub start: i64,
    pub window: i64,
    /// Center of each window
    pub centers: Vec<i64>,
    pub counts: Vec<u64>,
}

/// Count `timestamps` per window of `window` units starting at the smallest one
///
/// There are `(max - min) / window + 1` windows, at most [`MAX_BINS`]; window
/// `i` is centered at `min + window * i + window / 2`.
pub fn user_time_series(timestamps: &[i64], window: i64) -> Result<WindowedSeries> {
    ensure!(window > 0, "time window must be positive, got {}", window);
    let (Some(&min), Some(&max)) = (timestamps.iter().min(), timestamps.iter().max()) else {
        return Err(DrawError::validation("no timestamps to count"));
    };

    let overflow = || {
        DrawError::validation_field("timestamp span overflows the window arithmetic", "window")
    };
    let span = max.checked_sub(min).ok_or_else(overflow)?;
    let windows = (span / window).checked_add(1).ok_or_else(overflow)?;
    if windows > MAX_BINS as i64 {
        return Err(DrawError::validation_field(
            format!("{windows} windows requested, at most {MAX_BINS} are allowed"),
            "window",
        ));
    }

    let mut counts = vec![0u64; windows as usize];
    for &ts in timestamps {
        counts[((ts - min) / window) as usize] += 1;
    }
    let centers = (0..windows)
        .map(|i| {
            window
                .checked_mul(i)
                .and_then(|offset| offset.checked_add(window / 2))
                .and_then(|offset| min.checked_add(offset))
                .ok_or_else(overflow)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(WindowedSeries {
        start: min,
        window,
        centers,
        counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_histogram_with_highlight_shares_edges() {
        let hist = TimeSeriesHistogram::compute(
            &[0.0, 1.0, 1.5, 3.0, 4.0],
            &[1.2, 3.9],
            &TimeBins::Count(4),
        )
        .unwrap();

        assert_eq!(hist.series.counts, vec![1, 2, 0, 2]);
        let highlight = hist.highlight.as_ref().unwrap();
        assert_eq!(highlight.edges, hist.series.edges);
        assert_eq!(highlight.counts, vec![0, 1, 0, 1]);
        assert_eq!(hist.max_count(), 2);
    }

    #[test]
    fn test_empty_highlight_is_none() {
        let hist = TimeSeriesHistogram::compute(&[1.0, 2.0], &[], &TimeBins::Auto).unwrap();
        assert!(hist.highlight.is_none());
        assert!(TimeSeriesHistogram::compute(&[], &[], &TimeBins::Auto).is_err());
    }

    #[test]
    fn test_time_axis_format() {
        assert_eq!(TimeAxis::Numeric.format(1500.0), "1500");
        assert_eq!(TimeAxis::EpochSeconds.format(0.0), "1970-01-01 00:00");
        assert_eq!(TimeAxis::EpochSeconds.format(1_700_000_000.0), "2023-11-14 22:13");
        assert_eq!(TimeAxis::from_epoch_flag(true), TimeAxis::EpochSeconds);
    }

    #[test]
    fn test_draw_timeseries_saves_image_and_dump() {
        let temp_dir = TempDir::new().unwrap();
        let timestamps: Vec<f64> = (0..300).map(|i| ((i * 37) % 1000) as f64).collect();
        let highlight: Vec<f64> = (0..40).map(|i| 400.0 + i as f64).collect();

        let hist = draw_timeseries(
            &timestamps,
            &highlight,
            &TimeBins::Auto,
            temp_dir.path(),
            Some("ts.png"),
            Some("ts.json"),
        )
        .unwrap();

        let image = temp_dir.path().join("ts.png");
        assert!(image.exists());
        assert!(std::fs::metadata(&image).unwrap().len() > 1000);

        let dumped: TimeSeriesHistogram =
            serde_json::from_str(&std::fs::read_to_string(temp_dir.path().join("ts.json")).unwrap())
                .unwrap();
        assert_eq!(dumped, hist);
        assert_eq!(hist.series.total(), 300);
    }

    #[test]
    fn test_draw_timeseries_without_outputs_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        draw_timeseries(&[1.0, 2.0, 3.0], &[], &TimeBins::Count(2), temp_dir.path(), None, None)
            .unwrap();
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_user_time_series() {
        let series = user_time_series(&[10, 0, 5, 12], 5).unwrap();
        assert_eq!(series.start, 0);
        assert_eq!(series.counts, vec![1, 1, 2]);
        assert_eq!(series.centers, vec![2, 7, 12]);
    }

    #[test]
    fn test_user_time_series_single_window() {
        let series = user_time_series(&[100, 100], 60).unwrap();
        assert_eq!(series.counts, vec![2]);
        assert_eq!(series.centers, vec![130]);
    }

    #[test]
    fn test_user_time_series_rejects_bad_input() {
        assert!(user_time_series(&[1, 2], 0).is_err());
        assert!(user_time_series(&[], 10).is_err());
    }

    #[test]
    fn test_user_time_series_wide_span() {
        let err = user_time_series(&[i64::MIN, i64::MAX], 1).unwrap_err();
        assert_eq!(err.field(), Some("window"));

        // fits in i64 but needs far too many windows
        let err = user_time_series(&[0, 1_700_000_000_000], 1).unwrap_err();
        assert_eq!(err.field(), Some("window"));

        // a center past i64::MAX
        assert!(user_time_series(&[i64::MAX - 1, i64::MAX], 10).is_err());

        let series = user_time_series(&[-10, 10], i64::MAX).unwrap();
        assert_eq!(series.counts, vec![2]);
        assert_eq!(series.centers, vec![-10 + i64::MAX / 2]);
    }
}
