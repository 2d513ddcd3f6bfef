//! Integration tests for sdraw-plots crate.
//!
//! These tests render every plot kind to disk and check the binning
//! invariants on generated point clouds.

use proptest::prelude::*;
use sdraw_common::test_utils::{create_temp_dir, init_test_logging, point_fixtures};
use sdraw_config::DrawConfig;
use sdraw_plots::binning::Histogram2d;
use sdraw_plots::{
    draw_hexbin, draw_rectbin, draw_timeseries, retain_for_scales, user_time_series, AxisScale,
    GridSize, HexbinPlot, PlotConfig, PlotRenderer, PointSet, RectHistogram, ScatterPlot, TimeBins,
    TimeSeriesPlot,
};

#[test]
fn test_hexbin_renders_log_cloud() {
    init_test_logging();
    let temp_dir = create_temp_dir();
    let path = temp_dir.path().join("cloud_hexbin.png");

    let (xs, ys) = point_fixtures::log_uniform_cloud(2000, 4.0, 7);
    let options = HexbinPlot {
        gridsize: 50,
        ..HexbinPlot::default()
    };
    let config = PlotConfig::titled("latency against size", "bytes", "ms");
    let grid = draw_hexbin(&xs, &ys, Some(&path), &options, &config).unwrap();

    assert_eq!(grid.total(), 2000);
    assert!(grid.max_count() >= grid.min_count());
    assert_eq!(image::image_dimensions(&path).unwrap(), (800, 600));
}

#[test]
fn test_rectbin_and_peak_search() {
    init_test_logging();
    let temp_dir = create_temp_dir();
    let path = temp_dir.path().join("cloud_rectbin.png");

    let (xs, ys) = point_fixtures::log_uniform_cloud(3000, 3.0, 11);
    let options = RectHistogram::new(AxisScale::Log, AxisScale::Log, 30usize);
    let hist = draw_rectbin(&xs, &ys, Some(&path), &options, &RectHistogram::default_config())
        .unwrap();
    assert_eq!(image::image_dimensions(&path).unwrap(), (800, 600));

    let points = PointSet::new(xs, ys).unwrap();
    let peak = options
        .find_peak_rect(&points, &hist, 30.0, 30.0, 20.0)
        .unwrap();

    assert!(peak.count > 0);
    assert!(peak.points.len() as u64 >= peak.count);
    for (x, y) in peak.points.iter() {
        assert!(peak.x_range.0 <= x && x <= peak.x_range.1);
        assert!(peak.y_range.0 <= y && y <= peak.y_range.1);
    }
}

#[test]
fn test_render_to_bytes_for_every_plot_kind() {
    let (xs, ys) = point_fixtures::uniform_square(500, 1.0, 50.0, 3);
    let points = PointSet::new(xs.clone(), ys).unwrap();
    let config = PlotConfig {
        width: 320,
        height: 240,
        ..ScatterPlot::default_config()
    };
    let expected = 320 * 240 * 3;

    let scatter = ScatterPlot::new(points.clone());
    assert_eq!(scatter.render_to_bytes(&config).unwrap().len(), expected);

    let hexbin = HexbinPlot {
        gridsize: 20,
        ..HexbinPlot::default()
    };
    let grid = hexbin.compute(&points).unwrap();
    assert_eq!(hexbin.figure(&grid).render_to_bytes(&config).unwrap().len(), expected);

    let rectbin = RectHistogram::new(AxisScale::Linear, AxisScale::Linear, 15usize);
    let hist = rectbin.compute(&points).unwrap();
    assert_eq!(rectbin.figure(&hist).render_to_bytes(&config).unwrap().len(), expected);

    let series = TimeSeriesPlot::new(xs);
    assert_eq!(series.render_to_bytes(&config).unwrap().len(), expected);
}

#[test]
fn test_plots_from_default_config() {
    let temp_dir = create_temp_dir();
    let mut draw_config = DrawConfig::default();
    draw_config.output.directory = temp_dir.path().to_path_buf();
    draw_config.output.width = 640;
    draw_config.output.height = 480;
    draw_config.rectbin.gridsize = GridSize::Uniform(20);

    let (xs, ys) = point_fixtures::log_uniform_cloud(800, 3.0, 5);
    let points = PointSet::new(xs, ys).unwrap();

    let (scatter, config) = ScatterPlot::from_settings(points.clone(), &draw_config.scatter);
    let path = draw_config.output.path_for("scatter.png");
    scatter
        .render_to_file(&config.with_output(&draw_config.output), &path)
        .unwrap();
    assert_eq!(image::image_dimensions(&path).unwrap(), (640, 480));

    let (rectbin, config) = RectHistogram::from_settings(&draw_config.rectbin);
    let path = draw_config.output.path_for("rectbin.png");
    let hist = rectbin
        .draw(&points, Some(&path), &config.with_output(&draw_config.output))
        .unwrap();
    assert_eq!(hist.shape(), (19, 19));
    assert!(path.exists());
}

#[test]
fn test_bursty_timeseries() {
    let temp_dir = create_temp_dir();
    let start = 1_700_000_000;
    let timestamps = point_fixtures::bursty_timestamps(500, 200, start, 86_400, 42);
    let burst: Vec<f64> = timestamps[500..].iter().map(|&t| t as f64).collect();
    let all: Vec<f64> = timestamps.iter().map(|&t| t as f64).collect();

    let hist = draw_timeseries(
        &all,
        &burst,
        &TimeBins::Count(24),
        temp_dir.path(),
        Some("timeseries.png"),
        Some("timeseries.json"),
    )
    .unwrap();

    assert_eq!(hist.series.total(), 700);
    assert_eq!(hist.highlight.as_ref().unwrap().total(), 200);
    // the burst sits in the first tenth of the day
    assert!(hist.series.counts[0] > hist.series.counts[12]);
    assert!(temp_dir.path().join("timeseries.json").exists());

    let windowed = user_time_series(&timestamps, 3600).unwrap();
    assert_eq!(windowed.counts.iter().sum::<u64>(), 700);
    assert_eq!(windowed.counts.len(), windowed.centers.len());
}

proptest! {
    #[test]
    fn prop_log_filter_drops_nonpositive(
        pairs in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 0..200),
        x_log in any::<bool>(),
        y_log in any::<bool>(),
    ) {
        let points: PointSet = pairs.into_iter().collect();
        let scale = |log: bool| if log { AxisScale::Log } else { AxisScale::Linear };
        let kept = retain_for_scales(&points, scale(x_log), scale(y_log));

        prop_assert!(kept.len() <= points.len());
        prop_assert_eq!(kept.xs().len(), kept.ys().len());
        if x_log {
            prop_assert!(kept.xs().iter().all(|&x| x > 0.0));
        }
        if y_log {
            prop_assert!(kept.ys().iter().all(|&y| y > 0.0));
        }
    }

    #[test]
    fn prop_peak_points_lie_inside_bin(
        pairs in prop::collection::vec((0.1f64..1000.0, 0.1f64..1000.0), 2..300),
        gridsize in 2usize..20,
        log in any::<bool>(),
        qx in 0.1f64..1000.0,
        qy in 0.1f64..1000.0,
        radius in 0.0f64..800.0,
    ) {
        let points: PointSet = pairs.into_iter().collect();
        let scale = if log { AxisScale::Log } else { AxisScale::Linear };
        let options = RectHistogram::new(scale, scale, gridsize);
        let hist = options.compute(&points).unwrap();

        if let Ok(peak) = options.find_peak_rect(&points, &hist, qx, qy, radius) {
            prop_assert!(peak.points.len() as u64 >= peak.count);
            for (x, y) in peak.points.iter() {
                prop_assert!(peak.x_range.0 <= x && x <= peak.x_range.1);
                prop_assert!(peak.y_range.0 <= y && y <= peak.y_range.1);
            }
        }
    }

    #[test]
    fn prop_histogram_counts_points_inside_edges(
        pairs in prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 1..300),
        nx in 1usize..25,
        ny in 1usize..25,
    ) {
        let points: PointSet = pairs.into_iter().collect();
        let options = RectHistogram::new(AxisScale::Linear, AxisScale::Linear, (nx, ny));
        let hist: Histogram2d = options.compute(&points).unwrap();

        prop_assert!(hist.x_edges().windows(2).all(|w| w[0] < w[1]));
        prop_assert!(hist.y_edges().windows(2).all(|w| w[0] < w[1]));

        let (x_lo, x_hi) = (hist.x_edges()[0], hist.x_edges()[nx]);
        let (y_lo, y_hi) = (hist.y_edges()[0], hist.y_edges()[ny]);
        let inside = points
            .iter()
            .filter(|&(x, y)| x_lo <= x && x <= x_hi && y_lo <= y && y <= y_hi)
            .count() as u64;
        prop_assert_eq!(hist.total(), inside);
    }
}
