//! Plot rendering trait and shared drawing helpers

use crate::colormap::ColorMap;
use crate::{ColorScheme, PlotConfig};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use sdraw_common::{AxisScale, ColorNorm, Result};
use std::ops::Range;
use std::path::Path;

/// Chart context every plot in this crate draws into
pub type Chart2d<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Trait for plots that can be drawn onto any plotters backend
pub trait PlotRenderer {
    /// Draw the plot onto an already styled drawing area
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        config: &PlotConfig,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static;

    /// Render to an image file, the format follows the file extension
    fn render_to_file(&self, config: &PlotConfig, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        self.apply_styling(&root, config)?;
        self.draw(&root, config)?;
        root.present()?;

        tracing::info!("Successfully rendered {:?} to {}", config.title, path.display());
        Ok(())
    }

    /// Render into a raw RGB buffer of `width * height * 3` bytes
    fn render_to_bytes(&self, config: &PlotConfig) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; config.width as usize * config.height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (config.width, config.height))
                .into_drawing_area();
            self.apply_styling(&root, config)?;
            self.draw(&root, config)?;
            root.present()?;
        }

        tracing::debug!(bytes = buffer.len(), "Rendered {:?} to memory", config.title);
        Ok(buffer)
    }

    /// Fill the background
    fn apply_styling<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        config: &PlotConfig,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let bg_color = self.get_background_color(config);
        root.fill(&bg_color)?;
        Ok(())
    }

    /// Get colors from color scheme
    fn get_colors(&self, scheme: &ColorScheme) -> Vec<RGBColor> {
        match scheme {
            ColorScheme::Default => vec![
                RGBColor(31, 119, 180),  // Blue
                RGBColor(214, 39, 40),   // Red
                RGBColor(255, 127, 14),  // Orange
                RGBColor(44, 160, 44),   // Green
                RGBColor(148, 103, 189), // Purple
            ],
            ColorScheme::Dark => vec![
                RGBColor(55, 126, 184),  // Light Blue
                RGBColor(255, 152, 150), // Light Red
                RGBColor(255, 187, 120), // Light Orange
                RGBColor(77, 175, 74),   // Light Green
            ],
            ColorScheme::Monochrome => vec![
                RGBColor(0, 0, 0),
                RGBColor(64, 64, 64),
                RGBColor(128, 128, 128),
            ],
            ColorScheme::Custom(colors) => colors
                .iter()
                .map(|color_str| self.parse_color(color_str))
                .collect(),
        }
    }

    /// Parse a color string (hex format) to RGBColor
    fn parse_color(&self, color_str: &str) -> RGBColor {
        if let Some(hex) = color_str.strip_prefix('#') {
            if hex.len() == 6 && hex.is_ascii() {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return RGBColor(r, g, b);
                }
            }
        }
        // Default to black if parsing fails
        RGBColor(0, 0, 0)
    }

    /// Get background color from style config
    fn get_background_color(&self, config: &PlotConfig) -> RGBColor {
        config
            .style
            .background_color
            .as_ref()
            .map(|color| self.parse_color(color))
            .unwrap_or(RGBColor(255, 255, 255))
    }

    /// Draw axes, labels and grid with ticks labelled in data units
    fn draw_axes<DB: DrawingBackend>(
        &self,
        chart: &mut Chart2d<'_, DB>,
        config: &PlotConfig,
        x_scale: AxisScale,
        y_scale: AxisScale,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let x_fmt = |v: &f64| format_axis_tick(x_scale, *v);
        let y_fmt = |v: &f64| format_axis_tick(y_scale, *v);
        self.draw_mesh(chart, config, &x_fmt, &y_fmt)
    }

    /// Draw axes, labels and grid with the given tick label formatters
    fn draw_mesh<DB: DrawingBackend>(
        &self,
        chart: &mut Chart2d<'_, DB>,
        config: &PlotConfig,
        x_fmt: &dyn Fn(&f64) -> String,
        y_fmt: &dyn Fn(&f64) -> String,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let axis_font = (
            config.style.axis_font.family.as_str(),
            config.style.axis_font.size,
        );

        let mut mesh = chart.configure_mesh();
        mesh.x_label_formatter(x_fmt)
            .y_label_formatter(y_fmt)
            .label_style(axis_font)
            .axis_desc_style(axis_font);

        if let Some(x_label) = &config.x_label {
            mesh.x_desc(x_label);
        }
        if let Some(y_label) = &config.y_label {
            mesh.y_desc(y_label);
        }

        if let Some(grid_color) = &config.style.grid.color {
            mesh.light_line_style(self.parse_color(grid_color));
        }

        if config.style.grid.show_x && config.style.grid.show_y {
            mesh.draw()?;
        } else if config.style.grid.show_x {
            mesh.disable_y_mesh().draw()?;
        } else if config.style.grid.show_y {
            mesh.disable_x_mesh().draw()?;
        } else {
            mesh.disable_mesh().draw()?;
        }
        Ok(())
    }
}

/// Tick label for a display-space coordinate
pub fn format_axis_tick(scale: AxisScale, display_value: f64) -> String {
    format_number(scale.from_display(display_value))
}

/// Compact number formatting for tick labels
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !(1e-3..1e5).contains(&magnitude) {
        return format!("{value:.1e}");
    }
    let text = format!("{value:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Axis range around `[lo, hi]` padded by 5% on each side
///
/// A zero-width or non-finite range becomes a unit range around `lo`.
pub fn padded_range(lo: f64, hi: f64) -> Range<f64> {
    if !(lo.is_finite() && hi.is_finite()) {
        return 0.0..1.0;
    }
    if hi <= lo {
        return (lo - 0.5)..(lo + 0.5);
    }
    let padding = (hi - lo) * 0.05;
    (lo - padding)..(hi + padding)
}

/// Padded x and y ranges enclosing `points`, unit ranges when empty
pub fn padded_bounds(points: &[(f64, f64)]) -> (Range<f64>, Range<f64>) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    (padded_range(x_min, x_max), padded_range(y_min, y_max))
}

/// Split off a colorbar strip on the right of `root`
pub fn split_colorbar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    config: &PlotConfig,
) -> (DrawingArea<DB, Shift>, DrawingArea<DB, Shift>) {
    let (width, _) = root.dim_in_pixel();
    let bar = config.style.colorbar_width.min(width / 2);
    root.split_horizontally((width - bar) as i32)
}

/// Draw a vertical colorbar for counts in `[vmin, vmax]`
pub fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    colormap: ColorMap,
    norm: ColorNorm,
    vmin: f64,
    vmax: f64,
) -> Result<()>
where
    DB::ErrorType: std::error::Error + Send + Sync + 'static,
{
    let (lo, hi) = match norm {
        ColorNorm::Log => (vmin.max(1.0).log10(), vmax.max(1.0).log10()),
        ColorNorm::Linear => (vmin, vmax),
    };
    let range = if hi > lo { lo..hi } else { lo..lo + 1.0 };

    let mut bar = ChartBuilder::on(area)
        .margin_top(40)
        .margin_bottom(50)
        .margin_right(10)
        .set_label_area_size(LabelAreaPosition::Right, 60)
        .set_label_area_size(LabelAreaPosition::Left, 0)
        .build_cartesian_2d(0.0..1.0, range.clone())?;

    let steps = 100;
    let span = range.end - range.start;
    bar.draw_series((0..steps).map(|i| {
        let y0 = range.start + span * i as f64 / steps as f64;
        let y1 = range.start + span * (i + 1) as f64 / steps as f64;
        let t = (i as f64 + 0.5) / steps as f64;
        Rectangle::new([(0.0, y0), (1.0, y1)], colormap.color_at(t).filled())
    }))?;

    let label_fmt = |v: &f64| match norm {
        ColorNorm::Log => format!("{v:.1}"),
        ColorNorm::Linear => format_number(*v),
    };
    bar.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_x_axis()
        .y_labels(6)
        .y_desc(norm.colorbar_label())
        .y_label_formatter(&label_fmt)
        .draw()?;
    Ok(())
}
