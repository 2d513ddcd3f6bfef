//! Hexagonal binning
//!
//! Points are binned in display space on two interleaved rectangular
//! lattices: lattice 1 has cell centers at integer multiples of the cell
//! size, lattice 2 is shifted by half a cell on both axes. Each point goes
//! to whichever of its two candidate centers is closer under the metric
//! `dx^2 + 3 dy^2`, which yields hexagonal cells.

use crate::colormap::ColorMap;
use crate::filter::retain_for_scales;
use crate::renderer::{draw_colorbar, padded_range, split_colorbar, PlotRenderer};
use crate::types::min_max;
use crate::{PlotConfig, PointSet};
use plotters::coord::Shift;
use plotters::prelude::*;
use sdraw_common::{ensure, AxisScale, ColorNorm, DrawError, Result};
use sdraw_config::HexbinSettings;
use std::path::Path;

/// Default figure title
pub const DEFAULT_TITLE: &str = "Hexagon binning points";

/// Default number of hexagons along the x axis
pub const DEFAULT_GRIDSIZE: usize = 200;

/// Vertex offsets of a unit hexagon, scaled by `(sx, sy / 3)`
const HEXAGON: [(f64, f64); 6] = [
    (0.5, -0.5),
    (0.5, 0.5),
    (0.0, 1.0),
    (-0.5, 0.5),
    (-0.5, -0.5),
    (0.0, -1.0),
];

/// One occupied hexagon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexCell {
    /// Center in display space
    pub center: (f64, f64),
    pub count: u64,
}

/// Occupied hexagons of a binned point set
#[derive(Debug, Clone, PartialEq)]
pub struct HexGrid {
    cells: Vec<HexCell>,
    nx: usize,
    ny: usize,
    /// Cell size in display units
    sx: f64,
    sy: f64,
    /// Display-space origin of lattice 1
    origin: (f64, f64),
    x_scale: AxisScale,
    y_scale: AxisScale,
}

/// `(min, max)` of one display axis, optionally padded by `1e-9` of the range
///
/// All values coinciding widens the range to one unit.
fn axis_extent(values: &[f64], pad: bool) -> Result<(f64, f64)> {
    let (lo, hi) = min_max(values).ok_or_else(|| DrawError::validation("no points to bin"))?;
    if hi <= lo {
        return Ok((lo - 0.5, hi + 0.5));
    }
    let padding = if pad { 1e-9 * (hi - lo) } else { 0.0 };
    Ok((lo - padding, hi + padding))
}

impl HexGrid {
    /// Bin `points` into `gridsize` hexagons along x
    ///
    /// Points are first filtered for the axis scales. The y count is
    /// `floor(gridsize / sqrt(3))`, at least one.
    pub fn compute(
        points: &PointSet,
        x_scale: AxisScale,
        y_scale: AxisScale,
        gridsize: usize,
    ) -> Result<Self> {
        ensure!(gridsize > 0, "gridsize must be positive, got {}", gridsize);

        let kept = retain_for_scales(points, x_scale, y_scale);
        ensure!(!kept.is_empty(), "no points left to bin");

        let xs: Vec<f64> = kept.xs().iter().map(|&x| x_scale.to_display(x)).collect();
        let ys: Vec<f64> = kept.ys().iter().map(|&y| y_scale.to_display(y)).collect();

        let nx = gridsize;
        let ny = ((nx as f64 / 3f64.sqrt()).floor() as usize).max(1);
        let (x_min, x_max) = axis_extent(&xs, true)?;
        let (y_min, y_max) = axis_extent(&ys, false)?;
        let sx = (x_max - x_min) / nx as f64;
        let sy = (y_max - y_min) / ny as f64;

        let (nx1, ny1) = (nx + 1, ny + 1);
        let mut lattice1 = vec![0u64; nx1 * ny1];
        let mut lattice2 = vec![0u64; nx * ny];

        for (&x, &y) in xs.iter().zip(&ys) {
            if x.is_nan() || y.is_nan() {
                continue;
            }
            let ix = (x - x_min) / sx;
            let iy = (y - y_min) / sy;
            let (ix1, iy1) = (ix.round(), iy.round());
            let (ix2, iy2) = (ix.floor(), iy.floor());

            let d1 = (ix - ix1).powi(2) + 3.0 * (iy - iy1).powi(2);
            let d2 = (ix - ix2 - 0.5).powi(2) + 3.0 * (iy - iy2 - 0.5).powi(2);

            if d1 < d2 {
                if (0.0..nx1 as f64).contains(&ix1) && (0.0..ny1 as f64).contains(&iy1) {
                    lattice1[ix1 as usize * ny1 + iy1 as usize] += 1;
                }
            } else if (0.0..nx as f64).contains(&ix2) && (0.0..ny as f64).contains(&iy2) {
                lattice2[ix2 as usize * ny + iy2 as usize] += 1;
            }
        }

        let first = lattice1.iter().enumerate().map(|(idx, &count)| {
            let (i, j) = (idx / ny1, idx % ny1);
            HexCell {
                center: (x_min + i as f64 * sx, y_min + j as f64 * sy),
                count,
            }
        });
        let second = lattice2.iter().enumerate().map(|(idx, &count)| {
            let (i, j) = (idx / ny, idx % ny);
            HexCell {
                center: (x_min + (i as f64 + 0.5) * sx, y_min + (j as f64 + 0.5) * sy),
                count,
            }
        });
        let cells: Vec<HexCell> = first.chain(second).filter(|cell| cell.count >= 1).collect();

        tracing::debug!(
            nx,
            ny,
            occupied = cells.len(),
            "Binned {} points into hexagons",
            kept.len()
        );

        Ok(Self {
            cells,
            nx,
            ny,
            sx,
            sy,
            origin: (x_min, y_min),
            x_scale,
            y_scale,
        })
    }

    /// Occupied cells, lattice 1 first, each in x-major order
    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    /// Number of hexagons along x and y
    pub fn dimensions(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Cell size `(sx, sy)` in display units
    pub fn spacing(&self) -> (f64, f64) {
        (self.sx, self.sy)
    }

    /// Number of points that landed in a hexagon
    pub fn total(&self) -> u64 {
        self.cells.iter().map(|c| c.count).sum()
    }

    pub fn max_count(&self) -> u64 {
        self.cells.iter().map(|c| c.count).max().unwrap_or(0)
    }

    pub fn min_count(&self) -> u64 {
        self.cells.iter().map(|c| c.count).min().unwrap_or(0)
    }

    /// Display-space vertices of the hexagon around `cell`
    pub fn hexagon(&self, cell: &HexCell) -> Vec<(f64, f64)> {
        let (cx, cy) = cell.center;
        HEXAGON
            .iter()
            .map(|&(dx, dy)| (cx + dx * self.sx, cy + dy * self.sy / 3.0))
            .collect()
    }

    /// Center of `cell` in data units
    pub fn data_center(&self, cell: &HexCell) -> (f64, f64) {
        (
            self.x_scale.from_display(cell.center.0),
            self.y_scale.from_display(cell.center.1),
        )
    }

    /// Display-space bounds covering every hexagon of the lattice
    fn extent(&self) -> ((f64, f64), (f64, f64)) {
        let (x0, y0) = self.origin;
        (
            (x0 - 0.5 * self.sx, x0 + (self.nx as f64 + 0.5) * self.sx),
            (y0 - self.sy / 3.0, y0 + self.ny as f64 * self.sy + self.sy / 3.0),
        )
    }
}

/// Hexbin plot options
#[derive(Debug, Clone, PartialEq)]
pub struct HexbinPlot {
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
    /// Number of hexagons along the x axis
    pub gridsize: usize,
    pub color_norm: ColorNorm,
}

impl Default for HexbinPlot {
    fn default() -> Self {
        Self {
            x_scale: AxisScale::Log,
            y_scale: AxisScale::Log,
            gridsize: DEFAULT_GRIDSIZE,
            color_norm: ColorNorm::Log,
        }
    }
}

impl HexbinPlot {
    /// Default figure configuration: title `Hexagon binning points`, no axis labels
    pub fn default_config() -> PlotConfig {
        PlotConfig::titled(DEFAULT_TITLE, "", "")
    }

    /// Build options and figure configuration from config file settings
    pub fn from_settings(settings: &HexbinSettings) -> (Self, PlotConfig) {
        let plot = Self {
            x_scale: settings.x_scale,
            y_scale: settings.y_scale,
            gridsize: settings.gridsize,
            color_norm: ColorNorm::from_log_flag(settings.log_color),
        };
        let config = PlotConfig::titled(&settings.title, &settings.x_label, &settings.y_label);
        (plot, config)
    }

    /// Bin `points` with these options
    pub fn compute(&self, points: &PointSet) -> Result<HexGrid> {
        HexGrid::compute(points, self.x_scale, self.y_scale, self.gridsize)
    }

    /// Renderable view of an already binned grid
    pub fn figure<'a>(&self, grid: &'a HexGrid) -> HexbinFigure<'a> {
        HexbinFigure {
            grid,
            color_norm: self.color_norm,
        }
    }

    /// Bin `points` and write the image when `outfig` is given
    pub fn draw(
        &self,
        points: &PointSet,
        outfig: Option<&Path>,
        config: &PlotConfig,
    ) -> Result<HexGrid> {
        let grid = self.compute(points)?;
        if let Some(path) = outfig {
            self.figure(&grid).render_to_file(config, path)?;
        }
        Ok(grid)
    }
}

/// A binned hexagon grid ready to be drawn
#[derive(Debug, Clone, Copy)]
pub struct HexbinFigure<'a> {
    grid: &'a HexGrid,
    color_norm: ColorNorm,
}

impl PlotRenderer for HexbinFigure<'_> {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        config: &PlotConfig,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let grid = self.grid;
        let (plot_area, bar_area) = split_colorbar(root, config);
        let ((x_lo, x_hi), (y_lo, y_hi)) = grid.extent();
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
            .build_cartesian_2d(padded_range(x_lo, x_hi), padded_range(y_lo, y_hi))?;

        self.draw_axes(&mut chart, config, grid.x_scale, grid.y_scale)?;

        let vmin = grid.min_count() as f64;
        let vmax = grid.max_count() as f64;
        let colormap: ColorMap = config.style.colormap;
        chart.draw_series(grid.cells().iter().map(|cell| {
            let t = self.color_norm.normalize(cell.count as f64, vmin, vmax);
            Polygon::new(grid.hexagon(cell), colormap.color_at(t).filled())
        }))?;

        draw_colorbar(&bar_area, colormap, self.color_norm, vmin, vmax)?;
        Ok(())
    }
}

/// Hexbin `xs` against `ys` with `options`, writing the image when `outfig` is given
///
/// `config` carries the title and axis labels, see [`HexbinPlot::default_config`].
pub fn draw_hexbin(
    xs: &[f64],
    ys: &[f64],
    outfig: Option<&Path>,
    options: &HexbinPlot,
    config: &PlotConfig,
) -> Result<HexGrid> {
    let points = PointSet::from_slices(xs, ys)?;
    options.draw(&points, outfig, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn linear(gridsize: usize) -> HexbinPlot {
        HexbinPlot {
            x_scale: AxisScale::Linear,
            y_scale: AxisScale::Linear,
            gridsize,
            color_norm: ColorNorm::Linear,
        }
    }

    #[test]
    fn test_defaults() {
        let plot = HexbinPlot::default();
        assert_eq!(plot.x_scale, AxisScale::Log);
        assert_eq!(plot.y_scale, AxisScale::Log);
        assert_eq!(plot.gridsize, 200);
        assert_eq!(plot.color_norm, ColorNorm::Log);

        let config = HexbinPlot::default_config();
        assert_eq!(config.title, "Hexagon binning points");
        assert!(config.x_label.is_none());
    }

    #[test]
    fn test_every_point_lands_in_a_cell() {
        let xs: Vec<f64> = (0..50).map(|i| i as f64 * 0.37 % 5.0).collect();
        let ys: Vec<f64> = (0..50).map(|i| i as f64 * 0.73 % 3.0).collect();
        let points = PointSet::new(xs, ys).unwrap();

        let grid = linear(10).compute(&points).unwrap();
        assert_eq!(grid.total(), 50);
        assert_eq!(grid.dimensions(), (10, 5));
        assert!(grid.cells().iter().all(|c| c.count >= 1));
    }

    #[test]
    fn test_lattice_assignment() {
        // range [0, 4] x [0, 2] with nx = 4, ny = 2 gives unit cells
        let points = PointSet::new(
            vec![0.0, 4.0, 0.5, 1.0, 1.5],
            vec![0.0, 2.0, 0.5, 1.0, 0.5],
        )
        .unwrap();
        let grid = linear(4).compute(&points).unwrap();
        let (sx, sy) = grid.spacing();
        assert!((sx - 1.0).abs() < 1e-6);
        assert!((sy - 1.0).abs() < 1e-6);

        let near = |x: f64, y: f64| {
            grid.cells()
                .iter()
                .find(|c| (c.center.0 - x).abs() < 1e-6 && (c.center.1 - y).abs() < 1e-6)
                .map(|c| c.count)
        };
        // corners sit on lattice 1
        assert_eq!(near(0.0, 0.0), Some(1));
        assert_eq!(near(4.0, 2.0), Some(1));
        // (0.5, 0.5) and (1.5, 0.5) are lattice 2 centers
        assert_eq!(near(0.5, 0.5), Some(1));
        assert_eq!(near(1.5, 0.5), Some(1));
        assert_eq!(near(1.0, 1.0), Some(1));
        assert_eq!(grid.total(), 5);
    }

    #[test]
    fn test_log_scales_filter_and_transform() {
        let points = PointSet::new(vec![1.0, 10.0, 100.0, -1.0], vec![1.0, 10.0, 100.0, 5.0]).unwrap();
        let plot = HexbinPlot {
            gridsize: 4,
            ..HexbinPlot::default()
        };
        let grid = plot.compute(&points).unwrap();
        assert_eq!(grid.total(), 3);

        let top = grid
            .cells()
            .iter()
            .max_by(|a, b| a.center.0.total_cmp(&b.center.0))
            .unwrap();
        let (x, _) = grid.data_center(top);
        assert!((x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_hexagon_vertices() {
        let points = PointSet::new(vec![0.0, 4.0], vec![0.0, 2.0]).unwrap();
        let grid = linear(4).compute(&points).unwrap();
        let cell = HexCell {
            center: (1.0, 1.0),
            count: 1,
        };
        let hexagon = grid.hexagon(&cell);
        assert_eq!(hexagon.len(), 6);
        assert!((hexagon[2].1 - (1.0 + 1.0 / 3.0)).abs() < 1e-6);
        assert!((hexagon[0].0 - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_bad_input() {
        let points = PointSet::new(vec![1.0], vec![1.0]).unwrap();
        assert!(linear(0).compute(&points).is_err());

        let negative = PointSet::new(vec![-1.0], vec![-1.0]).unwrap();
        assert!(HexbinPlot::default().compute(&negative).is_err());
    }

    #[test]
    fn test_single_point_grid() {
        let points = PointSet::new(vec![3.0], vec![3.0]).unwrap();
        let grid = linear(5).compute(&points).unwrap();
        assert_eq!(grid.total(), 1);
    }

    #[test]
    fn test_draw_hexbin_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("hexbin.png");

        let xs: Vec<f64> = (1..400).map(|i| (i as f64).powf(1.3)).collect();
        let ys: Vec<f64> = (1..400).map(|i| ((i * 7919) % 1000 + 1) as f64).collect();
        let options = HexbinPlot {
            gridsize: 30,
            ..HexbinPlot::default()
        };
        let grid = draw_hexbin(&xs, &ys, Some(&path), &options, &HexbinPlot::default_config())
            .unwrap();

        assert_eq!(grid.total(), 399);
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 1000);
    }
}
