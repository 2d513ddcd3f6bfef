//! Bin edges and histogram counting for one and two dimensions
//!
//! A value `v` falls into bin `i` when `edges[i] <= v < edges[i + 1]`, with
//! the last bin also closed on the right. Values outside the outer edges are
//! not counted.

use crate::types::min_max;
use crate::PointSet;
use ndarray::Array2;
use sdraw_common::{ensure, AxisScale, DrawError, Result, TimeBins};
use serde::{Deserialize, Serialize};

/// Largest number of bins a single axis or series may ask for
pub const MAX_BINS: usize = 4_000_000;

fn too_many_bins(bins: f64) -> DrawError {
    DrawError::validation_field(
        format!("{bins} bins requested, at most {MAX_BINS} are allowed"),
        "bins",
    )
}

/// `bins + 1` evenly spaced edges over `[min, max]`
///
/// A zero-width range is widened to `[min - 0.5, max + 0.5]`.
pub fn linear_edges(min: f64, max: f64, bins: usize) -> Result<Vec<f64>> {
    ensure!(bins > 0, "number of bins must be positive");
    if bins > MAX_BINS {
        return Err(too_many_bins(bins as f64));
    }
    ensure!(
        min.is_finite() && max.is_finite() && min <= max,
        "invalid bin range [{}, {}]",
        min,
        max
    );

    let (lo, hi) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let step = (hi - lo) / bins as f64;
    Ok((0..=bins)
        .map(|i| if i == bins { hi } else { lo + step * i as f64 })
        .collect())
}

/// `count` edges evenly spaced in log10 space from `1` to `10^ceil(log10(max))`
///
/// When `max <= 1` the upper edge is raised to `10` so edges keep increasing.
pub fn log_edges(max: f64, count: usize) -> Result<Vec<f64>> {
    ensure!(
        count >= 2,
        "log-spaced binning needs at least two edges, got {}",
        count
    );
    ensure!(
        max.is_finite() && max > 0.0,
        "log-spaced binning needs a positive maximum, got {}",
        max
    );

    let mut upper = max.log10().ceil();
    if upper <= 0.0 {
        upper = 1.0;
    }
    let step = upper / (count - 1) as f64;
    Ok((0..count)
        .map(|i| {
            if i == count - 1 {
                10f64.powf(upper)
            } else {
                10f64.powf(step * i as f64)
            }
        })
        .collect())
}

/// Edges for one axis: log-spaced edges for a log scale, linear bins otherwise
pub fn axis_edges(values: &[f64], scale: AxisScale, bins: usize) -> Result<Vec<f64>> {
    let (min, max) = min_max(values)
        .ok_or_else(|| DrawError::validation("cannot derive bin edges from an empty axis"))?;
    match scale {
        AxisScale::Log => log_edges(max, bins),
        AxisScale::Linear => linear_edges(min, max, bins),
    }
}

/// Index of the bin containing `value`, `None` when it lies outside the edges
pub fn locate_bin(edges: &[f64], value: f64) -> Option<usize> {
    let n = edges.len();
    if n < 2 || value.is_nan() || value < edges[0] || value > edges[n - 1] {
        return None;
    }
    if value == edges[n - 1] {
        return Some(n - 2);
    }
    Some(edges.partition_point(|&e| e <= value) - 1)
}

fn check_edges(edges: &[f64], axis: &str) -> Result<()> {
    if edges.len() < 2 {
        return Err(DrawError::validation_field(
            format!("{axis} edges need at least two values"),
            axis,
        ));
    }
    if edges.windows(2).any(|w| !(w[0] < w[1])) {
        return Err(DrawError::validation_field(
            format!("{axis} edges must increase monotonically"),
            axis,
        ));
    }
    Ok(())
}

/// Two-dimensional histogram: counts indexed `[x_bin, y_bin]` plus bin edges
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram2d {
    counts: Array2<u64>,
    x_edges: Vec<f64>,
    y_edges: Vec<f64>,
}

impl Histogram2d {
    /// Counts `points` into the grid spanned by the given edges
    pub fn compute(points: &PointSet, x_edges: Vec<f64>, y_edges: Vec<f64>) -> Result<Self> {
        check_edges(&x_edges, "x_edges")?;
        check_edges(&y_edges, "y_edges")?;

        let mut counts = Array2::<u64>::zeros((x_edges.len() - 1, y_edges.len() - 1));
        for (x, y) in points.iter() {
            if let (Some(i), Some(j)) = (locate_bin(&x_edges, x), locate_bin(&y_edges, y)) {
                counts[[i, j]] += 1;
            }
        }

        Ok(Self {
            counts,
            x_edges,
            y_edges,
        })
    }

    /// Bin counts, rows are x bins and columns are y bins
    pub fn counts(&self) -> &Array2<u64> {
        &self.counts
    }

    pub fn x_edges(&self) -> &[f64] {
        &self.x_edges
    }

    pub fn y_edges(&self) -> &[f64] {
        &self.y_edges
    }

    /// Number of bins as `(x, y)`
    pub fn shape(&self) -> (usize, usize) {
        self.counts.dim()
    }

    /// Count of bin `(i, j)`
    pub fn count(&self, i: usize, j: usize) -> u64 {
        self.counts[[i, j]]
    }

    /// Number of points that landed inside the grid
    pub fn total(&self) -> u64 {
        self.counts.sum()
    }

    /// Largest bin count, zero for an empty grid
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Smallest non-zero bin count, `None` when every bin is empty
    pub fn min_positive_count(&self) -> Option<u64> {
        self.counts.iter().copied().filter(|&c| c > 0).min()
    }

    /// `((i, j), count)` for every bin holding at least one point
    pub fn nonzero_bins(&self) -> impl Iterator<Item = ((usize, usize), u64)> + '_ {
        self.counts
            .indexed_iter()
            .filter(|(_, c)| **c > 0)
            .map(|(idx, &c)| (idx, c))
    }

    /// `[lo, hi]` of x bin `i`
    pub fn x_bin_range(&self, i: usize) -> (f64, f64) {
        (self.x_edges[i], self.x_edges[i + 1])
    }

    /// `[lo, hi]` of y bin `j`
    pub fn y_bin_range(&self, j: usize) -> (f64, f64) {
        (self.y_edges[j], self.y_edges[j + 1])
    }
}

/// One-dimensional histogram with its edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram1d {
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram1d {
    /// Bins `values` following `bins`; NaN values are ignored
    pub fn compute(values: &[f64], bins: &TimeBins) -> Result<Self> {
        bins.validate()?;
        let edges = match bins {
            TimeBins::Edges(edges) => edges.clone(),
            TimeBins::Count(n) => {
                let (min, max) = min_max(values).ok_or_else(|| {
                    DrawError::validation("cannot bin an empty series without explicit edges")
                })?;
                linear_edges(min, max, *n)?
            }
            TimeBins::Auto => auto_edges(values)?,
        };
        Self::with_edges(values, edges)
    }

    /// Bins `values` into the given edges
    pub fn with_edges(values: &[f64], edges: Vec<f64>) -> Result<Self> {
        check_edges(&edges, "edges")?;
        let mut counts = vec![0u64; edges.len() - 1];
        for &v in values {
            if let Some(i) = locate_bin(&edges, v) {
                counts[i] += 1;
            }
        }
        Ok(Self { edges, counts })
    }

    /// Number of values that landed inside the edges
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(edge, count)` pairs with a leading zero count at the first edge
    ///
    /// Drawing these as a line gives a step-free outline where each count
    /// sits at the right edge of its bin.
    pub fn outline(&self) -> Vec<(f64, f64)> {
        self.edges
            .iter()
            .copied()
            .zip(std::iter::once(0.0).chain(self.counts.iter().map(|&c| c as f64)))
            .collect()
    }
}

/// Edges chosen by the "auto" rule
///
/// The bin width is the smaller of the Freedman-Diaconis and Sturges
/// estimates, or Sturges alone when the interquartile range is zero.
pub fn auto_edges(values: &[f64]) -> Result<Vec<f64>> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    ensure!(!sorted.is_empty(), "cannot bin an empty series");
    sorted.sort_by(f64::total_cmp);

    let first = sorted[0];
    let last = sorted[sorted.len() - 1];
    let range = last - first;
    if range <= 0.0 {
        return linear_edges(first, last, 1);
    }

    let n = sorted.len() as f64;
    let sturges = range / (n.log2() + 1.0);
    let iqr = percentile(&sorted, 0.75) - percentile(&sorted, 0.25);
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);
    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };
    let bins = (range / width).ceil();
    if !(bins <= MAX_BINS as f64) {
        return Err(too_many_bins(bins));
    }
    let bins = (bins as usize).max(1);

    tracing::debug!(bins, sturges, fd, "auto binning of {} values", sorted.len());
    linear_edges(first, last, bins)
}

/// Linear-interpolated percentile of sorted data, `q` in `[0, 1]`
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
