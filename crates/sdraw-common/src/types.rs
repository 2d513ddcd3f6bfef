//! Plot option types shared across the sdraw workspace

use crate::{DrawError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scale of a plot axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    /// Values are drawn as they are
    #[default]
    Linear,
    /// Values are drawn on a base-10 logarithmic axis
    Log,
}

impl AxisScale {
    /// Whether this is a logarithmic scale
    pub fn is_log(self) -> bool {
        matches!(self, Self::Log)
    }

    /// Map a data value into the space the chart is drawn in
    pub fn to_display(self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Log => value.log10(),
        }
    }

    /// Map a display-space value back to a data value
    pub fn from_display(self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Log => 10f64.powf(value),
        }
    }
}

impl fmt::Display for AxisScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Log => write!(f, "log"),
        }
    }
}

impl FromStr for AxisScale {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "log" => Ok(Self::Log),
            other => Err(DrawError::validation(format!(
                "unknown axis scale '{other}', expected 'linear' or 'log'"
            ))),
        }
    }
}

/// Number of bins along each axis
///
/// Serialized as a plain integer (`100`) or a two element array (`[100, 50]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridSize {
    /// The same number of bins on both axes
    Uniform(usize),
    /// Separate bin counts for the x and y axes
    PerAxis(usize, usize),
}

impl GridSize {
    /// Bin counts as `(x, y)`
    pub fn per_axis(self) -> (usize, usize) {
        match self {
            Self::Uniform(n) => (n, n),
            Self::PerAxis(nx, ny) => (nx, ny),
        }
    }

    /// Returns an error if either axis has zero bins
    pub fn validate(self) -> Result<()> {
        let (nx, ny) = self.per_axis();
        if nx == 0 || ny == 0 {
            return Err(DrawError::validation_field(
                format!("gridsize must be positive on both axes, got ({nx}, {ny})"),
                "gridsize",
            ));
        }
        Ok(())
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::Uniform(100)
    }
}

impl From<usize> for GridSize {
    fn from(n: usize) -> Self {
        Self::Uniform(n)
    }
}

impl From<(usize, usize)> for GridSize {
    fn from((nx, ny): (usize, usize)) -> Self {
        Self::PerAxis(nx, ny)
    }
}

/// Mapping from bin counts to color intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorNorm {
    /// Counts map linearly onto the colormap
    Linear,
    /// Counts map onto the colormap in log10 space
    #[default]
    Log,
}

impl ColorNorm {
    /// Build from the "log color scale" flag used throughout the plot options
    pub fn from_log_flag(log_color: bool) -> Self {
        if log_color {
            Self::Log
        } else {
            Self::Linear
        }
    }

    /// Normalize `value` into `[0, 1]` relative to `[vmin, vmax]`
    ///
    /// Degenerate ranges map to `0.0`. Log normalization expects positive
    /// bounds; bins with a zero count are never colored.
    pub fn normalize(self, value: f64, vmin: f64, vmax: f64) -> f64 {
        let (v, lo, hi) = match self {
            Self::Linear => (value, vmin, vmax),
            Self::Log => (value.log10(), vmin.log10(), vmax.log10()),
        };
        if !(hi - lo).is_finite() || hi <= lo {
            return 0.0;
        }
        ((v - lo) / (hi - lo)).clamp(0.0, 1.0)
    }

    /// Label used for the colorbar axis
    pub fn colorbar_label(self) -> &'static str {
        match self {
            Self::Linear => "counts",
            Self::Log => "log10(N)",
        }
    }

    /// Suffix appended to plot titles
    pub fn title_suffix(self) -> &'static str {
        match self {
            Self::Linear => "",
            Self::Log => " with a log color scale",
        }
    }
}

/// Binning rule for one-dimensional (time series) histograms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeBins {
    /// Pick the bin width from the data (smaller of Freedman-Diaconis and Sturges)
    #[default]
    Auto,
    /// A fixed number of equal-width bins over the data range
    Count(usize),
    /// Explicit, strictly increasing bin edges
    Edges(Vec<f64>),
}

impl TimeBins {
    /// Returns an error for zero bin counts or malformed explicit edges
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Auto => Ok(()),
            Self::Count(0) => Err(DrawError::validation_field(
                "time series bin count must be positive",
                "bins",
            )),
            Self::Count(_) => Ok(()),
            Self::Edges(edges) => {
                if edges.len() < 2 {
                    return Err(DrawError::validation_field(
                        "explicit bin edges need at least two values",
                        "bins",
                    ));
                }
                if edges.windows(2).any(|w| !(w[0] < w[1])) {
                    return Err(DrawError::validation_field(
                        "explicit bin edges must increase monotonically",
                        "bins",
                    ));
                }
                Ok(())
            }
        }
    }
}
