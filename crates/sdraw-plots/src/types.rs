//! Plot configuration and input data types

use crate::colormap::ColorMap;
use sdraw_common::{DrawError, Result};
use serde::{Deserialize, Serialize};

/// Figure configuration shared by every plot kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub style: StyleConfig,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            title: "Plot".to_string(),
            width: 800,
            height: 600,
            x_label: None,
            y_label: None,
            style: StyleConfig::default(),
        }
    }
}

impl PlotConfig {
    /// Config with a title and optional axis labels, empty labels count as unset
    pub fn titled(title: &str, x_label: &str, y_label: &str) -> Self {
        let label = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            title: title.to_string(),
            x_label: label(x_label),
            y_label: label(y_label),
            ..Default::default()
        }
    }

    /// Applies image dimensions from the output settings
    pub fn with_output(mut self, output: &sdraw_config::OutputSettings) -> Self {
        self.width = output.width;
        self.height = output.height;
        self
    }
}

/// Color scheme for markers and lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ColorScheme {
    Default,
    Dark,
    Monochrome,
    Custom(Vec<String>),
}

/// Font configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontConfig {
    pub family: String,
    pub size: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 12,
        }
    }
}

/// Margin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginConfig {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: 20,
            right: 20,
            bottom: 40,
            left: 60,
        }
    }
}

/// Grid line configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub show_x: bool,
    pub show_y: bool,
    pub color: Option<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            show_x: true,
            show_y: true,
            color: None,
        }
    }
}

/// Comprehensive styling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    pub color_scheme: ColorScheme,
    pub colormap: ColorMap,
    pub background_color: Option<String>,
    pub title_font: FontConfig,
    pub axis_font: FontConfig,
    pub margins: MarginConfig,
    pub grid: GridConfig,
    /// Width in pixels reserved for the colorbar of binned plots
    pub colorbar_width: u32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::Default,
            colormap: ColorMap::Jet,
            background_color: Some("#FFFFFF".to_string()),
            title_font: FontConfig {
                family: "sans-serif".to_string(),
                size: 20,
            },
            axis_font: FontConfig::default(),
            margins: MarginConfig::default(),
            grid: GridConfig::default(),
            colorbar_width: 110,
        }
    }
}

/// Two equal-length coordinate sequences
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointSet {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl PointSet {
    /// Pairs up `xs` and `ys`, which must have the same length
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(DrawError::validation_field(
                format!(
                    "coordinate sequences differ in length: {} xs vs {} ys",
                    xs.len(),
                    ys.len()
                ),
                "ys",
            ));
        }
        Ok(Self { xs, ys })
    }

    /// Copies two slices into a point set
    pub fn from_slices(xs: &[f64], ys: &[f64]) -> Result<Self> {
        Self::new(xs.to_vec(), ys.to_vec())
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Iterates over `(x, y)` pairs in input order
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Keeps the pairs matching `keep`, returning how many were removed
    pub fn retain(&mut self, mut keep: impl FnMut(f64, f64) -> bool) -> usize {
        let before = self.len();
        let (xs, ys): (Vec<f64>, Vec<f64>) = self.iter().filter(|&(x, y)| keep(x, y)).unzip();
        self.xs = xs;
        self.ys = ys;
        before - self.len()
    }

    /// `(min, max)` of the x coordinates, `None` when empty
    pub fn x_range(&self) -> Option<(f64, f64)> {
        min_max(&self.xs)
    }

    /// `(min, max)` of the y coordinates, `None` when empty
    pub fn y_range(&self) -> Option<(f64, f64)> {
        min_max(&self.ys)
    }
}

impl FromIterator<(f64, f64)> for PointSet {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        let (xs, ys) = iter.into_iter().unzip();
        Self { xs, ys }
    }
}

/// Smallest and largest value of a slice, ignoring NaN
pub(crate) fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
