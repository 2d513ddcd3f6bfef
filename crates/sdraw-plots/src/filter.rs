//! Dropping points that cannot be shown on a logarithmic axis

use crate::PointSet;
use sdraw_common::AxisScale;

/// Drops pairs whose coordinate is non-positive on a log-scaled axis.
///
/// The x axis is filtered first, then the y axis on what remains. Each
/// removal is reported with a warning; linear axes keep every value.
pub fn retain_for_scales(points: &PointSet, x_scale: AxisScale, y_scale: AxisScale) -> PointSet {
    let mut kept = points.clone();

    if x_scale.is_log() && kept.xs().iter().any(|&x| x <= 0.0) {
        let removed = kept.retain(|x, _| !(x <= 0.0));
        tracing::warn!(
            removed,
            "logscale with nonpositive values in x coord, removed {} nonpositives",
            removed
        );
    }

    if y_scale.is_log() && kept.ys().iter().any(|&y| y <= 0.0) {
        let removed = kept.retain(|_, y| !(y <= 0.0));
        tracing::warn!(
            removed,
            "logscale with nonpositive values in y coord, removed {} nonpositives",
            removed
        );
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PointSet {
        PointSet::new(
            vec![1.0, 0.0, -3.0, 4.0, 5.0],
            vec![-1.0, 2.0, 3.0, 0.0, 6.0],
        )
        .unwrap()
    }

    #[test]
    fn test_linear_scales_keep_everything() {
        let kept = retain_for_scales(&sample(), AxisScale::Linear, AxisScale::Linear);
        assert_eq!(kept, sample());
    }

    #[test]
    fn test_log_x_drops_nonpositive_x() {
        let kept = retain_for_scales(&sample(), AxisScale::Log, AxisScale::Linear);
        assert_eq!(kept.xs(), &[1.0, 4.0, 5.0]);
        assert_eq!(kept.ys(), &[-1.0, 0.0, 6.0]);
    }

    #[test]
    fn test_log_both_axes() {
        let kept = retain_for_scales(&sample(), AxisScale::Log, AxisScale::Log);
        assert_eq!(kept.xs(), &[5.0]);
        assert_eq!(kept.ys(), &[6.0]);
    }

    #[test]
    fn test_all_nonpositive_leaves_empty_set() {
        let points = PointSet::new(vec![-1.0, 0.0], vec![1.0, 1.0]).unwrap();
        assert!(retain_for_scales(&points, AxisScale::Log, AxisScale::Log).is_empty());
    }
}
