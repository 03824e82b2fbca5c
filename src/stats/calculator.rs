//! Statistics Calculator Module
//! Quartiles, IQR clipping bounds and correlation for the cleaning pipeline and views.

use statrs::statistics::Statistics;

/// Multiplier applied to the IQR to get the outlier fences.
pub const IQR_FENCE: f64 = 1.5;

/// Outlier fences for one numeric field, computed from its pre-clip distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ClipBounds {
    pub fn clamp(&self, value: f64) -> f64 {
        if value < self.lower {
            self.lower
        } else if value > self.upper {
            self.upper
        } else {
            value
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// IQR fences over the non-NaN values. `None` when there is nothing to measure.
    pub fn clip_bounds(values: &[f64]) -> Option<ClipBounds> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let q1 = Self::percentile(&sorted, 25.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;

        Some(ClipBounds {
            q1,
            q3,
            iqr,
            lower: q1 - IQR_FENCE * iqr,
            upper: q3 + IQR_FENCE * iqr,
        })
    }

    /// Pearson correlation of paired samples.
    /// `None` for fewer than two pairs or when either side has no variance.
    pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
        if xs.len() != ys.len() || xs.len() < 2 {
            return None;
        }

        let std_x = xs.std_dev();
        let std_y = ys.std_dev();
        if std_x == 0.0 || std_y == 0.0 || std_x.is_nan() || std_y.is_nan() {
            return None;
        }

        let cov = xs.covariance(ys);
        Some((cov / (std_x * std_y)).clamp(-1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_linear_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(StatsCalculator::percentile(&sorted, 25.0), 1.75);
        assert_eq!(StatsCalculator::percentile(&sorted, 50.0), 2.5);
        assert_eq!(StatsCalculator::percentile(&sorted, 75.0), 3.25);
        assert_eq!(StatsCalculator::percentile(&[7.0], 25.0), 7.0);
        assert!(StatsCalculator::percentile(&[], 25.0).is_nan());
    }

    #[test]
    fn test_clip_bounds_ground_example() {
        let values = [0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let bounds = StatsCalculator::clip_bounds(&values).unwrap();
        assert_eq!(bounds.q1, 0.0);
        assert_eq!(bounds.q3, 4.0);
        assert_eq!(bounds.iqr, 4.0);
        assert_eq!(bounds.lower, -6.0);
        assert_eq!(bounds.upper, 10.0);
        assert_eq!(bounds.clamp(100.0), 10.0);
        assert_eq!(bounds.clamp(3.0), 3.0);
        assert_eq!(bounds.clamp(-50.0), -6.0);
    }

    #[test]
    fn test_clip_bounds_unsorted_input() {
        let bounds = StatsCalculator::clip_bounds(&[100.0, 3.0, 0.0, 5.0, 1.0, 0.0, 4.0, 2.0, 0.0])
            .unwrap();
        assert_eq!(bounds.upper, 10.0);
    }

    #[test]
    fn test_clip_bounds_empty() {
        assert!(StatsCalculator::clip_bounds(&[]).is_none());
    }

    #[test]
    fn test_pearson() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        let r = StatsCalculator::pearson(&xs, &ys).unwrap();
        assert!((r - 1.0).abs() < 1e-9);

        let flipped = [8.0, 6.0, 4.0, 2.0];
        let r = StatsCalculator::pearson(&xs, &flipped).unwrap();
        assert!((r + 1.0).abs() < 1e-9);

        assert!(StatsCalculator::pearson(&[1.0], &[1.0]).is_none());
        assert!(StatsCalculator::pearson(&[1.0, 1.0], &[2.0, 3.0]).is_none());
    }
}
