//! Descriptive Statistics Module
//! Column summaries, histogram binning, and kernel density estimation.

/// Summary statistics for a single numeric column.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
}

impl Default for ColumnSummary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            variance: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            q1: f64::NAN,
            q3: f64::NAN,
        }
    }
}

/// A single histogram bin over `[start, end)`.
#[derive(Debug, Clone, Copy)]
pub struct HistBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    /// Count normalized so the bin areas sum to 1.
    pub density: f64,
}

/// Box-plot geometry for one column: summary plus whiskers and outliers.
#[derive(Debug, Clone)]
pub struct BoxStats {
    pub summary: ColumnSummary,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// Compute summary statistics for an array of values.
pub fn summarize(values: &[f64]) -> ColumnSummary {
    let n = values.len();
    if n == 0 {
        return ColumnSummary::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mean = values.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    let variance = if n > 1 {
        values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    } else {
        0.0
    };
    let std = variance.sqrt();

    ColumnSummary {
        count: n,
        mean,
        median,
        std,
        variance,
        min: sorted[0],
        max: sorted[n - 1],
        q1: percentile(&sorted, 25.0),
        q3: percentile(&sorted, 75.0),
    }
}

/// Calculate percentile using linear interpolation (NumPy compatible).
/// Input must already be sorted.
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

/// Box-plot statistics: quartile box, 1.5 IQR whiskers clamped to the data,
/// and everything beyond the whiskers as outlier points.
pub fn box_stats(values: &[f64]) -> BoxStats {
    let summary = summarize(values);
    if summary.count == 0 {
        return BoxStats {
            summary,
            whisker_low: f64::NAN,
            whisker_high: f64::NAN,
            outliers: Vec::new(),
        };
    }

    let iqr = summary.q3 - summary.q1;
    let fence_low = summary.q1 - 1.5 * iqr;
    let fence_high = summary.q3 + 1.5 * iqr;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let whisker_low = sorted
        .iter()
        .copied()
        .find(|&v| v >= fence_low)
        .unwrap_or(summary.q1);
    let whisker_high = sorted
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= fence_high)
        .unwrap_or(summary.q3);

    let outliers = sorted
        .iter()
        .copied()
        .filter(|&v| v < whisker_low || v > whisker_high)
        .collect();

    BoxStats {
        summary,
        whisker_low,
        whisker_high,
        outliers,
    }
}

/// Bin count by Sturges' rule, the histogram default.
fn sturges_bins(n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    ((n as f64).log2().ceil() as usize + 1).max(1)
}

/// Build a histogram over the value range with Sturges' bin count.
///
/// A constant column collapses to a single unit-width bin centered on the
/// value so the bar stays drawable.
pub fn histogram(values: &[f64]) -> Vec<HistBin> {
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let n = values.len();

    if (max - min).abs() < f64::EPSILON {
        return vec![HistBin {
            start: min - 0.5,
            end: min + 0.5,
            count: n,
            density: 1.0,
        }];
    }

    let bins = sturges_bins(n);
    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];

    for &v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| HistBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count,
            density: count as f64 / (n as f64 * width),
        })
        .collect()
}

/// Gaussian kernel density estimate sampled on a uniform grid.
///
/// Bandwidth follows Scott's rule (`std * n^(-1/5)`). Returns an empty curve
/// for degenerate input (fewer than two points or zero spread), which the
/// plot layers treat as "no overlay".
pub fn kde_curve(values: &[f64], samples: usize) -> Vec<[f64; 2]> {
    let n = values.len();
    if n < 2 || samples < 2 {
        return Vec::new();
    }

    let summary = summarize(values);
    if !(summary.std > 0.0) {
        return Vec::new();
    }

    let h = summary.std * (n as f64).powf(-0.2);
    let lo = summary.min - 3.0 * h;
    let hi = summary.max + 3.0 * h;
    let step = (hi - lo) / (samples - 1) as f64;
    let norm = 1.0 / (n as f64 * h * (2.0 * std::f64::consts::PI).sqrt());

    (0..samples)
        .map(|i| {
            let x = lo + i as f64 * step;
            let density: f64 = values
                .iter()
                .map(|&v| (-0.5 * ((x - v) / h).powi(2)).exp())
                .sum::<f64>()
                * norm;
            [x, density]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_matches_hand_computed_values() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let s = summarize(&values);

        assert_eq!(s.count, 8);
        assert!((s.mean - 5.0).abs() < 1e-12);
        assert!((s.median - 4.5).abs() < 1e-12);
        // Sample variance with n-1 denominator: 32/7.
        assert!((s.variance - 32.0 / 7.0).abs() < 1e-12);
        assert!((s.std - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!((s.min - 2.0).abs() < 1e-12);
        assert!((s.max - 9.0).abs() < 1e-12);
    }

    #[test]
    fn summarize_empty_is_nan() {
        let s = summarize(&[]);
        assert_eq!(s.count, 0);
        assert!(s.mean.is_nan());
        assert!(s.median.is_nan());
    }

    #[test]
    fn percentile_interpolates_like_numpy() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        // numpy.percentile([1,2,3,4], 25) == 1.75
        assert!((percentile(&sorted, 25.0) - 1.75).abs() < 1e-12);
        assert!((percentile(&sorted, 50.0) - 2.5).abs() < 1e-12);
        assert!((percentile(&sorted, 100.0) - 4.0).abs() < 1e-12);
        assert!((percentile(&sorted, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn box_stats_flags_outliers_beyond_whiskers() {
        let mut values: Vec<f64> = (1..=20).map(f64::from).collect();
        values.push(100.0);

        let b = box_stats(&values);
        assert_eq!(b.outliers, vec![100.0]);
        assert!(b.whisker_high <= 20.0);
        assert!((b.whisker_low - 1.0).abs() < 1e-12);
    }

    #[test]
    fn histogram_counts_cover_all_values() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let bins = histogram(&values);

        assert!(!bins.is_empty());
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 100);

        // Bin areas sum to 1 for a density histogram.
        let area: f64 = bins.iter().map(|b| b.density * (b.end - b.start)).sum();
        assert!((area - 1.0).abs() < 1e-9);
    }

    #[test]
    fn histogram_constant_column_is_single_bin() {
        let bins = histogram(&[3.0, 3.0, 3.0]);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
        assert!(bins[0].start < 3.0 && bins[0].end > 3.0);
    }

    #[test]
    fn kde_integrates_to_roughly_one() {
        let values: Vec<f64> = (0..50).map(|i| f64::from(i) * 0.1).collect();
        let curve = kde_curve(&values, 200);
        assert_eq!(curve.len(), 200);

        let step = curve[1][0] - curve[0][0];
        let integral: f64 = curve.iter().map(|p| p[1] * step).sum();
        assert!((integral - 1.0).abs() < 0.05, "integral was {integral}");
    }

    #[test]
    fn kde_degenerate_input_is_empty() {
        assert!(kde_curve(&[], 100).is_empty());
        assert!(kde_curve(&[1.0], 100).is_empty());
        assert!(kde_curve(&[2.0, 2.0, 2.0], 100).is_empty());
    }
}
