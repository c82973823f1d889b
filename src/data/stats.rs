//! Descriptive statistics behind the chart panels.
//!
//! Everything here takes plain slices and tolerates empty input: an empty
//! slice yields `None`, an empty `Vec` or `NaN`, never a panic.

/// Unit-width bins are used for integer data spanning at most this many units.
const MAX_UNIT_BIN_SPAN: f64 = 60.0;

/// How a numeric histogram chooses its bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binning {
    /// Exactly this many equal-width bins over `[min, max]`.
    Count(usize),
    /// One bin per integer for small integer ranges, Sturges' rule otherwise.
    Auto,
}

/// Bin edges (`n + 1` ascending values) for the finite values in `values`.
pub fn bin_edges(values: &[f64], binning: Binning) -> Option<Vec<f64>> {
    let (min, max) = finite_min_max(values)?;

    if let Binning::Auto = binning {
        let integral = values
            .iter()
            .filter(|v| v.is_finite())
            .all(|v| v.fract() == 0.0);
        if integral && max - min <= MAX_UNIT_BIN_SPAN {
            let n = (max - min) as usize + 1;
            return Some((0..=n).map(|i| min - 0.5 + i as f64).collect());
        }
    }

    if min == max {
        return Some(vec![min - 0.5, max + 0.5]);
    }

    let n = match binning {
        Binning::Count(n) => n.max(1),
        Binning::Auto => {
            let finite = values.iter().filter(|v| v.is_finite()).count();
            (finite as f64).log2().ceil() as usize + 1
        }
    };
    let width = (max - min) / n as f64;
    let mut edges: Vec<f64> = (0..n).map(|i| min + width * i as f64).collect();
    edges.push(max);
    Some(edges)
}

/// Count `values` into the bins given by `edges`. The last bin is closed on
/// the right; values outside `[first, last]` and non-finite values are skipped.
pub fn bin_counts(values: &[f64], edges: &[f64]) -> Vec<usize> {
    if edges.len() < 2 {
        return Vec::new();
    }
    let n = edges.len() - 1;
    let mut counts = vec![0usize; n];
    let (lo, hi) = (edges[0], edges[n]);
    for &v in values {
        if !v.is_finite() || v < lo || v > hi {
            continue;
        }
        // First edge strictly greater than v, minus one, is v's bin.
        let idx = edges.partition_point(|&e| e <= v).saturating_sub(1).min(n - 1);
        counts[idx] += 1;
    }
    counts
}

/// Five-number summary plus Tukey outliers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
    pub count: usize,
}

pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile_sorted(&sorted, 0.25);
    let median = quantile_sorted(&sorted, 0.5);
    let q3 = quantile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;
    let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let mut lower_whisker = f64::INFINITY;
    let mut upper_whisker = f64::NEG_INFINITY;
    let mut outliers = Vec::new();
    for &v in &sorted {
        if v < lo_fence || v > hi_fence {
            outliers.push(v);
        } else {
            lower_whisker = lower_whisker.min(v);
            upper_whisker = upper_whisker.max(v);
        }
    }

    Some(BoxSummary {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
        count: sorted.len(),
    })
}

/// Quantile of already sorted data with linear interpolation between ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = pos.floor() as usize;
            let upper = pos.ceil() as usize;
            let frac = pos - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * frac
        }
    }
}

/// Pearson correlation over the pairs where both values are finite.
///
/// `NaN` when fewer than two pairs remain or either side has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| (x, y))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

fn finite_min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_count_bins_cover_range() {
        let values = [0.0, 2.5, 5.0, 7.5, 10.0];
        let edges = bin_edges(&values, Binning::Count(4)).unwrap();
        assert_eq!(edges, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
        // Edge values fall into the upper bin, max into the last one.
        assert_eq!(bin_counts(&values, &edges), vec![1, 1, 1, 2]);
    }

    #[test]
    fn auto_bins_are_unit_width_for_small_integer_ranges() {
        let values = [1.0, 2.0, 2.0, 4.0];
        let edges = bin_edges(&values, Binning::Auto).unwrap();
        assert_eq!(edges, vec![0.5, 1.5, 2.5, 3.5, 4.5]);
        assert_eq!(bin_counts(&values, &edges), vec![1, 2, 0, 1]);
    }

    #[test]
    fn auto_bins_fall_back_to_sturges() {
        let values: Vec<f64> = (0..16).map(|i| i as f64 * 100.5).collect();
        let edges = bin_edges(&values, Binning::Auto).unwrap();
        // log2(16) + 1 = 5 bins.
        assert_eq!(edges.len(), 6);
        assert_eq!(bin_counts(&values, &edges).iter().sum::<usize>(), 16);
    }

    #[test]
    fn degenerate_and_empty_inputs() {
        assert_eq!(bin_edges(&[], Binning::Count(30)), None);
        assert_eq!(bin_edges(&[f64::NAN], Binning::Auto), None);
        assert_eq!(bin_edges(&[3.0, 3.0], Binning::Count(30)).unwrap(), vec![2.5, 3.5]);
        assert!(bin_counts(&[1.0], &[]).is_empty());
        assert_eq!(box_summary(&[]), None);
        assert!(quantile_sorted(&[], 0.5).is_nan());
    }

    #[test]
    fn box_summary_with_outlier() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0];
        let b = box_summary(&values).unwrap();
        assert_eq!(b.q1, 3.0);
        assert_eq!(b.median, 5.0);
        assert_eq!(b.q3, 7.0);
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.upper_whisker, 8.0);
        assert_eq!(b.outliers, vec![100.0]);
        assert_eq!(b.count, 9);
    }

    #[test]
    fn quantiles_interpolate() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.5), 2.5);
        assert_eq!(quantile_sorted(&sorted, 0.25), 1.75);
        assert_eq!(quantile_sorted(&[7.0], 0.9), 7.0);
    }

    #[test]
    fn pearson_basics() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert!((pearson(&xs, &[2.0, 4.0, 6.0, 8.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&xs, &[8.0, 6.0, 4.0, 2.0]) + 1.0).abs() < 1e-12);
        assert!(pearson(&xs, &[5.0, 5.0, 5.0, 5.0]).is_nan());
        assert!(pearson(&[1.0], &[1.0]).is_nan());
        // Pairs with a missing side are dropped.
        let r = pearson(&[1.0, f64::NAN, 2.0, 3.0], &[1.0, 9.0, 2.0, 3.0]);
        assert!((r - 1.0).abs() < 1e-12);
    }
}
