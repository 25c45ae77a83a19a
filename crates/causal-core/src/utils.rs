//! Descriptive statistics over slices
//!
//! These are the building blocks for bootstrap summaries and the
//! estimator compositions. None of them validate finiteness: NaN and
//! infinite inputs propagate.

/// Sort data and return a new vector
///
/// Handles NaN values by placing them at the end.
///
/// # Examples
///
/// ```rust
/// use causal_core::utils::sorted;
///
/// let data = vec![3.0, 1.0, 5.0, 2.0, 4.0];
/// assert_eq!(sorted(&data), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
/// ```
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    // total_cmp puts negative NaN first; move every NaN to the end
    sorted.sort_by_key(|x| x.is_nan());
    sorted
}

/// Calculate the mean of a slice
///
/// Returns NaN for empty slices. Infinite values propagate regardless
/// of their position: `inf` alone gives `inf`, mixed signs give NaN.
///
/// # Examples
///
/// ```rust
/// use causal_core::utils::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
/// assert!(mean(&[]).is_nan());
/// assert_eq!(mean(&[f64::INFINITY, 1.0]), f64::INFINITY);
/// ```
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    if data.iter().all(|x| x.is_finite()) {
        welford(data).0
    } else {
        data.iter().sum::<f64>() / data.len() as f64
    }
}

/// Running mean and sum of squared deviations
///
/// Exact for constant data, so a constant sample has zero spread.
/// Only meaningful for finite input.
fn welford(data: &[f64]) -> (f64, f64) {
    data.iter()
        .enumerate()
        .fold((0.0, 0.0), |(mean, m2), (i, &x)| {
            let delta = x - mean;
            let next = mean + delta / (i + 1) as f64;
            (next, m2 + delta * (x - next))
        })
}

/// Calculate the sample standard deviation (n - 1 denominator)
///
/// Returns 0.0 for slices with less than 2 elements and NaN when any
/// value is NaN or infinite.
///
/// # Examples
///
/// ```rust
/// use causal_core::utils::std_dev;
///
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let sd = std_dev(&data);
/// assert!((sd - 1.58113883).abs() < 1e-6);
/// ```
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    if !data.iter().all(|x| x.is_finite()) {
        return f64::NAN;
    }
    let (_, m2) = welford(data);
    (m2 / (data.len() - 1) as f64).sqrt()
}

/// Weighted mean `sum(w * x) / sum(w)`
///
/// Returns NaN when the slices are empty or the weights sum to zero.
pub fn weighted_mean(data: &[f64], weights: &[f64]) -> f64 {
    let (num, den) = data
        .iter()
        .zip(weights)
        .fold((0.0, 0.0), |(num, den), (&x, &w)| (num + w * x, den + w));
    if den == 0.0 {
        return f64::NAN;
    }
    num / den
}

/// Linear-interpolation quantile of sorted data (Hyndman-Fan type 7)
///
/// `p` is a probability in [0, 1]. With `h = (n - 1) p`, the result is
/// `x[floor(h)] + (h - floor(h)) * (x[floor(h) + 1] - x[floor(h)])`.
/// This is the default rule of R's `quantile()` and NumPy's `percentile()`.
///
/// Returns NaN for empty input. The caller is responsible for sorting
/// and for validating `p`.
///
/// # Examples
///
/// ```rust
/// use causal_core::utils::quantile_sorted;
///
/// let data: Vec<f64> = (1..=10).map(f64::from).collect();
/// assert!((quantile_sorted(&data, 0.025) - 1.225).abs() < 1e-12);
/// assert!((quantile_sorted(&data, 0.975) - 9.775).abs() < 1e-12);
/// ```
pub fn quantile_sorted(sorted_data: &[f64], p: f64) -> f64 {
    let n = sorted_data.len();
    match n {
        0 => f64::NAN,
        1 => sorted_data[0],
        _ => {
            let h = p * (n - 1) as f64;
            let lower = (h.floor() as usize).min(n - 1);
            let upper = (lower + 1).min(n - 1);
            let frac = h - lower as f64;
            let (lo, hi) = (sorted_data[lower], sorted_data[upper]);
            if frac == 0.0 || lo == hi {
                lo
            } else if lo.is_finite() && hi.is_finite() {
                (lo + frac * (hi - lo)).min(hi)
            } else {
                // -inf below a finite value stays -inf; -inf to inf is NaN
                (1.0 - frac) * lo + frac * hi
            }
        }
    }
}
