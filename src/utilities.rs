//! Numeric helpers shared by the lookup tables.

/// Linear interpolation on a linear scale.
///
/// Given ascending `x` and matching `y`, interpolate the y value at `x_new`.
/// Outside the range of `x` the first or last y value is returned.
pub fn interpolate_linear(x: &[f64], y: &[f64], x_new: f64) -> f64 {
    if x.is_empty() {
        return f64::NAN;
    }
    if x.len() == 1 || x_new <= x[0] {
        return y[0];
    }
    let last = x.len() - 1;
    if x_new >= x[last] {
        return y[last];
    }

    let idx = bracket(x, x_new);
    let t = (x_new - x[idx]) / (x[idx + 1] - x[idx]);
    (1.0 - t) * y[idx] + t * y[idx + 1]
}

/// Index `i` with `x[i] <= x_new < x[i + 1]`, for `x[0] <= x_new < x[last]`.
pub fn bracket(x: &[f64], x_new: f64) -> usize {
    // invariant: target interval within [low, high)
    let mut low = 0usize;
    let mut high = x.len() - 1;
    while high - low > 1 {
        let mid = (low + high) >> 1;
        if x[mid] <= x_new {
            low = mid;
        } else {
            high = mid;
        }
    }
    low
}

/// True when every element is strictly greater than the previous one.
pub fn is_strictly_ascending(x: &[f64]) -> bool {
    x.windows(2).all(|w| w[0] < w[1])
}

/// Cumulative trapezoid integral of `y` over `x`, starting at 0.
pub fn cumulative_trapezoid(x: &[f64], y: &[f64]) -> Vec<f64> {
    let mut cdf = Vec::with_capacity(x.len());
    let mut acc = 0.0;
    cdf.push(acc);
    for i in 1..x.len() {
        acc += 0.5 * (y[i] + y[i - 1]) * (x[i] - x[i - 1]);
        cdf.push(acc);
    }
    cdf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_linear_inside() {
        let x = [0.0, 10.0, 20.0];
        let y = [0.0, 1.0, 3.0];
        assert!((interpolate_linear(&x, &y, 5.0) - 0.5).abs() < 1e-12);
        assert!((interpolate_linear(&x, &y, 15.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_interpolate_linear_clamps() {
        let x = [1.0, 2.0];
        let y = [4.0, 8.0];
        assert_eq!(interpolate_linear(&x, &y, -100.0), 4.0);
        assert_eq!(interpolate_linear(&x, &y, 100.0), 8.0);
    }

    #[test]
    fn test_interpolate_linear_exact_nodes() {
        let x = [1.0, 2.0, 3.0];
        let y = [4.0, 8.0, 5.0];
        assert_eq!(interpolate_linear(&x, &y, 2.0), 8.0);
    }

    #[test]
    fn test_interpolate_linear_degenerate() {
        assert!(interpolate_linear(&[], &[], 1.0).is_nan());
        assert_eq!(interpolate_linear(&[3.0], &[7.0], 100.0), 7.0);
    }

    #[test]
    fn test_bracket() {
        let x = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(bracket(&x, 0.0), 0);
        assert_eq!(bracket(&x, 1.5), 1);
        assert_eq!(bracket(&x, 2.999), 2);
    }

    #[test]
    fn test_ascending() {
        assert!(is_strictly_ascending(&[1.0, 2.0, 3.0]));
        assert!(!is_strictly_ascending(&[1.0, 1.0, 3.0]));
        assert!(!is_strictly_ascending(&[2.0, 1.0]));
    }

    #[test]
    fn test_cumulative_trapezoid() {
        let cdf = cumulative_trapezoid(&[0.0, 1.0, 2.0], &[1.0, 1.0, 3.0]);
        assert_eq!(cdf, vec![0.0, 1.0, 3.0]);
    }
}
