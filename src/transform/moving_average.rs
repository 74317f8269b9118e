//! Trailing moving average with missing-value tolerance

/// Trailing simple moving average over `window` points.
///
/// The output has the same length as `values`. Positions before the first
/// full window are `None`. Every later position is the mean of the present
/// values in the trailing window, or `None` when the whole window is missing.
/// `NaN` counts as missing. A zero window yields all `None`.
pub fn moving_average(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < window {
                return None;
            }

            let (sum, count) = values[i + 1 - window..=i]
                .iter()
                .flatten()
                .filter(|v| !v.is_nan())
                .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

            (count > 0).then(|| sum / count as f64)
        })
        .collect()
}

/// Convenience wrapper for fully-present series
pub fn moving_average_dense(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let values: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    moving_average(&values, window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seven_point_window() {
        let result = moving_average_dense(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], 7);
        assert_eq!(result, vec![None, None, None, None, None, None, Some(4.0)]);
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let result = moving_average(&[Some(1.0), None, Some(3.0)], 3);
        assert_eq!(result, vec![None, None, Some(2.0)]);
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let result = moving_average(&[Some(f64::NAN), Some(4.0)], 2);
        assert_eq!(result, vec![None, Some(4.0)]);
    }

    #[test]
    fn test_all_missing_window() {
        let result = moving_average(&[Some(5.0), None, None, None], 3);
        assert_eq!(result, vec![None, None, Some(5.0), None]);
    }

    #[test]
    fn test_window_one_is_identity() {
        let input = vec![Some(3.5), None, Some(-1.0), Some(0.0), None, Some(12.25)];
        assert_eq!(moving_average(&input, 1), input);
    }

    #[test]
    fn test_trailing_window_slides() {
        let result = moving_average_dense(&[2.0, 4.0, 6.0, 8.0], 2);
        assert_eq!(result, vec![None, Some(3.0), Some(5.0), Some(7.0)]);
    }

    #[test]
    fn test_window_larger_than_input() {
        let result = moving_average_dense(&[1.0, 2.0], 7);
        assert_eq!(result, vec![None, None]);
    }

    #[test]
    fn test_zero_window() {
        assert_eq!(moving_average_dense(&[1.0, 2.0], 0), vec![None, None]);
        assert!(moving_average(&[], 3).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let input = vec![Some(1.5), Some(2.25), None, Some(9.0), Some(4.0)];
        assert_eq!(moving_average(&input, 3), moving_average(&input, 3));
    }
}
