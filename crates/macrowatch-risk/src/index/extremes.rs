//! Highest and lowest stress periods.

use std::cmp::Ordering;

/// Positions of the `n` largest values, largest first. Ties keep their
/// original order.
pub fn top_indices(values: &[f64], n: usize) -> Vec<usize> {
    ranked(values, n, |a, b| b.total_cmp(a))
}

/// Positions of the `n` smallest values, smallest first. Ties keep their
/// original order.
pub fn bottom_indices(values: &[f64], n: usize) -> Vec<usize> {
    ranked(values, n, f64::total_cmp)
}

fn ranked(values: &[f64], n: usize, cmp: impl Fn(&f64, &f64) -> Ordering) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    // `sort_by` is stable.
    order.sort_by(|&a, &b| cmp(&values[a], &values[b]));
    order.truncate(n);
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_and_bottom() {
        let values = [0.5, -1.0, 2.0, 0.0, 1.5];
        assert_eq!(top_indices(&values, 2), vec![2, 4]);
        assert_eq!(bottom_indices(&values, 2), vec![1, 3]);
    }

    #[test]
    fn test_ties_keep_row_order() {
        let values = [1.0, 3.0, 1.0, 3.0];
        assert_eq!(top_indices(&values, 4), vec![1, 3, 0, 2]);
        assert_eq!(bottom_indices(&values, 4), vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_short_input_returns_everything() {
        let values = [0.3, 0.1, 0.2];
        assert_eq!(top_indices(&values, 10), vec![0, 2, 1]);
        assert_eq!(bottom_indices(&values, 10), vec![1, 2, 0]);
        assert!(top_indices(&[], 10).is_empty());
    }
}
