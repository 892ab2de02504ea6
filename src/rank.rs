//! Ordinal ranking of continuous values.

/// Ranks `values` in descending order, where tied values share the best (lowest) rank and the
/// following rank is skipped. For example, `[70, 80, 80, 60]` ranks as `[3, 1, 1, 4]`.
pub fn min_ranks(values: &[f64]) -> Vec<usize> {
    values
        .iter()
        .map(|value| 1 + values.iter().filter(|&other| other > value).count())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct() {
        assert_eq!(vec![2, 1, 3], min_ranks(&[80.0, 90.0, 70.0]));
    }

    #[test]
    fn ties_share_min_rank() {
        assert_eq!(vec![3, 1, 1, 4], min_ranks(&[70.0, 80.0, 80.0, 60.0]));
        assert_eq!(vec![1, 1, 1], min_ranks(&[50.0, 50.0, 50.0]));
    }

    #[test]
    fn empty() {
        assert!(min_ranks(&[]).is_empty());
    }
}
