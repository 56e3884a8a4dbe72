//! Small descriptive statistics over latency samples

/// Arithmetic mean, `None` for an empty sample
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Nearest-rank percentile (`p` in (0, 100]), `None` for an empty sample
pub(crate) fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let rank = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    let index = rank.clamp(1, sorted.len()) - 1;
    Some(sorted[index])
}

pub(crate) fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample() {
        assert_eq!(mean(&[]), None);
        assert_eq!(percentile(&[], 95.0), None);
        assert_eq!(max(&[]), None);
    }

    #[test]
    fn test_nearest_rank_p95() {
        let values: Vec<f64> = (1..=20).map(f64::from).collect();
        assert_eq!(percentile(&values, 95.0), Some(19.0));
        assert_eq!(percentile(&[0.3, 0.1, 0.2], 95.0), Some(0.3));
        assert_eq!(percentile(&[0.4], 95.0), Some(0.4));
    }

    #[test]
    fn test_mean_and_max() {
        assert_eq!(mean(&[0.1, 0.3]), Some(0.2));
        assert_eq!(max(&[0.1, 0.3, 0.2]), Some(0.3));
    }
}
