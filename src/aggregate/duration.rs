//! Summary statistics over deduplicated, capped duration samples.

use serde::Serialize;

/// Median, mean, and 90th percentile of a duration sample list, in hours,
/// rounded to one decimal place. All zeros for an empty sample list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DurationStats {
    pub median: f64,
    pub mean: f64,
    pub p90: f64,
    pub count: usize,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

impl DurationStats {
    /// Computes stats over an unordered sample list.
    ///
    /// The percentile is nearest-rank: the value at sorted index
    /// `floor(0.9 * n)`, with no interpolation. The median averages the two
    /// middle elements for even sample counts.
    pub fn compute(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let n = sorted.len();

        let median = (sorted[(n - 1) / 2] + sorted[n / 2]) / 2.0;
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let p90_idx = ((n as f64 * 0.9) as usize).min(n - 1);

        Self {
            median: round1(median),
            mean: round1(mean),
            p90: round1(sorted[p90_idx]),
            count: n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_all_zero() {
        let stats = DurationStats::compute(&[]);
        assert_eq!(stats, DurationStats::default());
    }

    #[test]
    fn test_even_sample_count() {
        let stats = DurationStats::compute(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.mean, 2.5);
        // Nearest-rank: index floor(0.9 * 4) = 3, the 4th sorted value
        assert_eq!(stats.p90, 4.0);
        assert_eq!(stats.count, 4);
    }

    #[test]
    fn test_odd_sample_count() {
        let stats = DurationStats::compute(&[5.0, 1.0, 3.0]);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.p90, 5.0);
    }

    #[test]
    fn test_single_sample() {
        let stats = DurationStats::compute(&[7.25]);
        assert_eq!(stats.median, 7.3);
        assert_eq!(stats.mean, 7.3);
        assert_eq!(stats.p90, 7.3);
        assert_eq!(stats.count, 1);
    }

    #[test]
    fn test_rounding_to_one_decimal() {
        let stats = DurationStats::compute(&[2.0, 2.25]);
        assert_eq!(stats.median, 2.1);
        assert_eq!(stats.mean, 2.1);
    }

    #[test]
    fn test_p90_larger_sample() {
        let samples: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        let stats = DurationStats::compute(&samples);
        // index floor(0.9 * 10) = 9, the 10th sorted value
        assert_eq!(stats.p90, 10.0);
        assert_eq!(stats.median, 5.5);
    }
}
