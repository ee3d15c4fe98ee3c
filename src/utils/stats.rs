//! Statistical utility functions.

/// Compute the sample standard deviation of f32 values.
pub fn std_dev_f32(values: &[f32]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sum: f64 = values.iter().map(|&v| f64::from(v)).sum();
    let mean = sum / values.len() as f64;
    let variance: f64 = values
        .iter()
        .map(|&v| (f64::from(v) - mean).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Summary statistics for a series of f32 samples.
#[derive(Debug, Clone)]
pub struct SampleStats {
    pub min: f32,
    pub max: f32,
    pub mean: f64,
    pub std: f64,
}

impl SampleStats {
    /// Compute statistics from a slice of samples.
    pub fn compute(values: &[f32]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
        }
        let sum: f64 = values.iter().map(|&v| f64::from(v)).sum();
        let mean = sum / values.len() as f64;
        let std = std_dev_f32(values);
        Some(Self {
            min,
            max,
            mean,
            std,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_std_dev_constant_series() {
        assert_relative_eq!(std_dev_f32(&[4.0, 4.0, 4.0, 4.0]), 0.0);
    }

    #[test]
    fn test_std_dev_known_series() {
        // Sample std of {2, 4, 4, 4, 5, 5, 7, 9} is ~2.138.
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(std_dev_f32(&values), 2.13809, epsilon = 1e-4);
    }

    #[test]
    fn test_std_dev_short_series() {
        assert_relative_eq!(std_dev_f32(&[]), 0.0);
        assert_relative_eq!(std_dev_f32(&[3.0]), 0.0);
    }

    #[test]
    fn test_sample_stats() {
        let stats = SampleStats::compute(&[1.0, 2.0, 3.0]).unwrap();
        assert_relative_eq!(stats.min, 1.0);
        assert_relative_eq!(stats.max, 3.0);
        assert_relative_eq!(stats.mean, 2.0);
        assert_relative_eq!(stats.std, 1.0);
    }

    #[test]
    fn test_sample_stats_empty() {
        assert!(SampleStats::compute(&[]).is_none());
    }
}
