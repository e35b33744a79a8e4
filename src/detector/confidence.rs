//! Fusion of colour purity and circularity into a confidence value.

use crate::config::ConfidenceWeights;

/// Round to three decimal places.
#[inline]
pub fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Confidence in `[0, 1]` for an accepted candidate.
///
/// Purity is normalised from its 0..100 scale and clamped before weighting;
/// the fused value is clamped again since circularity can overshoot 1 on
/// noisy outlines.
pub fn estimate(purity: f64, circularity: f64, weights: &ConfidenceWeights) -> f64 {
    let purity_norm = (purity / 100.0).clamp(0.0, 1.0);
    let fused = purity_norm * weights.purity + circularity.max(0.0) * weights.circularity;
    round3(fused.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEIGHTS: ConfidenceWeights = ConfidenceWeights {
        purity: 0.6,
        circularity: 0.4,
    };

    #[test]
    fn test_perfect_blob() {
        assert_eq!(estimate(100.0, 1.0, &WEIGHTS), 1.0);
    }

    #[test]
    fn test_clamped_inputs() {
        assert_eq!(estimate(-40.0, 0.0, &WEIGHTS), 0.0);
        assert_eq!(estimate(250.0, 1.3, &WEIGHTS), 1.0);
    }

    #[test]
    fn test_rounded_to_three_places() {
        let c = estimate(77.77, 0.5555, &WEIGHTS);
        assert_eq!(c, 0.689);
    }

    #[test]
    fn test_monotonic_in_each_input() {
        let mut prev = -1.0;
        for i in 0..=40 {
            let c = estimate(70.0, i as f64 * 0.03, &WEIGHTS);
            assert!(c >= prev);
            prev = c;
        }
        let mut prev = -1.0;
        for i in 0..=60 {
            let c = estimate(i as f64 * 2.0, 0.7, &WEIGHTS);
            assert!(c >= prev);
            prev = c;
        }
    }
}
