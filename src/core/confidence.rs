use crate::models::{ConfidenceBreakdown, GlutenSignal};

/// z-score for a 95% confidence interval
pub const DEFAULT_Z: f64 = 1.96;

/// Share of the final score taken by the Wilson lower bound
const WILSON_WEIGHT: f64 = 0.7;
/// Share of the final score taken by the volume bonus
const VOLUME_WEIGHT: f64 = 0.3;

/// Wilson score interval lower bound for a binomial proportion
///
/// # Arguments
/// * `phat` - Observed proportion of positive outcomes
/// * `n` - Number of trials
/// * `z` - z-score of the confidence level
///
/// # Returns
/// Lower bound clamped to [0, 1], or 0 when `n` is 0
pub fn wilson_lower_bound(phat: f64, n: u64, z: f64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;

    let z2 = z * z;
    let denom = 1.0 + z2 / n;
    let center = phat + z2 / (2.0 * n);
    let margin = z * ((phat * (1.0 - phat) + z2 / (4.0 * n)) / n).sqrt();

    ((center - margin) / denom).clamp(0.0, 1.0)
}

/// Log-scaled bonus for the number of gluten-relevant reviews, saturating at 1
///
/// Reaches 1.0 at 99 reviews.
#[inline]
pub fn volume_bonus(total: u32) -> f64 {
    ((total as f64 + 1.0).log10() / 2.0).clamp(0.0, 1.0)
}

/// Turns positive/negative/total review counts into a 0-100 confidence score
///
/// score = round(100 * (0.7 * wilson_lower_bound + 0.3 * volume_bonus))
///
/// The Wilson bound is computed over polarized reviews only, the volume bonus
/// over every gluten-relevant review.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceEstimator {
    z: f64,
}

impl ConfidenceEstimator {
    pub fn new(z: f64) -> Self {
        Self { z }
    }

    pub fn estimate(&self, positive: u32, negative: u32, total: u32) -> u8 {
        self.breakdown(positive, negative, total).confidence
    }

    pub fn estimate_signal(&self, signal: &GlutenSignal) -> u8 {
        self.estimate(
            signal.positive_count,
            signal.negative_count,
            signal.gluten_review_count,
        )
    }

    /// Confidence score with the statistics it was derived from
    pub fn breakdown(&self, positive: u32, negative: u32, total: u32) -> ConfidenceBreakdown {
        let polarized = u64::from(positive) + u64::from(negative);

        if total == 0 || polarized == 0 {
            return ConfidenceBreakdown {
                confidence: 0,
                wilson_lower_bound: 0.0,
                volume_bonus: 0.0,
                observed_proportion: 0.0,
                polarized_count: polarized,
                total_relevant_count: total,
            };
        }

        let phat = positive as f64 / polarized as f64;
        let lower_bound = wilson_lower_bound(phat, polarized, self.z);
        let bonus = volume_bonus(total);

        // Volume alone is not evidence of safety
        let confidence = if positive == 0 {
            0
        } else {
            let raw = (WILSON_WEIGHT * lower_bound + VOLUME_WEIGHT * bonus).clamp(0.0, 1.0);
            // ties to even
            (100.0 * raw).round_ties_even() as u8
        };

        ConfidenceBreakdown {
            confidence,
            wilson_lower_bound: lower_bound,
            volume_bonus: bonus,
            observed_proportion: phat,
            polarized_count: polarized,
            total_relevant_count: total,
        }
    }
}

impl Default for ConfidenceEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_Z)
    }
}
