//! Mood-stability scoring
//!
//! Normalized inverse-variance measure of emotion-intensity volatility over
//! the lookback window, plus a coarse trend label.
//!
//! # Intensity convention
//!
//! Logged intensity is treated uniformly as a *distress proxy*: lower is
//! better. A second-half average that drops below the first-half average
//! reads as `Improving`, a rise reads as `Declining`. Intensity is logged
//! against both positively- and negatively-valenced emotions, so the trend
//! label inherits this convention; it is not a universal "mood is good"
//! signal and downstream consumers should not read it as one.

use crate::models::{StabilityScore, TrendLabel};

/// Maximum population variance on a 1-10 scale (maximal spread)
const VARIANCE_CEILING: f64 = 25.0;

/// Hysteresis band below which a half-to-half shift counts as stable
const TREND_THRESHOLD: f64 = 0.5;

/// Score a chronologically ordered intensity series.
///
/// Fewer than 2 samples is defined as maximally stable (1.0, `Stable`):
/// there is no evidence of volatility to score. Otherwise
/// `stability = max(0, 1 - variance / 25)` using the population variance.
pub fn score_stability(intensities: &[f64]) -> StabilityScore {
    if intensities.len() < 2 {
        return StabilityScore {
            stability: 1.0,
            trend: TrendLabel::Stable,
        };
    }

    let variance = population_variance(intensities);
    let stability = (1.0 - variance / VARIANCE_CEILING).max(0.0);

    StabilityScore {
        stability,
        trend: trend(intensities),
    }
}

fn population_variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

fn trend(intensities: &[f64]) -> TrendLabel {
    let mid = intensities.len() / 2;
    let (first, second) = intensities.split_at(mid);

    let avg = |xs: &[f64]| xs.iter().sum::<f64>() / xs.len() as f64;
    let delta = avg(second) - avg(first);

    if delta < -TREND_THRESHOLD {
        TrendLabel::Improving
    } else if delta > TREND_THRESHOLD {
        TrendLabel::Declining
    } else {
        TrendLabel::Stable
    }
}
