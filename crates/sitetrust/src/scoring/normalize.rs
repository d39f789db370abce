use super::parameter::ScoringError;

/// Map a raw measurement onto a risk in `[0, 1]`, where reaching `threshold` means no risk.
///
/// `risk = clamp((threshold - value) / threshold, 0, 1)`: values at or above the threshold
/// yield `0.0`, values at or below zero yield `1.0`. Collaborators use this to turn
/// "higher is better" measurements (certificate days left, response budget) into parameters.
/// A NaN measurement counts as maximum risk.
pub fn normalize_piecewise(value: f64, threshold: f64) -> Result<f64, ScoringError> {
    if !(threshold.is_finite() && threshold > 0.0) {
        return Err(ScoringError::InvalidThreshold(threshold));
    }

    let risk = (threshold - value) / threshold;
    if risk.is_nan() {
        return Ok(1.0);
    }
    Ok(risk.clamp(0.0, 1.0))
}
