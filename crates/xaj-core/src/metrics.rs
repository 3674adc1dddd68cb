//! Goodness-of-fit scores for simulated discharge.
//!
//! All metrics take observed and simulated slices of equal length and
//! return a scalar score, or a length-mismatch error.
use tracing::warn;

use crate::error::Result;
use crate::validation::check_identical_length;

fn paired_len(observed: &[f64], simulated: &[f64]) -> Result<usize> {
    check_identical_length(&[("observed", observed), ("simulated", simulated)])
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Nash-Sutcliffe Efficiency. Range: (-inf, 1], 1 = perfect.
///
/// `1 - Σ(obs - sim)² / Σ(obs - mean(obs))²`. A constant observed series
/// has no variance to explain and scores `-inf`.
pub fn nse(observed: &[f64], simulated: &[f64]) -> Result<f64> {
    paired_len(observed, simulated)?;
    let mean_obs = mean(observed);
    let numerator: f64 = observed
        .iter()
        .zip(simulated)
        .map(|(o, s)| (o - s).powi(2))
        .sum();
    let denominator: f64 = observed.iter().map(|o| (o - mean_obs).powi(2)).sum();
    if denominator == 0.0 {
        warn!(n = observed.len(), "observed series has zero variance; NSE is undefined");
        return Ok(f64::NEG_INFINITY);
    }
    Ok(1.0 - numerator / denominator)
}

/// Kling-Gupta Efficiency. Range: (-inf, 1], 1 = perfect.
pub fn kge(observed: &[f64], simulated: &[f64]) -> Result<f64> {
    let n = paired_len(observed, simulated)? as f64;
    let mean_o = mean(observed);
    let mean_s = mean(simulated);
    let std_o = (observed.iter().map(|o| (o - mean_o).powi(2)).sum::<f64>() / n).sqrt();
    let std_s = (simulated.iter().map(|s| (s - mean_s).powi(2)).sum::<f64>() / n).sqrt();

    let r = if std_o == 0.0 || std_s == 0.0 {
        0.0
    } else {
        observed
            .iter()
            .zip(simulated)
            .map(|(o, s)| (o - mean_o) * (s - mean_s))
            .sum::<f64>()
            / (n * std_o * std_s)
    };
    let alpha = if std_o == 0.0 { 0.0 } else { std_s / std_o };
    let beta = if mean_o == 0.0 { 0.0 } else { mean_s / mean_o };

    Ok(1.0 - ((r - 1.0).powi(2) + (alpha - 1.0).powi(2) + (beta - 1.0).powi(2)).sqrt())
}

/// Percent bias. Optimal = 0, positive = overestimation.
pub fn pbias(observed: &[f64], simulated: &[f64]) -> Result<f64> {
    paired_len(observed, simulated)?;
    let sum_obs: f64 = observed.iter().sum();
    if sum_obs == 0.0 {
        warn!("observed series sums to zero; PBIAS is undefined");
        return Ok(f64::INFINITY);
    }
    let diff_sum: f64 = simulated.iter().zip(observed).map(|(s, o)| s - o).sum();
    Ok(100.0 * diff_sum / sum_obs)
}

/// Root mean square error. Range: [0, inf), 0 = perfect.
pub fn rmse(observed: &[f64], simulated: &[f64]) -> Result<f64> {
    let n = paired_len(observed, simulated)? as f64;
    let mse = observed
        .iter()
        .zip(simulated)
        .map(|(o, s)| (o - s).powi(2))
        .sum::<f64>()
        / n;
    Ok(mse.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XajError;
    use approx::assert_relative_eq;

    // --- NSE tests ---

    #[test]
    fn nse_perfect_match() {
        let obs = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(nse(&obs, &obs).unwrap(), 1.0);
    }

    #[test]
    fn nse_mean_simulation_gives_zero() {
        let obs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let sim = [3.0; 5];
        assert_relative_eq!(nse(&obs, &sim).unwrap(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn nse_constant_observed_returns_neg_inf() {
        let obs = [5.0; 5];
        let sim = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(nse(&obs, &sim).unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn nse_known_value() {
        // num = 0.01 + 0.04 + 0.04 + 0.01 + 0.01 = 0.11, den = 10
        let obs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let sim = [1.1, 2.2, 2.8, 4.1, 4.9];
        assert_relative_eq!(nse(&obs, &sim).unwrap(), 0.989, epsilon = 1e-10);
    }

    #[test]
    fn nse_rejects_mismatched_lengths() {
        let err = nse(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            XajError::LengthMismatch {
                expected_name: "observed",
                expected: 3,
                name: "simulated",
                found: 2,
            }
        ));
    }

    #[test]
    fn nse_on_routed_discharge() {
        let q = [
            27.88375712938209,
            40.51119189287556,
            54.63943638608151,
            33.65967506427124,
            24.867662422013748,
        ];
        assert_relative_eq!(nse(&q, &q).unwrap(), 1.0);
        let lagged = [q[0], q[0], q[1], q[2], q[3]];
        assert!(nse(&q, &lagged).unwrap() < 1.0);
    }

    // --- KGE tests ---

    #[test]
    fn kge_perfect_match() {
        let obs = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(kge(&obs, &obs).unwrap(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn kge_bias_reduces_score() {
        let obs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let sim = [2.0, 3.0, 4.0, 5.0, 6.0];
        assert!(kge(&obs, &sim).unwrap() < 1.0);
    }

    #[test]
    fn kge_zero_variance_observed_is_finite() {
        let obs = [3.0; 5];
        let sim = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(kge(&obs, &sim).unwrap().is_finite());
    }

    #[test]
    fn kge_rejects_mismatched_lengths() {
        assert!(kge(&[1.0], &[1.0, 2.0]).is_err());
    }

    // --- PBIAS tests ---

    #[test]
    fn pbias_sign_follows_bias() {
        let obs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let high = [2.0, 3.0, 4.0, 5.0, 6.0];
        let low = [0.0, 1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(pbias(&obs, &obs).unwrap(), 0.0, epsilon = 1e-10);
        assert!(pbias(&obs, &high).unwrap() > 0.0);
        assert!(pbias(&obs, &low).unwrap() < 0.0);
    }

    #[test]
    fn pbias_known_value() {
        let obs = [10.0, 20.0, 30.0];
        let sim = [12.0, 22.0, 28.0];
        assert_relative_eq!(pbias(&obs, &sim).unwrap(), 100.0 * 2.0 / 60.0, epsilon = 1e-10);
    }

    #[test]
    fn pbias_zero_observed_returns_inf() {
        let obs = [0.0; 5];
        let sim = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(pbias(&obs, &sim).unwrap(), f64::INFINITY);
    }

    // --- RMSE tests ---

    #[test]
    fn rmse_constant_error() {
        let obs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let sim = [2.0, 3.0, 4.0, 5.0, 6.0];
        assert_relative_eq!(rmse(&obs, &sim).unwrap(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn rmse_known_value() {
        let obs = [1.0, 2.0, 3.0];
        let sim = [1.0, 2.0, 4.0];
        assert_relative_eq!(rmse(&obs, &sim).unwrap(), (1.0_f64 / 3.0).sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn rmse_rejects_mismatched_lengths() {
        assert!(rmse(&[1.0, 2.0], &[]).is_err());
    }
}
