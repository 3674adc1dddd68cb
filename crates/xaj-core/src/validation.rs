//! Precondition checks on the series handed to the model stages.
use crate::error::{Result, XajError};

/// Check that every named series has the same length as the first one.
///
/// Returns the common length. The first mismatching series is reported
/// together with the series its length was compared against.
pub fn check_identical_length(series: &[(&'static str, &[f64])]) -> Result<usize> {
    let (&(expected_name, first), rest) = series.split_first().ok_or(XajError::NoSeries)?;
    let expected = first.len();
    for &(name, values) in rest {
        if values.len() != expected {
            return Err(XajError::LengthMismatch {
                expected_name,
                expected,
                name,
                found: values.len(),
            });
        }
    }
    Ok(expected)
}

/// Reject a series containing NaN or infinite values.
pub fn check_finite(name: &'static str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(XajError::NonFinite { name, index }),
        None => Ok(()),
    }
}

/// Timestep lengths must be finite and positive (hours).
pub fn check_timestep(dt: f64) -> Result<f64> {
    if dt.is_finite() && dt > 0.0 {
        Ok(dt)
    } else {
        Err(XajError::InvalidTimestep(dt))
    }
}
