//! Error type shared by every fallible operation in the crate.

/// Errors raised by configuration, input validation and flat-array conversion.
///
/// Numeric degeneracies inside the recurrences (zero-variance observations,
/// fractional powers of negative bases) are not errors; they surface as
/// IEEE NaN or infinity in the output series.
#[derive(Debug, thiserror::Error)]
pub enum XajError {
    #[error("series `{name}` has length {found}, expected {expected} (length of `{expected_name}`)")]
    LengthMismatch {
        expected_name: &'static str,
        expected: usize,
        name: &'static str,
        found: usize,
    },

    #[error("no series supplied for length validation")]
    NoSeries,

    #[error("series `{0}` is empty")]
    EmptySeries(&'static str),

    #[error("series `{name}` contains a non-finite value at index {index}")]
    NonFinite { name: &'static str, index: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("parameter group `{0}` was not configured")]
    MissingParameterGroup(&'static str),

    #[error("timestep length must be a positive number of hours, got {0}")]
    InvalidTimestep(f64),

    #[error("expected {expected} parameters, got {found}")]
    ParameterCount { expected: usize, found: usize },

    #[error("expected {expected} state elements, got {found}")]
    StateSize { expected: usize, found: usize },

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, XajError>;
