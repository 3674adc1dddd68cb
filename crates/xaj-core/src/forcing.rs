/// Temporal resolution of forcing data.
///
/// Xinanjiang coefficients (KSS, KG, KKSS, KKG) are calibrated on a 24-hour
/// basis and rescaled by `hours / 24` inside the stages.
use crate::error::{Result, XajError};
use crate::validation::{check_finite, check_identical_length, check_timestep};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    Hourly,
    ThreeHourly,
    SixHourly,
    Daily,
    /// Arbitrary timestep length in hours.
    Custom(f64),
}

impl Resolution {
    /// Timestep length in hours.
    pub fn hours(self) -> f64 {
        match self {
            Resolution::Hourly => 1.0,
            Resolution::ThreeHourly => 3.0,
            Resolution::SixHourly => 6.0,
            Resolution::Daily => 24.0,
            Resolution::Custom(h) => h,
        }
    }

    /// Map a timestep length onto the named resolutions, falling back to
    /// `Custom`.
    pub fn from_hours(hours: f64) -> Result<Self> {
        Ok(match check_timestep(hours)? {
            h if h == 1.0 => Resolution::Hourly,
            h if h == 3.0 => Resolution::ThreeHourly,
            h if h == 6.0 => Resolution::SixHourly,
            h if h == 24.0 => Resolution::Daily,
            h => Resolution::Custom(h),
        })
    }
}

/// Validated forcing data for a Xinanjiang run.
///
/// Rainfall and pan evaporation share one length, contain no NaN or
/// infinite values and are non-empty.
#[derive(Debug, Clone)]
pub struct ForcingData {
    pub precip: Vec<f64>,
    pub pan_evap: Vec<f64>,
    pub resolution: Resolution,
}

impl ForcingData {
    pub fn new(precip: Vec<f64>, pan_evap: Vec<f64>, resolution: Resolution) -> Result<Self> {
        let n = check_identical_length(&[
            ("precip", precip.as_slice()),
            ("pan_evap", pan_evap.as_slice()),
        ])?;
        if n == 0 {
            return Err(XajError::EmptySeries("precip"));
        }
        check_finite("precip", &precip)?;
        check_finite("pan_evap", &pan_evap)?;
        // Re-validates custom lengths.
        let resolution = Resolution::from_hours(resolution.hours())?;
        Ok(Self {
            precip,
            pan_evap,
            resolution,
        })
    }

    /// Timestep length in hours.
    pub fn dt(&self) -> f64 {
        self.resolution.hours()
    }

    /// Number of timesteps.
    pub fn len(&self) -> usize {
        self.precip.len()
    }

    /// Returns `true` if there are no timesteps.
    pub fn is_empty(&self) -> bool {
        self.precip.is_empty()
    }
}
