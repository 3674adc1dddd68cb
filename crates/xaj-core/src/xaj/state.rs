/// Xinanjiang state variables.
///
/// Both types are `Copy` values: stages take them by value and hand back a
/// new value, so nothing is shared between independent runs.
/// - `SoilMoistureState`: tension water per soil layer [mm]
/// - `CarryState`: everything needed to continue a simulation in a later window
use super::constants::STATE_SIZE;
use super::params::SoilCapacity;
use crate::error::{Result, XajError};
use crate::traits::ModelState;

/// Tension water content of the upper, lower and deep soil layers [mm].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilMoistureState {
    pub upper: f64,
    pub lower: f64,
    pub deep: f64,
}

impl SoilMoistureState {
    pub fn new(upper: f64, lower: f64, deep: f64) -> Self {
        Self { upper, lower, deep }
    }

    /// Total tension water W.
    pub fn total(&self) -> f64 {
        self.upper + self.lower + self.deep
    }

    /// `true` when every layer lies within `[0, capacity]`.
    pub fn within(&self, capacity: &SoilCapacity) -> bool {
        (0.0..=capacity.wum).contains(&self.upper)
            && (0.0..=capacity.wlm).contains(&self.lower)
            && (0.0..=capacity.wdm).contains(&self.deep)
    }
}

/// Scalar state carried from the end of one simulation window to the start
/// of the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarryState {
    pub soil: SoilMoistureState,
    /// Free-water storage S [mm].
    pub free_water: f64,
    /// Interflow discharge QRSS [m³/s].
    pub interflow: f64,
    /// Groundwater discharge QRG [m³/s].
    pub groundwater: f64,
}

impl CarryState {
    pub fn new(soil: SoilMoistureState, free_water: f64, interflow: f64, groundwater: f64) -> Self {
        Self {
            soil,
            free_water,
            interflow,
            groundwater,
        }
    }
}

impl ModelState for CarryState {
    const STATE_SIZE: usize = STATE_SIZE;

    fn to_vec(&self) -> Vec<f64> {
        vec![
            self.soil.upper,
            self.soil.lower,
            self.soil.deep,
            self.free_water,
            self.interflow,
            self.groundwater,
        ]
    }

    fn from_slice(arr: &[f64]) -> Result<Self> {
        if arr.len() != STATE_SIZE {
            return Err(XajError::StateSize {
                expected: STATE_SIZE,
                found: arr.len(),
            });
        }
        Ok(Self {
            soil: SoilMoistureState::new(arr[0], arr[1], arr[2]),
            free_water: arr[3],
            interflow: arr[4],
            groundwater: arr[5],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity() -> SoilCapacity {
        SoilCapacity {
            wum: 20.0,
            wlm: 60.0,
            wdm: 40.0,
        }
    }

    #[test]
    fn total_sums_layers() {
        let w = SoilMoistureState::new(10.0, 30.0, 20.0);
        assert_eq!(w.total(), 60.0);
    }

    #[test]
    fn within_checks_every_layer() {
        assert!(SoilMoistureState::new(20.0, 0.0, 40.0).within(&capacity()));
        assert!(!SoilMoistureState::new(21.0, 0.0, 0.0).within(&capacity()));
        assert!(!SoilMoistureState::new(0.0, -1.0, 0.0).within(&capacity()));
        assert!(!SoilMoistureState::new(0.0, 0.0, 41.0).within(&capacity()));
    }

    #[test]
    fn to_vec_from_slice_roundtrip() {
        let s = CarryState::new(SoilMoistureState::new(10.0, 30.0, 20.0), 5.0, 10.0, 20.0);
        let v = s.to_vec();
        assert_eq!(v.len(), CarryState::STATE_SIZE);
        assert_eq!(CarryState::from_slice(&v).unwrap(), s);
    }

    #[test]
    fn from_slice_wrong_length() {
        assert!(CarryState::from_slice(&[1.0]).is_err());
        assert!(CarryState::from_slice(&[0.0; 7]).is_err());
    }
}
