/// Xinanjiang runoff concentration functions.
///
/// Surface runoff is spread by a unit hydrograph; interflow and groundwater
/// pass through linear reservoirs. Runoff depths [mm] are converted to
/// discharge [m³/s] with `area / (3.6 · dt)`.
use smallvec::SmallVec;

use super::constants::{COEFFICIENT_BASIS_HOURS, DEFAULT_UH_ORDINATES, DISCHARGE_FACTOR};

/// Factor converting a runoff depth over `area` km² in `dt` hours into m³/s.
#[inline]
pub fn depth_to_discharge(area: f64, dt: f64) -> f64 {
    area / (DISCHARGE_FACTOR * dt)
}

/// Ordinates of a discrete surface-runoff unit hydrograph.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitHydrograph {
    ordinates: SmallVec<[f64; 8]>,
}

impl UnitHydrograph {
    pub fn new(ordinates: &[f64]) -> Self {
        Self {
            ordinates: SmallVec::from_slice(ordinates),
        }
    }

    pub fn ordinates(&self) -> &[f64] {
        &self.ordinates
    }

    /// Convolve runoff depths with the ordinates.
    ///
    /// Input `i` contributes `input[i] · uh[j] · factor` to output `i + j`.
    /// Contributions landing past the end of the series are dropped, so the
    /// output has the input's length and a late pulse loses its tail.
    pub fn convolve(&self, input: &[f64], factor: f64) -> Vec<f64> {
        let n = input.len();
        let mut output = vec![0.0; n];
        for (i, &depth) in input.iter().enumerate() {
            for (out, &uh) in output[i..].iter_mut().zip(&self.ordinates) {
                *out += depth * uh * factor;
            }
        }
        output
    }
}

impl Default for UnitHydrograph {
    fn default() -> Self {
        Self::new(&DEFAULT_UH_ORDINATES)
    }
}

/// Rescale a daily recession coefficient to a `dt`-hour step: `KK^(dt/24)`.
#[inline]
pub fn timestep_recession(kk: f64, dt: f64) -> f64 {
    kk.powf(dt / COEFFICIENT_BASIS_HOURS)
}

/// Route runoff depths through a linear reservoir.
///
/// `q_i = q_{i-1} · kkd + input[i] · factor · (1 - kkd)` starting from
/// `q0`. Returns the discharge at every step.
pub fn linear_reservoir(input: &[f64], kkd: f64, q0: f64, factor: f64) -> Vec<f64> {
    input
        .iter()
        .scan(q0, |q, &depth| {
            *q = *q * kkd + depth * factor * (1.0 - kkd);
            Some(*q)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -- Unit hydrograph --

    #[test]
    fn default_ordinates_sum_to_one() {
        let uh = UnitHydrograph::default();
        assert_eq!(uh.ordinates(), &[0.3, 0.6, 0.1]);
        assert_relative_eq!(uh.ordinates().iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn unit_impulse_reproduces_ordinates() {
        let factor = depth_to_discharge(500.0, 24.0);
        let out = UnitHydrograph::default().convolve(&[1.0, 0.0, 0.0, 0.0, 0.0], factor);
        assert_relative_eq!(out[0], 0.3 * factor, epsilon = 1e-12);
        assert_relative_eq!(out[1], 0.6 * factor, epsilon = 1e-12);
        assert_relative_eq!(out[2], 0.1 * factor, epsilon = 1e-12);
        assert_eq!(out[3], 0.0);
        assert_eq!(out[4], 0.0);
    }

    #[test]
    fn late_pulse_is_truncated() {
        let out = UnitHydrograph::default().convolve(&[0.0, 0.0, 0.0, 10.0], 1.0);
        assert_eq!(out.len(), 4);
        assert_relative_eq!(out[3], 3.0, epsilon = 1e-12);
        assert_relative_eq!(out.iter().sum::<f64>(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn convolution_is_linear() {
        let uh = UnitHydrograph::default();
        let a = uh.convolve(&[2.0, 0.0, 1.0, 0.0, 0.0, 0.0], 1.0);
        let b = uh.convolve(&[0.0, 4.0, 0.0, 0.0, 3.0, 0.0], 1.0);
        let ab = uh.convolve(&[2.0, 4.0, 1.0, 0.0, 3.0, 0.0], 1.0);
        for i in 0..6 {
            assert_relative_eq!(ab[i], a[i] + b[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn custom_unit_hydrograph_longer_than_default() {
        let uh = UnitHydrograph::new(&[0.1, 0.2, 0.3, 0.2, 0.1, 0.05, 0.03, 0.01, 0.01]);
        let out = uh.convolve(&[1.0; 12], 1.0);
        // Once the whole hydrograph is inside the window, output equals input.
        assert_relative_eq!(out[11], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(UnitHydrograph::default().convolve(&[], 1.0).is_empty());
    }

    // -- Linear reservoir --

    #[test]
    fn daily_recession_is_unchanged() {
        assert_relative_eq!(timestep_recession(0.8, 24.0), 0.8, epsilon = 1e-12);
        assert_relative_eq!(timestep_recession(0.81, 12.0), 0.9, epsilon = 1e-12);
    }

    #[test]
    fn reservoir_without_input_decays_geometrically() {
        let out = linear_reservoir(&[0.0; 4], 0.5, 16.0, 1.0);
        assert_eq!(out, vec![8.0, 4.0, 2.0, 1.0]);
    }

    #[test]
    fn reservoir_converges_to_steady_state() {
        let (area, dt, c) = (500.0, 24.0, 3.0);
        let factor = depth_to_discharge(area, dt);
        let kkd = timestep_recession(0.95, dt);
        let out = linear_reservoir(&vec![c; 2000], kkd, 0.0, factor);
        let steady = c * area / (3.6 * dt);
        assert_relative_eq!(out[1999], steady, epsilon = 1e-9);
        // Monotone approach from below while far from equilibrium.
        assert!(out[..200].windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn reservoir_starting_at_steady_state_stays_there() {
        let factor = depth_to_discharge(100.0, 6.0);
        let steady = 2.0 * factor;
        let out = linear_reservoir(&[2.0; 10], timestep_recession(0.7, 6.0), steady, factor);
        for q in out {
            assert_relative_eq!(q, steady, epsilon = 1e-9);
        }
    }
}
