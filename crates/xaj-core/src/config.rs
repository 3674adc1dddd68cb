//! TOML simulation configuration.
//!
//! ```toml
//! dt_hours = 24.0
//!
//! [soil]
//! wum = 20.0
//! wlm = 60.0
//! wdm = 40.0
//!
//! [evapotranspiration]
//! k = 0.9
//! c = 0.15
//!
//! [runoff_generation]
//! b = 0.3
//! imp = 0.02
//!
//! [source_partition]
//! sm = 20.0
//! ex = 1.5
//! kss = 0.4
//! kg = 0.3
//!
//! [concentration]
//! kkss = 0.8
//! kkg = 0.98
//! area = 500.0
//!
//! [initial]
//! wu0 = 10.0
//! wl0 = 30.0
//! wd0 = 20.0
//! s0 = 5.0
//! qrss0 = 10.0
//! qrg0 = 20.0
//! ```
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::forcing::Resolution;
use crate::xaj::params::{
    Concentration, Evapotranspiration, Parameters, RunoffGeneration, SoilCapacity, SourcePartition,
};
use crate::xaj::state::{CarryState, SoilMoistureState};

fn default_dt_hours() -> f64 {
    24.0
}

/// Initial conditions of a simulation window. Missing keys default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InitialConditions {
    /// Upper, lower and deep layer tension water [mm].
    pub wu0: f64,
    pub wl0: f64,
    pub wd0: f64,
    /// Free-water storage [mm].
    pub s0: f64,
    /// Interflow and groundwater discharge [m³/s].
    pub qrss0: f64,
    pub qrg0: f64,
}

impl From<InitialConditions> for CarryState {
    fn from(init: InitialConditions) -> Self {
        CarryState::new(
            SoilMoistureState::new(init.wu0, init.wl0, init.wd0),
            init.s0,
            init.qrss0,
            init.qrg0,
        )
    }
}

/// Parameter groups, initial state and timestep of one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    #[serde(default = "default_dt_hours")]
    pub dt_hours: f64,
    pub soil: SoilCapacity,
    pub evapotranspiration: Evapotranspiration,
    pub runoff_generation: RunoffGeneration,
    pub source_partition: SourcePartition,
    pub concentration: Concentration,
    #[serde(default)]
    pub initial: InitialConditions,
}

impl SimulationConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading simulation config");
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// Build validated parameters from the configured groups.
    pub fn parameters(&self) -> Result<Parameters> {
        let SoilCapacity { wum, wlm, wdm } = self.soil;
        let Evapotranspiration { k, c } = self.evapotranspiration;
        let RunoffGeneration { b, imp } = self.runoff_generation;
        let SourcePartition { sm, ex, kss, kg } = self.source_partition;
        let Concentration { kkss, kkg, area } = self.concentration;
        Parameters::builder()
            .soil_capacity(wum, wlm, wdm)
            .evapotranspiration(k, c)
            .runoff_generation(b, imp)
            .source_partition(sm, ex, kss, kg)?
            .concentration(kkss, kkg, area)
            .build()
    }

    pub fn resolution(&self) -> Result<Resolution> {
        Resolution::from_hours(self.dt_hours)
    }

    pub fn initial_state(&self) -> CarryState {
        self.initial.into()
    }
}
