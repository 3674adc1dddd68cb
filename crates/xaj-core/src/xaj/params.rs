/// Xinanjiang model parameters.
///
/// Fourteen calibrated coefficients in five groups, plus the derived total
/// soil capacity `WM = WUM + WLM + WDM`. A `Parameters` value only exists
/// once every group has been configured, and it is never mutated while the
/// stages run.
use serde::{Deserialize, Serialize};

use super::constants::{N_PARAMS, PARAM_NAMES};
use crate::error::{Result, XajError};
use crate::traits::ModelParams;

/// Layer water-holding capacities [mm].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilCapacity {
    /// Upper layer capacity WUM.
    pub wum: f64,
    /// Lower layer capacity WLM.
    pub wlm: f64,
    /// Deep layer capacity WDM.
    pub wdm: f64,
}

impl SoilCapacity {
    /// Total capacity WM.
    pub fn total(&self) -> f64 {
        self.wum + self.wlm + self.wdm
    }
}

/// Evapotranspiration coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evapotranspiration {
    /// Pan coefficient K: ratio of potential ET to pan evaporation [-].
    pub k: f64,
    /// Deep-layer evapotranspiration coefficient C [-].
    pub c: f64,
}

/// Shape of the storage-capacity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunoffGeneration {
    /// Storage-capacity curve exponent B [-].
    pub b: f64,
    /// Impervious fraction of the catchment Imp [-].
    pub imp: f64,
}

/// Free-water reservoir coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourcePartition {
    /// Areal mean free-water capacity SM [mm].
    pub sm: f64,
    /// Free-water capacity curve exponent EX [-].
    pub ex: f64,
    /// Daily outflow coefficient to interflow KSS [-].
    pub kss: f64,
    /// Daily outflow coefficient to groundwater KG [-].
    pub kg: f64,
}

impl SourcePartition {
    /// Reject outflow coefficients whose daily sum would drain the
    /// reservoir completely.
    pub fn validate(&self) -> Result<()> {
        if !(self.kss + self.kg < 1.0) {
            return Err(XajError::InvalidParameter(format!(
                "kss + kg must be < 1, got {} + {} = {}",
                self.kss,
                self.kg,
                self.kss + self.kg
            )));
        }
        Ok(())
    }
}

/// Routing coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Concentration {
    /// Daily recession coefficient of the interflow reservoir KKSS [-].
    pub kkss: f64,
    /// Daily recession coefficient of the groundwater reservoir KKG [-].
    pub kkg: f64,
    /// Catchment area [km²].
    pub area: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    soil: SoilCapacity,
    evapotranspiration: Evapotranspiration,
    runoff_generation: RunoffGeneration,
    source_partition: SourcePartition,
    concentration: Concentration,
}

impl Parameters {
    /// Assemble parameters from their groups.
    pub fn new(
        soil: SoilCapacity,
        evapotranspiration: Evapotranspiration,
        runoff_generation: RunoffGeneration,
        source_partition: SourcePartition,
        concentration: Concentration,
    ) -> Result<Self> {
        source_partition.validate()?;
        Ok(Self {
            soil,
            evapotranspiration,
            runoff_generation,
            source_partition,
            concentration,
        })
    }

    pub fn builder() -> ParametersBuilder {
        ParametersBuilder::default()
    }

    pub fn soil(&self) -> SoilCapacity {
        self.soil
    }

    pub fn evapotranspiration(&self) -> Evapotranspiration {
        self.evapotranspiration
    }

    pub fn runoff_generation(&self) -> RunoffGeneration {
        self.runoff_generation
    }

    pub fn source_partition(&self) -> SourcePartition {
        self.source_partition
    }

    pub fn concentration(&self) -> Concentration {
        self.concentration
    }

    /// Total soil water-holding capacity WM [mm].
    pub fn wm(&self) -> f64 {
        self.soil.total()
    }
}

/// Grouped configuration of [`Parameters`].
///
/// Each method configures one group; `build` fails if a group is missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParametersBuilder {
    soil: Option<SoilCapacity>,
    evapotranspiration: Option<Evapotranspiration>,
    runoff_generation: Option<RunoffGeneration>,
    source_partition: Option<SourcePartition>,
    concentration: Option<Concentration>,
}

impl ParametersBuilder {
    pub fn soil_capacity(mut self, wum: f64, wlm: f64, wdm: f64) -> Self {
        self.soil = Some(SoilCapacity { wum, wlm, wdm });
        self
    }

    pub fn evapotranspiration(mut self, k: f64, c: f64) -> Self {
        self.evapotranspiration = Some(Evapotranspiration { k, c });
        self
    }

    pub fn runoff_generation(mut self, b: f64, imp: f64) -> Self {
        self.runoff_generation = Some(RunoffGeneration { b, imp });
        self
    }

    /// Fails with [`XajError::InvalidParameter`] if `kss + kg >= 1`.
    pub fn source_partition(mut self, sm: f64, ex: f64, kss: f64, kg: f64) -> Result<Self> {
        let group = SourcePartition { sm, ex, kss, kg };
        group.validate()?;
        self.source_partition = Some(group);
        Ok(self)
    }

    pub fn concentration(mut self, kkss: f64, kkg: f64, area: f64) -> Self {
        self.concentration = Some(Concentration { kkss, kkg, area });
        self
    }

    pub fn build(self) -> Result<Parameters> {
        Parameters::new(
            self.soil
                .ok_or(XajError::MissingParameterGroup("soil_capacity"))?,
            self.evapotranspiration
                .ok_or(XajError::MissingParameterGroup("evapotranspiration"))?,
            self.runoff_generation
                .ok_or(XajError::MissingParameterGroup("runoff_generation"))?,
            self.source_partition
                .ok_or(XajError::MissingParameterGroup("source_partition"))?,
            self.concentration
                .ok_or(XajError::MissingParameterGroup("concentration"))?,
        )
    }
}

impl ModelParams for Parameters {
    const N_PARAMS: usize = N_PARAMS;
    const PARAM_NAMES: &'static [&'static str] = PARAM_NAMES;

    fn from_array(arr: &[f64]) -> Result<Self> {
        if arr.len() != N_PARAMS {
            return Err(XajError::ParameterCount {
                expected: N_PARAMS,
                found: arr.len(),
            });
        }
        Parameters::builder()
            .soil_capacity(arr[0], arr[1], arr[2])
            .evapotranspiration(arr[3], arr[4])
            .runoff_generation(arr[5], arr[6])
            .source_partition(arr[7], arr[8], arr[9], arr[10])?
            .concentration(arr[11], arr[12], arr[13])
            .build()
    }

    fn to_array(&self) -> Vec<f64> {
        let s = self.soil;
        let e = self.evapotranspiration;
        let g = self.runoff_generation;
        let p = self.source_partition;
        let c = self.concentration;
        vec![
            s.wum, s.wlm, s.wdm, e.k, e.c, g.b, g.imp, p.sm, p.ex, p.kss, p.kg, c.kkss, c.kkg,
            c.area,
        ]
    }
}
