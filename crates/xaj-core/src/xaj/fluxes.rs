/// Xinanjiang flux outputs.
///
/// One per-timestep struct per stage; `#[derive(Fluxes)]` generates the
/// matching column-oriented result type that the stage returns.
use xaj_macros::Fluxes;

/// Runoff generation fluxes for a single timestep.
#[derive(Debug, Clone, Copy, PartialEq, Fluxes)]
#[fluxes(timeseries_name = "RunoffGenerationResult")]
pub struct GenerationFluxes {
    pub actual_et: f64,     // E: actual evapotranspiration [mm]
    pub net_rain: f64,      // PE: rainfall minus actual ET [mm]
    pub runoff: f64,        // R: generated runoff [mm]
    pub soil_moisture: f64, // W: total tension water at step end [mm]
}

/// Source partition fluxes for a single timestep.
#[derive(Debug, Clone, Copy, PartialEq, Fluxes)]
#[fluxes(timeseries_name = "SourcePartitionResult")]
pub struct PartitionFluxes {
    pub impervious: f64,     // RIMP: runoff from impervious area [mm]
    pub surface: f64,        // RS: surface runoff [mm]
    pub interflow: f64,      // RSS: interflow runoff [mm]
    pub groundwater: f64,    // RG: groundwater runoff [mm]
    pub free_water: f64,     // S: free-water storage at step end [mm]
    pub producing_area: f64, // FR: runoff-producing area fraction [-]
}

/// Routed discharge for a single timestep.
#[derive(Debug, Clone, Copy, PartialEq, Fluxes)]
#[fluxes(timeseries_name = "RunoffConcentrationResult")]
pub struct DischargeFluxes {
    pub surface: f64,     // QRS  [m³/s]
    pub interflow: f64,   // QRSS [m³/s]
    pub groundwater: f64, // QRG  [m³/s]
    pub total: f64,       // Q    [m³/s]
}
