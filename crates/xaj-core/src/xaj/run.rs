/// Xinanjiang model orchestration functions.
///
/// - `generation_step()` / `partition_step()`: one timestep → (state, fluxes)
/// - `compute_runoff_generation()`, `compute_source_partition()`,
///   `compute_runoff_concentration()`: the three stages over a timeseries
/// - `simulate()`: all three stages plus the final carry-state
/// - `GenerationStage`, `PartitionStage`: the stepping stages as
///   [`HydrologicalModel`]s
use tracing::{debug, trace, warn};

use super::fluxes::{
    GenerationFluxes, PartitionFluxes, RunoffConcentrationResult, RunoffGenerationResult,
    SourcePartitionResult,
};
use super::params::Parameters;
use super::processes;
use super::routing::{self, UnitHydrograph};
use super::state::{CarryState, SoilMoistureState};
use crate::error::Result;
use crate::traits::HydrologicalModel;
use crate::forcing::ForcingData;
use crate::validation::{check_identical_length, check_timestep};

// -- Runoff generation --

/// Execute one runoff-generation timestep.
///
/// Takes the layered soil moisture at the start of the step and returns the
/// moisture at its end together with the step's fluxes.
pub fn generation_step(
    state: SoilMoistureState,
    params: &Parameters,
    precip: f64,
    pan_evap: f64,
) -> (SoilMoistureState, GenerationFluxes) {
    let soil = params.soil();
    let et = params.evapotranspiration();
    let shape = params.runoff_generation();
    let wm = soil.total();
    let wmmax = processes::max_point_capacity(wm, shape.b, shape.imp);

    // Step 1: Actual evapotranspiration from pan evaporation
    let ep = pan_evap * et.k;
    let e = processes::evapotranspiration(ep, precip, state.upper, state.lower, soil.wlm, et.c);

    // Step 2: Net rain
    let pe = precip - e;

    // Step 3: Runoff from the storage-capacity curve
    let r = processes::generated_runoff(pe, state.total(), wm, wmmax, shape.b);

    // Step 4: Remaining water goes to (or comes from) the soil layers
    let new_state = processes::redistribute_soil_moisture(state, pe - r, &soil);

    let fluxes = GenerationFluxes {
        actual_et: e,
        net_rain: pe,
        runoff: r,
        soil_moisture: new_state.total(),
    };

    (new_state, fluxes)
}

/// Forcing for one runoff-generation timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationForcing {
    /// Rainfall [mm].
    pub precip: f64,
    /// Pan evaporation [mm].
    pub pan_evap: f64,
}

/// The runoff generation stage: layered soil moisture carried between steps.
pub struct GenerationStage;

impl HydrologicalModel for GenerationStage {
    type Params = Parameters;
    type State = SoilMoistureState;
    type Forcing = GenerationForcing;
    type Fluxes = GenerationFluxes;
    type FluxesTimeseries = RunoffGenerationResult;
    type Context = ();

    fn prepare(_params: &Parameters) {}

    fn initialize_state(_params: &Parameters) -> SoilMoistureState {
        SoilMoistureState::new(0.0, 0.0, 0.0)
    }

    fn step(
        state: &SoilMoistureState,
        params: &Parameters,
        forcing: &GenerationForcing,
        _context: &(),
    ) -> (SoilMoistureState, GenerationFluxes) {
        let (new_state, fluxes) = generation_step(*state, params, forcing.precip, forcing.pan_evap);
        trace!(pe = fluxes.net_rain, r = fluxes.runoff, w = fluxes.soil_moisture, "generation step");
        (new_state, fluxes)
    }
}

/// Run runoff generation over rainfall and pan-evaporation series.
///
/// Fails if the two series differ in length. The final soil state is not
/// returned; use [`simulate`] to continue a run in a later window.
pub fn compute_runoff_generation(
    params: &Parameters,
    precip: &[f64],
    pan_evap: &[f64],
    initial: SoilMoistureState,
) -> Result<RunoffGenerationResult> {
    generate(params, precip, pan_evap, initial).map(|(result, _)| result)
}

fn generate(
    params: &Parameters,
    precip: &[f64],
    pan_evap: &[f64],
    initial: SoilMoistureState,
) -> Result<(RunoffGenerationResult, SoilMoistureState)> {
    let n = check_identical_length(&[("precip", precip), ("pan_evap", pan_evap)])?;
    debug!(n, w0 = initial.total(), "runoff generation");
    if !initial.within(&params.soil()) {
        warn!(?initial, "initial soil moisture outside layer capacities");
    }

    let forcing: Vec<GenerationForcing> = precip
        .iter()
        .zip(pan_evap)
        .map(|(&precip, &pan_evap)| GenerationForcing { precip, pan_evap })
        .collect();

    Ok(GenerationStage::run_with_final_state(
        params,
        &forcing,
        Some(&initial),
    ))
}

// -- Source partition --

/// Run-constant values of the source partition stage.
#[derive(Debug, Clone, Copy)]
pub struct PartitionContext {
    /// Interflow outflow coefficient for the timestep.
    pub kssd: f64,
    /// Groundwater outflow coefficient for the timestep.
    pub kgd: f64,
    /// Maximum point free-water capacity `(1 + EX)·SM`.
    pub smax: f64,
}

impl PartitionContext {
    /// `dt` must already be a validated timestep length in hours.
    pub fn new(params: &Parameters, dt: f64) -> Self {
        let sp = params.source_partition();
        let (kssd, kgd) = processes::timestep_outflow_coefficients(sp.kss, sp.kg, dt);
        Self {
            kssd,
            kgd,
            smax: (1.0 + sp.ex) * sp.sm,
        }
    }
}

/// Execute one source-partition timestep.
///
/// Takes the free-water storage at the start of the step and the step's
/// generation fluxes; returns the storage at its end and the four sources.
pub fn partition_step(
    s: f64,
    params: &Parameters,
    context: &PartitionContext,
    generation: &GenerationFluxes,
) -> (f64, PartitionFluxes) {
    let sp = params.source_partition();
    let shape = params.runoff_generation();
    let pe = generation.net_rain;

    let au = processes::free_water_ordinate(s, sp.sm, context.smax, sp.ex);
    let fr = processes::producing_area(
        pe,
        generation.runoff,
        generation.soil_moisture,
        params.wm(),
        shape.b,
        shape.imp,
    );
    let coef = processes::free_water_after_inflow(pe, s, au, sp.sm, context.smax, sp.ex);

    let rimp = pe * shape.imp;
    let rs = ((pe + s - coef) * fr).max(0.0);
    let rss = coef * context.kssd * fr;
    let rg = coef * context.kgd * fr;
    let new_s = coef * (1.0 - context.kssd - context.kgd);

    let fluxes = PartitionFluxes {
        impervious: rimp,
        surface: rs,
        interflow: rss,
        groundwater: rg,
        free_water: new_s,
        producing_area: fr,
    };

    (new_s, fluxes)
}

/// Parameters of the source partition stage: the model parameters plus the
/// timestep length the outflow coefficients are rescaled to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionParams {
    pub model: Parameters,
    /// Timestep length [h].
    pub dt: f64,
}

/// The source partition stage: free-water storage carried between steps.
pub struct PartitionStage;

impl HydrologicalModel for PartitionStage {
    type Params = PartitionParams;
    type State = f64;
    type Forcing = GenerationFluxes;
    type Fluxes = PartitionFluxes;
    type FluxesTimeseries = SourcePartitionResult;
    type Context = PartitionContext;

    fn prepare(params: &PartitionParams) -> PartitionContext {
        PartitionContext::new(&params.model, params.dt)
    }

    fn initialize_state(_params: &PartitionParams) -> f64 {
        0.0
    }

    fn step(
        state: &f64,
        params: &PartitionParams,
        forcing: &GenerationFluxes,
        context: &PartitionContext,
    ) -> (f64, PartitionFluxes) {
        partition_step(*state, &params.model, context, forcing)
    }
}

/// Split generated runoff into impervious, surface, interflow and
/// groundwater sources.
///
/// `s0` is the free-water storage at the start of the series and `dt` the
/// timestep length in hours.
pub fn compute_source_partition(
    params: &Parameters,
    generation: &RunoffGenerationResult,
    s0: f64,
    dt: f64,
) -> Result<SourcePartitionResult> {
    let n = check_identical_length(&generation.columns())?;
    let dt = check_timestep(dt)?;
    debug!(n, s0, dt, "source partition");

    let forcing: Vec<GenerationFluxes> = generation
        .actual_et
        .iter()
        .zip(&generation.net_rain)
        .zip(&generation.runoff)
        .zip(&generation.soil_moisture)
        .map(
            |(((&actual_et, &net_rain), &runoff), &soil_moisture)| GenerationFluxes {
                actual_et,
                net_rain,
                runoff,
                soil_moisture,
            },
        )
        .collect();

    let stage = PartitionParams { model: *params, dt };
    Ok(PartitionStage::run(&stage, &forcing, Some(&s0)))
}

// -- Runoff concentration --

/// Route the runoff sources to the outlet with the default unit hydrograph.
///
/// `qrss0` and `qrg0` are the interflow and groundwater discharges [m³/s]
/// before the first step.
pub fn compute_runoff_concentration(
    params: &Parameters,
    sources: &SourcePartitionResult,
    qrss0: f64,
    qrg0: f64,
    dt: f64,
) -> Result<RunoffConcentrationResult> {
    compute_runoff_concentration_with(
        params,
        &UnitHydrograph::default(),
        sources,
        qrss0,
        qrg0,
        dt,
    )
}

/// Route the runoff sources to the outlet with a caller-supplied unit
/// hydrograph for surface and impervious runoff.
pub fn compute_runoff_concentration_with(
    params: &Parameters,
    unit_hydrograph: &UnitHydrograph,
    sources: &SourcePartitionResult,
    qrss0: f64,
    qrg0: f64,
    dt: f64,
) -> Result<RunoffConcentrationResult> {
    let n = check_identical_length(&sources.columns())?;
    let dt = check_timestep(dt)?;
    debug!(n, qrss0, qrg0, dt, "runoff concentration");

    let conc = params.concentration();
    let factor = routing::depth_to_discharge(conc.area, dt);

    let direct: Vec<f64> = sources
        .surface
        .iter()
        .zip(&sources.impervious)
        .map(|(rs, rimp)| rs + rimp)
        .collect();
    let surface = unit_hydrograph.convolve(&direct, factor);
    let interflow = routing::linear_reservoir(
        &sources.interflow,
        routing::timestep_recession(conc.kkss, dt),
        qrss0,
        factor,
    );
    let groundwater = routing::linear_reservoir(
        &sources.groundwater,
        routing::timestep_recession(conc.kkg, dt),
        qrg0,
        factor,
    );
    let total = surface
        .iter()
        .zip(&interflow)
        .zip(&groundwater)
        .map(|((qrs, qrss), qrg)| qrs + qrss + qrg)
        .collect();

    Ok(RunoffConcentrationResult {
        surface,
        interflow,
        groundwater,
        total,
    })
}

// -- Full pipeline --

/// Results of all three stages for one simulation window.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub generation: RunoffGenerationResult,
    pub partition: SourcePartitionResult,
    pub concentration: RunoffConcentrationResult,
    /// State at the end of the window, ready to seed the next one.
    pub final_state: CarryState,
}

/// Run generation, partition and concentration in sequence.
pub fn simulate(
    params: &Parameters,
    forcing: &ForcingData,
    initial: CarryState,
) -> Result<Simulation> {
    let dt = forcing.dt();
    let (generation, soil) = generate(params, &forcing.precip, &forcing.pan_evap, initial.soil)?;
    let partition = compute_source_partition(params, &generation, initial.free_water, dt)?;
    let concentration = compute_runoff_concentration(
        params,
        &partition,
        initial.interflow,
        initial.groundwater,
        dt,
    )?;

    let final_state = CarryState {
        soil,
        free_water: partition
            .free_water
            .last()
            .copied()
            .unwrap_or(initial.free_water),
        interflow: concentration
            .interflow
            .last()
            .copied()
            .unwrap_or(initial.interflow),
        groundwater: concentration
            .groundwater
            .last()
            .copied()
            .unwrap_or(initial.groundwater),
    };

    Ok(Simulation {
        generation,
        partition,
        concentration,
        final_state,
    })
}
