use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::convert::{checked_slice, checked_slice_min, contiguous_slice, value_error};

use xaj_core::forcing::{ForcingData, Resolution};
use xaj_core::traits::{ModelParams, ModelState};
use xaj_core::validation::check_identical_length;
use xaj_core::xaj::fluxes::{
    GenerationFluxes, PartitionFluxes, RunoffConcentrationResult, RunoffGenerationResult,
    SourcePartitionResult,
};
use xaj_core::xaj::params::Parameters;
use xaj_core::xaj::routing::UnitHydrograph;
use xaj_core::xaj::run::{self, PartitionContext};
use xaj_core::xaj::state::{CarryState, SoilMoistureState};

// ---------------------------------------------------------------------------
// Typed pyclass result objects
// ---------------------------------------------------------------------------

define_series_class! {
    /// Runoff generation series.
    pub struct GenerationSeries from RunoffGenerationResult {
        actual_et, net_rain, runoff, soil_moisture,
    }
}

define_series_class! {
    /// Source partition series.
    pub struct PartitionSeries from SourcePartitionResult {
        impervious, surface, interflow, groundwater, free_water, producing_area,
    }
}

define_series_class! {
    /// Routed discharge series [m³/s].
    pub struct DischargeSeries from RunoffConcentrationResult {
        surface, interflow, groundwater, total,
    }
}

define_step_class! {
    /// Runoff generation fluxes for one timestep.
    pub struct GenerationStepFluxes from GenerationFluxes {
        actual_et, net_rain, runoff, soil_moisture,
    }
}

define_step_class! {
    /// Source partition fluxes for one timestep.
    pub struct PartitionStepFluxes from PartitionFluxes {
        impervious, surface, interflow, groundwater, free_water, producing_area,
    }
}

/// Results of a full three-stage run.
#[pyclass(frozen)]
pub struct XajResult {
    #[pyo3(get)]
    pub generation: Py<GenerationSeries>,
    #[pyo3(get)]
    pub partition: Py<PartitionSeries>,
    #[pyo3(get)]
    pub discharge: Py<DischargeSeries>,
    /// `[wu, wl, wd, s, qrss, qrg]` at the end of the run.
    #[pyo3(get)]
    pub final_state: Py<PyArray1<f64>>,
}

fn parse_params(params: &PyReadonlyArray1<'_, f64>) -> PyResult<Parameters> {
    let slice = checked_slice(params, Parameters::N_PARAMS, "params")?;
    Parameters::from_array(slice).map_err(value_error)
}

fn parse_soil(state: &PyReadonlyArray1<'_, f64>) -> PyResult<SoilMoistureState> {
    let s = checked_slice(state, 3, "soil_state")?;
    Ok(SoilMoistureState::new(s[0], s[1], s[2]))
}

// ---------------------------------------------------------------------------
// Stage functions (dict-returning)
// ---------------------------------------------------------------------------

#[pyfunction]
fn xaj_runoff_generation<'py>(
    py: Python<'py>,
    params: PyReadonlyArray1<'py, f64>,
    precip: PyReadonlyArray1<'py, f64>,
    pan_evap: PyReadonlyArray1<'py, f64>,
    soil_state: PyReadonlyArray1<'py, f64>,
) -> PyResult<Bound<'py, PyDict>> {
    let p = parse_params(&params)?;
    let w0 = parse_soil(&soil_state)?;
    let result = run::compute_runoff_generation(
        &p,
        contiguous_slice(&precip)?,
        contiguous_slice(&pan_evap)?,
        w0,
    )
    .map_err(value_error)?;

    GenerationSeries::from_series(py, result).to_dict(py)
}

#[pyfunction]
#[pyo3(signature = (params, net_rain, runoff, soil_moisture, s0, dt=24.0))]
fn xaj_source_partition<'py>(
    py: Python<'py>,
    params: PyReadonlyArray1<'py, f64>,
    net_rain: PyReadonlyArray1<'py, f64>,
    runoff: PyReadonlyArray1<'py, f64>,
    soil_moisture: PyReadonlyArray1<'py, f64>,
    s0: f64,
    dt: f64,
) -> PyResult<Bound<'py, PyDict>> {
    let p = parse_params(&params)?;
    let net_rain = contiguous_slice(&net_rain)?;
    let runoff = contiguous_slice(&runoff)?;
    let soil_moisture = contiguous_slice(&soil_moisture)?;
    let n = check_identical_length(&[
        ("net_rain", net_rain),
        ("runoff", runoff),
        ("soil_moisture", soil_moisture),
    ])
    .map_err(value_error)?;

    // Actual ET does not enter the partition.
    let generation = RunoffGenerationResult {
        actual_et: vec![0.0; n],
        net_rain: net_rain.to_vec(),
        runoff: runoff.to_vec(),
        soil_moisture: soil_moisture.to_vec(),
    };
    let result = run::compute_source_partition(&p, &generation, s0, dt).map_err(value_error)?;

    PartitionSeries::from_series(py, result).to_dict(py)
}

#[pyfunction]
#[pyo3(signature = (params, impervious, surface, interflow, groundwater, qrss0, qrg0, dt=24.0, unit_hydrograph=None))]
#[allow(clippy::too_many_arguments)]
fn xaj_runoff_concentration<'py>(
    py: Python<'py>,
    params: PyReadonlyArray1<'py, f64>,
    impervious: PyReadonlyArray1<'py, f64>,
    surface: PyReadonlyArray1<'py, f64>,
    interflow: PyReadonlyArray1<'py, f64>,
    groundwater: PyReadonlyArray1<'py, f64>,
    qrss0: f64,
    qrg0: f64,
    dt: f64,
    unit_hydrograph: Option<PyReadonlyArray1<'py, f64>>,
) -> PyResult<Bound<'py, PyDict>> {
    let p = parse_params(&params)?;
    let impervious = contiguous_slice(&impervious)?;
    let surface = contiguous_slice(&surface)?;
    let interflow = contiguous_slice(&interflow)?;
    let groundwater = contiguous_slice(&groundwater)?;
    let n = check_identical_length(&[
        ("impervious", impervious),
        ("surface", surface),
        ("interflow", interflow),
        ("groundwater", groundwater),
    ])
    .map_err(value_error)?;

    let uh = match &unit_hydrograph {
        Some(arr) => UnitHydrograph::new(checked_slice_min(arr, 1, "unit_hydrograph")?),
        None => UnitHydrograph::default(),
    };

    // Free water and producing area are not routed.
    let sources = SourcePartitionResult {
        impervious: impervious.to_vec(),
        surface: surface.to_vec(),
        interflow: interflow.to_vec(),
        groundwater: groundwater.to_vec(),
        free_water: vec![0.0; n],
        producing_area: vec![0.0; n],
    };
    let result = run::compute_runoff_concentration_with(&p, &uh, &sources, qrss0, qrg0, dt)
        .map_err(value_error)?;

    DischargeSeries::from_series(py, result).to_dict(py)
}

// ---------------------------------------------------------------------------
// Single-timestep functions
// ---------------------------------------------------------------------------

#[pyfunction]
fn xaj_generation_step<'py>(
    py: Python<'py>,
    soil_state: PyReadonlyArray1<'py, f64>,
    params: PyReadonlyArray1<'py, f64>,
    precip: f64,
    pan_evap: f64,
) -> PyResult<(Bound<'py, PyArray1<f64>>, GenerationStepFluxes)> {
    let p = parse_params(&params)?;
    let w = parse_soil(&soil_state)?;

    let (new_state, fluxes) = run::generation_step(w, &p, precip, pan_evap);

    let state_arr = PyArray1::from_vec(py, vec![new_state.upper, new_state.lower, new_state.deep]);
    Ok((state_arr, GenerationStepFluxes::from(&fluxes)))
}

#[pyfunction]
#[pyo3(signature = (free_water, params, net_rain, runoff, soil_moisture, dt=24.0))]
fn xaj_partition_step<'py>(
    free_water: f64,
    params: PyReadonlyArray1<'py, f64>,
    net_rain: f64,
    runoff: f64,
    soil_moisture: f64,
    dt: f64,
) -> PyResult<(f64, PartitionStepFluxes)> {
    let p = parse_params(&params)?;
    let dt = xaj_core::validation::check_timestep(dt).map_err(value_error)?;
    let context = PartitionContext::new(&p, dt);
    let generation = GenerationFluxes {
        actual_et: 0.0,
        net_rain,
        runoff,
        soil_moisture,
    };

    let (new_s, fluxes) = run::partition_step(free_water, &p, &context, &generation);
    Ok((new_s, PartitionStepFluxes::from(&fluxes)))
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[pyfunction]
#[pyo3(signature = (params, precip, pan_evap, dt=24.0, initial_state=None))]
fn xaj_run<'py>(
    py: Python<'py>,
    params: PyReadonlyArray1<'py, f64>,
    precip: PyReadonlyArray1<'py, f64>,
    pan_evap: PyReadonlyArray1<'py, f64>,
    dt: f64,
    initial_state: Option<PyReadonlyArray1<'py, f64>>,
) -> PyResult<XajResult> {
    let p = parse_params(&params)?;
    let resolution = Resolution::from_hours(dt).map_err(value_error)?;
    let forcing = ForcingData::new(
        contiguous_slice(&precip)?.to_vec(),
        contiguous_slice(&pan_evap)?.to_vec(),
        resolution,
    )
    .map_err(value_error)?;

    let initial = match &initial_state {
        Some(s) => {
            let s_slice = checked_slice(s, CarryState::STATE_SIZE, "initial_state")?;
            CarryState::from_slice(s_slice).map_err(value_error)?
        }
        None => CarryState::new(SoilMoistureState::new(0.0, 0.0, 0.0), 0.0, 0.0, 0.0),
    };

    let sim = run::simulate(&p, &forcing, initial).map_err(value_error)?;

    Ok(XajResult {
        generation: Py::new(py, GenerationSeries::from_series(py, sim.generation))?,
        partition: Py::new(py, PartitionSeries::from_series(py, sim.partition))?,
        discharge: Py::new(py, DischargeSeries::from_series(py, sim.concentration))?,
        final_state: PyArray1::from_vec(py, sim.final_state.to_vec()).unbind(),
    })
}

pub fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "xaj")?;
    m.add_function(wrap_pyfunction!(xaj_runoff_generation, &m)?)?;
    m.add_function(wrap_pyfunction!(xaj_source_partition, &m)?)?;
    m.add_function(wrap_pyfunction!(xaj_runoff_concentration, &m)?)?;
    m.add_function(wrap_pyfunction!(xaj_generation_step, &m)?)?;
    m.add_function(wrap_pyfunction!(xaj_partition_step, &m)?)?;
    m.add_function(wrap_pyfunction!(xaj_run, &m)?)?;
    m.add_class::<GenerationSeries>()?;
    m.add_class::<PartitionSeries>()?;
    m.add_class::<DischargeSeries>()?;
    m.add_class::<GenerationStepFluxes>()?;
    m.add_class::<PartitionStepFluxes>()?;
    m.add_class::<XajResult>()?;
    m.add(
        "PARAM_NAMES",
        Parameters::PARAM_NAMES.to_vec(),
    )?;
    parent.add_submodule(&m)?;
    Ok(())
}
