/// Shared model traits.
///
/// `ModelParams` and `ModelState` pin down the flat `f64` layouts the Python
/// bindings exchange; `HydrologicalModel` is the stepping contract the
/// generation and partition stages implement.
use crate::error::Result;

/// Model parameters convertible to and from a fixed-order flat array.
pub trait ModelParams: Sized {
    /// Number of independent parameters in the flat layout.
    const N_PARAMS: usize;
    /// Parameter names, in flat-array order.
    const PARAM_NAMES: &'static [&'static str];

    /// Build (and validate) parameters from a flat slice.
    fn from_array(arr: &[f64]) -> Result<Self>;

    /// Flatten into `PARAM_NAMES` order.
    fn to_array(&self) -> Vec<f64>;
}

/// Carry-state convertible to and from a flat array.
pub trait ModelState: Sized {
    /// Number of elements in the flat layout.
    const STATE_SIZE: usize;

    fn to_vec(&self) -> Vec<f64>;

    fn from_slice(arr: &[f64]) -> Result<Self>;
}

/// Core trait for the stepwise stages of the model.
///
/// A stage prepares its run-constant context, starts from a default or
/// caller-supplied state, and folds `step` over its forcing series.
pub trait HydrologicalModel {
    type Params;
    type State: Clone;
    type Forcing: Copy;
    type Fluxes;
    type FluxesTimeseries: FluxesTimeseriesOps<Self::Fluxes>;
    /// Precomputed context derived from params, constant for a given run.
    type Context;

    /// Precompute any run-constant data from parameters.
    fn prepare(params: &Self::Params) -> Self::Context;

    /// Create a default initial state from parameters.
    fn initialize_state(params: &Self::Params) -> Self::State;

    /// Execute one timestep: given state, params, forcing, and context,
    /// return the new state and fluxes.
    fn step(
        state: &Self::State,
        params: &Self::Params,
        forcing: &Self::Forcing,
        context: &Self::Context,
    ) -> (Self::State, Self::Fluxes);

    /// Run over a forcing timeseries and also return the state after the
    /// last step, so a later window can resume from it.
    fn run_with_final_state(
        params: &Self::Params,
        forcing: &[Self::Forcing],
        initial_state: Option<&Self::State>,
    ) -> (Self::FluxesTimeseries, Self::State) {
        let context = Self::prepare(params);
        let mut state = match initial_state {
            Some(s) => s.clone(),
            None => Self::initialize_state(params),
        };

        let mut outputs = Self::FluxesTimeseries::with_capacity(forcing.len());
        for f in forcing {
            let (new_state, fluxes) = Self::step(&state, params, f, &context);
            outputs.push(&fluxes);
            state = new_state;
        }

        (outputs, state)
    }

    /// Run over a forcing timeseries.
    fn run(
        params: &Self::Params,
        forcing: &[Self::Forcing],
        initial_state: Option<&Self::State>,
    ) -> Self::FluxesTimeseries {
        Self::run_with_final_state(params, forcing, initial_state).0
    }
}

/// Operations required on the timeseries collection type.
///
/// `#[derive(Fluxes)]` implements this for every generated series struct.
pub trait FluxesTimeseriesOps<F> {
    fn with_capacity(n: usize) -> Self;
    fn push(&mut self, f: &F);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool;
}
