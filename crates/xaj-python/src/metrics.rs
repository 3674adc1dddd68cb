use numpy::PyReadonlyArray1;
use pyo3::prelude::*;

use crate::convert::{contiguous_slice, value_error};
use xaj_core::metrics;

type Metric = fn(&[f64], &[f64]) -> xaj_core::Result<f64>;

fn score<'py>(
    metric: Metric,
    observed: &PyReadonlyArray1<'py, f64>,
    simulated: &PyReadonlyArray1<'py, f64>,
) -> PyResult<f64> {
    metric(contiguous_slice(observed)?, contiguous_slice(simulated)?).map_err(value_error)
}

/// Nash-Sutcliffe efficiency of `simulated` against `observed`.
#[pyfunction]
fn nse<'py>(observed: PyReadonlyArray1<'py, f64>, simulated: PyReadonlyArray1<'py, f64>) -> PyResult<f64> {
    score(metrics::nse, &observed, &simulated)
}

#[pyfunction]
fn kge<'py>(observed: PyReadonlyArray1<'py, f64>, simulated: PyReadonlyArray1<'py, f64>) -> PyResult<f64> {
    score(metrics::kge, &observed, &simulated)
}

#[pyfunction]
fn pbias<'py>(observed: PyReadonlyArray1<'py, f64>, simulated: PyReadonlyArray1<'py, f64>) -> PyResult<f64> {
    score(metrics::pbias, &observed, &simulated)
}

#[pyfunction]
fn rmse<'py>(observed: PyReadonlyArray1<'py, f64>, simulated: PyReadonlyArray1<'py, f64>) -> PyResult<f64> {
    score(metrics::rmse, &observed, &simulated)
}

pub fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "metrics")?;
    m.add_function(wrap_pyfunction!(nse, &m)?)?;
    m.add_function(wrap_pyfunction!(kge, &m)?)?;
    m.add_function(wrap_pyfunction!(pbias, &m)?)?;
    m.add_function(wrap_pyfunction!(rmse, &m)?)?;
    parent.add_submodule(&m)?;
    Ok(())
}
