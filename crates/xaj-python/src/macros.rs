/// Generate a frozen `#[pyclass]` exposing the columns of a
/// `#[derive(Fluxes)]` series as numpy arrays.
///
/// The class gets `from_series()`, which moves the columns out of the core
/// result without copying, plus Python-side `__len__` and `to_dict()`. The
/// dict-returning stage functions go through `to_dict()` as well.
macro_rules! define_series_class {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident from $core_type:ty {
            $($field:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[pyo3::pyclass(frozen)]
        $vis struct $name {
            $(
                #[pyo3(get)]
                pub $field: Py<numpy::PyArray1<f64>>,
            )+
            n_steps: usize,
        }

        impl $name {
            pub fn from_series(py: pyo3::Python<'_>, series: $core_type) -> Self {
                let n_steps = series.len();
                Self {
                    $(
                        $field: numpy::PyArray1::from_vec(py, series.$field).unbind(),
                    )+
                    n_steps,
                }
            }
        }

        #[pyo3::pymethods]
        impl $name {
            fn __len__(&self) -> usize {
                self.n_steps
            }

            /// Columns keyed by name. The arrays are shared with this object.
            fn to_dict<'py>(
                &self,
                py: pyo3::Python<'py>,
            ) -> pyo3::PyResult<pyo3::Bound<'py, pyo3::types::PyDict>> {
                let dict = pyo3::types::PyDict::new(py);
                $(
                    dict.set_item(stringify!($field), self.$field.clone_ref(py))?;
                )+
                Ok(dict)
            }
        }
    };
}

/// Generate a frozen `#[pyclass]` holding the fluxes of one timestep.
///
/// The class converts from the core flux struct with `From<&Core>` and
/// gets a field-listing `__repr__` and `to_dict()` on the Python side.
macro_rules! define_step_class {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident from $core_type:ty {
            $($field:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[pyo3::pyclass(frozen)]
        $vis struct $name {
            $(
                #[pyo3(get)]
                pub $field: f64,
            )+
        }

        impl From<&$core_type> for $name {
            fn from(f: &$core_type) -> Self {
                Self {
                    $(
                        $field: f.$field,
                    )+
                }
            }
        }

        #[pyo3::pymethods]
        impl $name {
            fn __repr__(&self) -> String {
                let fields = [$(format!("{}={}", stringify!($field), self.$field)),+];
                format!("{}({})", stringify!($name), fields.join(", "))
            }

            fn to_dict<'py>(
                &self,
                py: pyo3::Python<'py>,
            ) -> pyo3::PyResult<pyo3::Bound<'py, pyo3::types::PyDict>> {
                let dict = pyo3::types::PyDict::new(py);
                $(
                    dict.set_item(stringify!($field), self.$field)?;
                )+
                Ok(dict)
            }
        }
    };
}
