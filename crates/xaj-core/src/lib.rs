/// xaj-core: the Xinanjiang rainfall-runoff model in Rust.
///
/// Three stages run in sequence: runoff generation over a layered soil
/// profile, source partition through a free-water reservoir, and runoff
/// concentration to outlet discharge. Each stage is a pure function of its
/// parameters, input series and scalar initial state.
pub mod config;
pub mod error;
pub mod forcing;
pub mod metrics;
pub mod traits;
pub mod validation;
pub mod xaj;

pub use error::{Result, XajError};

// Lets `#[derive(Fluxes)]` name `::xaj_core` from inside this crate.
extern crate self as xaj_core;
