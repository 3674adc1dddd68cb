/// Xinanjiang: the three-stage conceptual rainfall-runoff model.
///
/// Runoff generation over a three-layer soil profile with a storage-capacity
/// curve, source partitioning through a free-water reservoir, and runoff
/// concentration through a unit hydrograph and two linear reservoirs.
pub mod constants;
pub mod fluxes;
pub mod params;
pub mod processes;
pub mod routing;
pub mod run;
pub mod state;
