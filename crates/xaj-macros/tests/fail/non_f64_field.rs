use xaj_macros::Fluxes;

#[derive(Debug, Clone, Copy, Fluxes)]
pub struct BadFluxes {
    pub discharge: f64,
    pub timestep: usize,
}

fn main() {}
