use xaj_macros::Fluxes;

#[derive(Debug, Clone, Copy, PartialEq, Fluxes)]
pub struct GenerationFluxes {
    pub net_rain: f64,
    pub runoff: f64,
    pub soil_moisture: f64,
}

fn main() {
    let f = GenerationFluxes { net_rain: 48.2, runoff: 11.2, soil_moisture: 95.2 };
    let mut ts = GenerationFluxesTimeseries::with_capacity(10);
    assert!(ts.last().is_none());
    ts.push(&f);
    assert_eq!(ts.len(), 1);
    assert!(!ts.is_empty());
    assert_eq!(ts.at(0), Some(f));
    assert!(ts.at(1).is_none());
    assert_eq!(ts.last(), Some(f));
    assert_eq!(
        GenerationFluxes::field_names(),
        &["net_rain", "runoff", "soil_moisture"]
    );
    let columns = ts.columns();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[1].0, "runoff");
    assert_eq!(columns[1].1, &[11.2]);
}
