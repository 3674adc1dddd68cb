use xaj_macros::Fluxes;

#[derive(Debug, Clone, Copy, Fluxes)]
#[fluxes(timeseries_name = "DischargeSeries")]
pub struct Discharge {
    pub surface: f64,
    pub total: f64,
}

fn main() {
    let f = Discharge { surface: 1.5, total: 50.0 };
    let mut ts = DischargeSeries::with_capacity(5);
    ts.push(&f);
    ts.push(&f);
    assert_eq!(ts.len(), 2);
    assert_eq!(Discharge::field_names(), &["surface", "total"]);
    assert_eq!(ts.last().map(|d| d.total), Some(50.0));
}
