use xaj_core::traits::FluxesTimeseriesOps;
use xaj_macros::Fluxes;

#[derive(Debug, Clone, Copy, PartialEq, Fluxes)]
#[fluxes(timeseries_name = "StorageSeries")]
pub struct Storage {
    pub free_water: f64,
    pub producing_area: f64,
}

fn collect<T: FluxesTimeseriesOps<Storage>>(rows: &[Storage]) -> T {
    let mut ts = T::with_capacity(rows.len());
    for row in rows {
        ts.push(row);
    }
    ts
}

fn main() {
    let rows = [
        Storage { free_water: 6.0, producing_area: 0.4 },
        Storage { free_water: 3.5, producing_area: 0.2 },
    ];
    let ts: StorageSeries = collect(&rows);
    assert_eq!(FluxesTimeseriesOps::len(&ts), 2);
    assert!(!FluxesTimeseriesOps::is_empty(&ts));
    assert_eq!(ts.free_water, vec![6.0, 3.5]);
    assert_eq!(ts.last(), Some(rows[1]));

    let empty: StorageSeries = collect(&[]);
    assert!(FluxesTimeseriesOps::is_empty(&empty));
}
