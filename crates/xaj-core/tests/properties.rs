//! Randomized properties of the three stages over seeded parameter sets.
use approx::assert_relative_eq;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use xaj_core::forcing::{ForcingData, Resolution};
use xaj_core::metrics::nse;
use xaj_core::xaj::fluxes::SourcePartitionResult;
use xaj_core::xaj::params::Parameters;
use xaj_core::xaj::run::{
    compute_runoff_concentration, compute_runoff_generation, compute_source_partition, simulate,
};
use xaj_core::xaj::state::{CarryState, SoilMoistureState};

const CASES: usize = 64;
const STEPS: usize = 200;

fn random_params(rng: &mut ChaCha8Rng) -> Parameters {
    let kss = rng.gen_range(0.1..0.5);
    Parameters::builder()
        .soil_capacity(
            rng.gen_range(5.0..50.0),
            rng.gen_range(20.0..100.0),
            rng.gen_range(10.0..80.0),
        )
        .evapotranspiration(rng.gen_range(0.6..1.2), rng.gen_range(0.05..0.25))
        .runoff_generation(rng.gen_range(0.1..0.5), rng.gen_range(0.0..0.05))
        .source_partition(
            rng.gen_range(5.0..60.0),
            rng.gen_range(0.5..2.0),
            kss,
            rng.gen_range(0.05..(0.95 - kss)),
        )
        .unwrap()
        .concentration(
            rng.gen_range(0.5..0.95),
            rng.gen_range(0.9..0.999),
            rng.gen_range(10.0..5000.0),
        )
        .build()
        .unwrap()
}

fn random_soil(rng: &mut ChaCha8Rng, p: &Parameters) -> SoilMoistureState {
    let cap = p.soil();
    SoilMoistureState::new(
        rng.gen_range(0.0..=cap.wum),
        rng.gen_range(0.0..=cap.wlm),
        rng.gen_range(0.0..=cap.wdm),
    )
}

fn random_forcing(rng: &mut ChaCha8Rng, n: usize) -> (Vec<f64>, Vec<f64>) {
    let precip = (0..n)
        .map(|_| {
            if rng.gen_bool(0.6) {
                0.0
            } else {
                rng.gen_range(0.0..80.0)
            }
        })
        .collect();
    let pan_evap = (0..n).map(|_| rng.gen_range(0.0..8.0)).collect();
    (precip, pan_evap)
}

fn random_dt(rng: &mut ChaCha8Rng) -> f64 {
    [1.0, 3.0, 6.0, 12.0, 24.0][rng.gen_range(0..5)]
}

#[test]
fn no_runoff_without_net_rain() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..CASES {
        let p = random_params(&mut rng);
        let w0 = random_soil(&mut rng, &p);
        let (precip, pan_evap) = random_forcing(&mut rng, STEPS);
        let result = compute_runoff_generation(&p, &precip, &pan_evap, w0).unwrap();

        for t in 0..STEPS {
            if result.net_rain[t] <= 0.0 {
                assert_eq!(result.runoff[t], 0.0, "t={t}");
            } else {
                assert!(result.runoff[t] >= 0.0);
                assert!(result.runoff[t] <= result.net_rain[t] + 1e-9);
            }
        }
    }
}

#[test]
fn soil_moisture_is_conserved_and_clamped() {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    for _ in 0..CASES {
        let p = random_params(&mut rng);
        let wm = p.wm();
        let w0 = random_soil(&mut rng, &p);
        let (precip, pan_evap) = random_forcing(&mut rng, STEPS);
        let result = compute_runoff_generation(&p, &precip, &pan_evap, w0).unwrap();

        let mut w_prev = w0.total();
        for t in 0..STEPS {
            let unclamped = w_prev + result.net_rain[t] - result.runoff[t];
            let expected = unclamped.clamp(0.0, wm);
            assert_relative_eq!(result.soil_moisture[t], expected, epsilon = 1e-9);
            assert!(result.soil_moisture[t] >= 0.0);
            assert!(result.soil_moisture[t] <= wm + 1e-9);
            w_prev = result.soil_moisture[t];
        }
    }
}

#[test]
fn evapotranspiration_closes_net_rain() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for _ in 0..CASES {
        let p = random_params(&mut rng);
        let w0 = random_soil(&mut rng, &p);
        let (precip, pan_evap) = random_forcing(&mut rng, STEPS);
        let result = compute_runoff_generation(&p, &precip, &pan_evap, w0).unwrap();

        for t in 0..STEPS {
            assert_relative_eq!(
                result.actual_et[t] + result.net_rain[t],
                precip[t],
                epsilon = 1e-9
            );
            // Actual ET never exceeds the potential rate.
            assert!(result.actual_et[t] <= pan_evap[t] * p.evapotranspiration().k + 1e-9);
        }
    }
}

#[test]
fn source_partition_balances_every_step() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for _ in 0..CASES {
        let p = random_params(&mut rng);
        let w0 = random_soil(&mut rng, &p);
        let s0 = rng.gen_range(0.0..=p.source_partition().sm);
        let dt = random_dt(&mut rng);
        let (precip, pan_evap) = random_forcing(&mut rng, STEPS);
        let generation = compute_runoff_generation(&p, &precip, &pan_evap, w0).unwrap();
        let sources = compute_source_partition(&p, &generation, s0, dt).unwrap();

        let mut s_prev = s0;
        for t in 0..STEPS {
            let row = sources.at(t).unwrap();
            let storage_change = row.producing_area * (row.free_water - s_prev);
            let scale = 1.0 + generation.runoff[t].abs();
            // A negative producing area (r/pe < Imp) zeroes surface runoff
            // through the clamp, so the balance only holds for FR >= 0.
            if generation.net_rain[t] > 0.0 && row.producing_area >= 0.0 {
                let total = row.impervious
                    + row.surface
                    + row.interflow
                    + row.groundwater
                    + storage_change;
                assert!(
                    (total - generation.runoff[t]).abs() < 1e-9 * scale,
                    "t={t}: {total} != {}",
                    generation.runoff[t]
                );
            } else if generation.net_rain[t] <= 0.0 {
                assert!((row.interflow + row.groundwater + storage_change).abs() < 1e-9 * scale);
                assert_eq!(row.surface, 0.0);
            }
            assert!(row.free_water >= 0.0);
            assert!(row.free_water <= p.source_partition().sm + 1e-9);
            s_prev = row.free_water;
        }
    }
}

#[test]
fn unit_impulse_anywhere_spreads_over_three_steps() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    for _ in 0..CASES {
        let p = random_params(&mut rng);
        let dt = random_dt(&mut rng);
        let n = 12;
        let at = rng.gen_range(0..n - 2);
        let mut surface = vec![0.0; n];
        surface[at] = 1.0;
        let sources = SourcePartitionResult {
            impervious: vec![0.0; n],
            surface,
            interflow: vec![0.0; n],
            groundwater: vec![0.0; n],
            free_water: vec![0.0; n],
            producing_area: vec![0.0; n],
        };
        let q = compute_runoff_concentration(&p, &sources, 0.0, 0.0, dt).unwrap();
        let scale = p.concentration().area / (3.6 * dt);

        for (t, &qt) in q.surface.iter().enumerate() {
            let expected = match t.checked_sub(at) {
                Some(0) => 0.3 * scale,
                Some(1) => 0.6 * scale,
                Some(2) => 0.1 * scale,
                _ => 0.0,
            };
            assert_relative_eq!(qt, expected, epsilon = 1e-9 * scale);
        }
    }
}

#[test]
fn constant_recharge_converges_to_steady_discharge() {
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    for _ in 0..16 {
        let p = random_params(&mut rng);
        let dt = 24.0;
        let c = rng.gen_range(0.1..5.0);
        let n = 40_000;
        let sources = SourcePartitionResult {
            impervious: vec![0.0; n],
            surface: vec![0.0; n],
            interflow: vec![c; n],
            groundwater: vec![c; n],
            free_water: vec![0.0; n],
            producing_area: vec![0.0; n],
        };
        let q = compute_runoff_concentration(&p, &sources, 0.0, 0.0, dt).unwrap();
        let steady = c * p.concentration().area / (3.6 * dt);
        assert_relative_eq!(q.interflow[n - 1], steady, max_relative = 1e-6);
        assert_relative_eq!(q.groundwater[n - 1], steady, max_relative = 1e-6);
    }
}

#[test]
fn simulate_is_deterministic_and_non_mutating() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let p = random_params(&mut rng);
    let (precip, pan_evap) = random_forcing(&mut rng, 365);
    let forcing = ForcingData::new(precip, pan_evap, Resolution::Daily).unwrap();
    let initial = CarryState::new(random_soil(&mut rng, &p), 1.0, 3.0, 6.0);

    let a = simulate(&p, &forcing, initial).unwrap();
    let b = simulate(&p, &forcing, initial).unwrap();
    assert_eq!(a.concentration, b.concentration);
    assert_eq!(a.final_state, b.final_state);
    assert_eq!(initial.free_water, 1.0);
}

#[test]
fn nse_of_identical_series_is_one() {
    let mut rng = ChaCha8Rng::seed_from_u64(808);
    for _ in 0..CASES {
        let n = rng.gen_range(2..STEPS);
        let mut obs: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..500.0)).collect();
        obs[1] = obs[0] + rng.gen_range(0.1..50.0);
        assert_eq!(nse(&obs, &obs).unwrap(), 1.0);

        // Simulated discharge from a wet window used as its own reference.
        let p = random_params(&mut rng);
        let (mut precip, pan_evap) = random_forcing(&mut rng, n);
        precip[0] = 60.0;
        let forcing = ForcingData::new(precip, pan_evap, Resolution::Daily).unwrap();
        let initial = CarryState::new(random_soil(&mut rng, &p), 0.0, 0.0, 0.0);
        let q = simulate(&p, &forcing, initial).unwrap().concentration.total;
        assert_eq!(nse(&q, &q).unwrap(), 1.0);
    }
}
