/// Pure Rust core benchmarks for the Xinanjiang model.
///
/// Uses std::time::Instant for timing, a deterministic LCG PRNG for data generation,
/// and std::hint::black_box to prevent dead-code elimination.
use std::hint::black_box;
use std::time::{Duration, Instant};

use xaj_core::forcing::{ForcingData, Resolution};
use xaj_core::xaj::params::Parameters;
use xaj_core::xaj::run;
use xaj_core::xaj::state::{CarryState, SoilMoistureState};

const REPEATS: usize = 7;

/// Simple LCG PRNG for deterministic data generation.
fn make_data(n: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut state = seed;
    let mut next_f64 = || -> f64 {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as f64 / (1u64 << 31) as f64
    };

    // Mostly dry steps with occasional storms.
    let precip: Vec<f64> = (0..n)
        .map(|_| {
            let u = next_f64();
            if u < 0.7 {
                0.0
            } else {
                (u - 0.7) * 100.0
            }
        })
        .collect();
    let pan_evap: Vec<f64> = (0..n).map(|_| 0.5 + next_f64() * 4.5).collect();
    (precip, pan_evap)
}

/// Run a closure `REPEATS` times, return the median duration.
fn median_time<F: FnMut()>(mut f: F) -> Duration {
    let mut times: Vec<Duration> = (0..REPEATS)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed()
        })
        .collect();
    times.sort();
    times[REPEATS / 2]
}

fn bench_simulate(
    params: &Parameters,
    resolution: Resolution,
    sizes: &[usize],
) -> xaj_core::Result<Vec<(&'static str, usize, Duration)>> {
    let initial = CarryState::new(SoilMoistureState::new(10.0, 30.0, 20.0), 5.0, 10.0, 20.0);
    let label = match resolution {
        Resolution::Hourly => "xaj (hourly)",
        _ => "xaj (daily)",
    };
    let mut results = Vec::new();

    for &n in sizes {
        let (precip, pan_evap) = make_data(n, 42);
        let forcing = ForcingData::new(precip, pan_evap, resolution)?;

        // Warmup
        black_box(run::simulate(params, &forcing, initial)?);

        let dur = median_time(|| {
            let _ = black_box(run::simulate(params, &forcing, initial));
        });
        results.push((label, n, dur));
    }
    Ok(results)
}

fn main() -> xaj_core::Result<()> {
    let params = Parameters::builder()
        .soil_capacity(20.0, 60.0, 40.0)
        .evapotranspiration(0.9, 0.15)
        .runoff_generation(0.3, 0.02)
        .source_partition(20.0, 1.5, 0.4, 0.3)?
        .concentration(0.8, 0.98, 500.0)
        .build()?;

    println!("Pure Rust Core Benchmarks");
    println!("============================================================");
    println!("{:<18} {:>6}   {:>12}", "Model", "N", "Median (ms)");
    println!("--------------------------------------------");

    let mut all_results: Vec<(&str, usize, Duration)> = Vec::new();

    all_results.extend(bench_simulate(&params, Resolution::Daily, &[3650, 36500])?);
    all_results.extend(bench_simulate(&params, Resolution::Hourly, &[8760, 87600])?);

    for (model, n, dur) in &all_results {
        let ms = dur.as_secs_f64() * 1000.0;
        println!("{:<18} {:>6}      {:>8.2}", model, n, ms);
    }

    println!("============================================================");
    Ok(())
}
