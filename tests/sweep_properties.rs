//! Properties of correlation sweeps.

use rand::SeedableRng;
use trace_correlation::rng::{counter_rng_seed, TraceRng};
use trace_correlation::statistics::pearson_correlation;
use trace_correlation::{
    coefficient_grid, run_point, Config, CorrelatedGenerator, CorrelationSweep, PhaseMeans,
};

/// Trace 1 ramps through the threshold region; trace 2 carries little independent load.
fn ramp_means() -> PhaseMeans {
    let ramp: Vec<f64> = (0..20).map(|i| 30.0 + 2.0 * i as f64).collect();
    let small: Vec<f64> = (0..20).map(|i| (i % 5) as f64).collect();
    PhaseMeans::from_rows(&[ramp, small]).unwrap()
}

/// With shared noise, more correlation never lowers the time spent over capacity.
#[test]
fn exceed_fraction_non_decreasing() {
    let config = Config::new().seed(42).common_random_numbers(true);
    let series = CorrelationSweep::new(config)
        .unwrap()
        .coefficients(coefficient_grid(-0.9, 0.9, 19))
        .run(&ramp_means())
        .unwrap();

    assert_eq!(series.points.len(), 19);
    let fractions = series.exceed_fractions();
    for w in fractions.windows(2) {
        assert!(w[1] >= w[0], "exceed fraction decreased: {:?}", fractions);
    }
    assert_eq!(fractions[0], 0.0);
    assert!(fractions[18] > 0.0);
}

/// Every generated sample is non-negative across a sweep.
#[test]
fn samples_never_negative() {
    let generator = CorrelatedGenerator::new(Config::new().trace_count(3)).unwrap();
    let means = PhaseMeans::random(3, 20, 25.0, 35.0, &mut TraceRng::seed_from_u64(8)).unwrap();

    for (i, rho) in coefficient_grid(-0.5, 0.99, 16).into_iter().enumerate() {
        let mut rng = TraceRng::seed_from_u64(counter_rng_seed(8, i as u64));
        let out = generator.generate(rho, &means, &mut rng).unwrap();
        for trace in &out.samples {
            assert_eq!(trace.len(), 1000);
            assert!(trace.iter().all(|&x| x >= 0.0));
        }
    }
}

/// The summed average equals the sum of per-trace averages.
#[test]
fn summed_average_is_sum_of_trace_averages() {
    let means = PhaseMeans::random(3, 20, 50.0, 35.0, &mut TraceRng::seed_from_u64(2)).unwrap();
    let series = CorrelationSweep::new(Config::new().trace_count(3).seed(2))
        .unwrap()
        .run(&means)
        .unwrap();

    assert!(!series.points.is_empty());
    for point in &series.points {
        let total: f64 = point.per_trace_averages.iter().sum();
        assert!(
            (total - point.summed_average).abs() < 1e-9,
            "at {}: {} vs {}",
            point.correlation_coefficient,
            total,
            point.summed_average
        );
        assert!((0.0..=1.0).contains(&point.exceed_fraction));
    }
}

/// The default three-trace grid skips exactly the coefficients below -0.5.
#[test]
fn three_trace_default_grid_skips_invalid() {
    let means = PhaseMeans::random(3, 20, 33.0, 35.0, &mut TraceRng::seed_from_u64(4)).unwrap();
    let series = CorrelationSweep::new(Config::new().trace_count(3).seed(4))
        .unwrap()
        .run(&means)
        .unwrap();

    // -0.99 ..= -0.51 are outside the uniform PSD range.
    assert_eq!(series.skipped.len(), 49);
    assert_eq!(series.points.len(), 150);
    assert_eq!(series.points[0].correlation_coefficient, -0.5);
}

/// Any sweep point can be recomputed on its own from the base seed.
#[test]
fn sweep_point_recomputable() {
    let config = Config::new().seed(77);
    let means = ramp_means();
    let grid = coefficient_grid(-0.6, 0.6, 5);
    let series = CorrelationSweep::new(config.clone())
        .unwrap()
        .coefficients(grid.clone())
        .run(&means)
        .unwrap();

    let generator = CorrelatedGenerator::new(config).unwrap();
    for (i, &rho) in grid.iter().enumerate() {
        let mut rng = TraceRng::seed_from_u64(counter_rng_seed(77, i as u64));
        let single = run_point(&generator, rho, &means, &mut rng).unwrap();
        assert_eq!(single, series.points[i]);
    }
}

/// Stronger requested coupling shows up as stronger empirical correlation of the traces.
#[test]
fn empirical_correlation_follows_coefficient() {
    let config = Config::new().phase_count(200).samples_per_phase(20);
    let means = PhaseMeans::random(2, 200, 50.0, 35.0, &mut TraceRng::seed_from_u64(5)).unwrap();
    let generator = CorrelatedGenerator::new(config).unwrap();

    let observed = |rho: f64| {
        let mut rng = TraceRng::seed_from_u64(9);
        let traces = generator.generate(rho, &means, &mut rng).unwrap();
        pearson_correlation(&traces.samples[0], &traces.samples[1])
    };
    let (low, zero, high) = (observed(-0.9), observed(0.0), observed(0.9));

    assert!(high > zero + 0.5, "rho=0.9 gave {}, rho=0 gave {}", high, zero);
    assert!(zero > low + 0.25, "rho=0 gave {}, rho=-0.9 gave {}", zero, low);
}
