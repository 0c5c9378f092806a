//! End-to-end accuracy on reference bodies with known volumes.
//!
//! Each check averages several independent estimates (the mean volume, as
//! `VolumeEstimate::volume` reports it) and compares against the closed form
//! with a relative tolerance. Heavy bodies are `#[ignore]`d; run them with
//! `cargo test --release -- --ignored`.

use approx::assert_relative_eq;
use polyvol::api::*;

fn averaged(p: &HPolytope<f64>, config: RunConfig, seed: u64) -> VolumeEstimate<f64> {
    estimate_volume(p, &config, &mut RandomSource::seeded(seed)).unwrap()
}

fn check(p: &HPolytope<f64>, expected: f64, tol: f64, repetitions: usize, seed: u64) {
    let config = RunConfig {
        repetitions,
        ..RunConfig::default()
    };
    let est = averaged(p, config, seed);
    assert!(est.is_clean(), "warnings: {:?}", est.warnings);
    assert_relative_eq!(est.volume(), expected, max_relative = tol);
}

fn inv_factorial(k: usize) -> f64 {
    (-ln_factorial(k)).exp()
}

#[test]
fn cube_10() {
    check(&cube(10, 1.0).unwrap(), 1024.0, 0.1, 10, 1);
}

#[test]
fn simplex_10() {
    check(&simplex(10).unwrap(), inv_factorial(10), 0.1, 10, 2);
}

#[test]
fn birkhoff_3() {
    check(&birkhoff(3).unwrap(), 0.125, 0.1, 10, 3);
}

#[test]
fn product_simplex_5_5() {
    check(
        &product_simplex(5, 5).unwrap(),
        inv_factorial(5).powi(2),
        0.1,
        10,
        4,
    );
}

#[test]
fn skinny_cube_10_with_rounding() {
    let config = RunConfig {
        repetitions: 5,
        flags: RunFlags {
            use_rounding: true,
            ..RunFlags::default()
        },
        ..RunConfig::default()
    };
    let est = averaged(&skinny_cube(10, 100.0).unwrap(), config, 5);
    assert!(est.is_clean(), "warnings: {:?}", est.warnings);
    // ln det L ≈ ln(100/√3) - 4.5 ln 3; the unrounded schedule needs ~60 phases.
    assert!(est.rounding_log_det.is_finite() && est.rounding_log_det != 0.0);
    assert!(est.phases() < 40, "{} phases", est.phases());
    assert_relative_eq!(est.volume(), 102_400.0, max_relative = 0.1);
}

#[test]
fn single_precision_cube() {
    let p = cube::<f32>(5, 1.0).unwrap();
    let config = RunConfig {
        repetitions: 5,
        ..RunConfig::default()
    };
    let est = estimate_volume(&p, &config, &mut RandomSource::seeded(6)).unwrap();
    assert_relative_eq!(est.volume(), 32.0f32, max_relative = 0.1);
}

#[test]
fn parallel_workers_agree_statistically() {
    let p = cube(6, 1.0).unwrap();
    let config = RunConfig {
        thread_count: 4,
        repetitions: 5,
        ..RunConfig::default()
    };
    let est = averaged(&p, config, 7);
    assert_relative_eq!(est.volume(), 64.0, max_relative = 0.1);
}

#[test]
fn fixed_seed_replays_bit_for_bit() {
    let p = birkhoff(3).unwrap();
    for threads in [1, 3] {
        let config = RunConfig {
            thread_count: threads,
            samples_per_phase: Some(2000),
            repetitions: 2,
            ..RunConfig::default()
        };
        let a = averaged(&p, config.clone(), 99);
        let b = averaged(&p, config, 99);
        assert_eq!(a.log_volume, b.log_volume);
        assert_eq!(a.runs, b.runs);
    }
}

#[test]
fn subset_gets_smaller_estimate() {
    // Q = [-1, 1]^3 has volume 8; P = Q ∩ {x + y <= 0.5} has volume 5.75.
    let q = cube(3, 1.0).unwrap();
    let mut hs: Vec<Halfspace<f64>> = q.halfspaces().collect();
    hs.push(Halfspace::new(nalgebra::dvector![1.0, 1.0, 0.0], 0.5));
    let p = HPolytope::<f64>::new(3, hs).unwrap();
    let config = RunConfig {
        repetitions: 8,
        ..RunConfig::default()
    };
    let vp = averaged(&p, config.clone(), 11).volume();
    let vq = averaged(&q, config, 12).volume();
    assert!(vp > 0.0 && vp < vq, "{vp} vs {vq}");
    assert_relative_eq!(vp, 5.75, max_relative = 0.1);
}

#[test]
fn constraint_order_does_not_matter() {
    let p = simplex(6).unwrap();
    let mut hs: Vec<Halfspace<f64>> = p.halfspaces().collect();
    hs.reverse();
    hs.rotate_left(2);
    let shuffled = HPolytope::<f64>::new(6, hs).unwrap();
    let config = RunConfig {
        repetitions: 6,
        ..RunConfig::default()
    };
    let a = averaged(&p, config.clone(), 13).volume();
    let b = averaged(&shuffled, config, 14).volume();
    let expected = inv_factorial(6);
    assert_relative_eq!(a, expected, max_relative = 0.1);
    assert_relative_eq!(b, expected, max_relative = 0.1);
}

#[test]
fn relative_error_target_tightens_phases() {
    let p = cube(4, 1.0).unwrap();
    let config = RunConfig {
        samples_per_phase: Some(50),
        relative_error: 0.05,
        repetitions: 4,
        ..RunConfig::default()
    };
    let est = averaged(&p, config, 15);
    // β = 1/2: at least k / ε² = 400 k samples per phase.
    let floor = 400 * est.phases() - 1;
    assert!(est.runs[0].phases.iter().all(|ph| ph.samples >= floor));
    assert_relative_eq!(est.volume(), 16.0, max_relative = 0.1);
}

#[test]
#[ignore = "heavy: 2^10 facets"]
fn cross_polytope_10() {
    check(&cross_polytope(10).unwrap(), 0.000_282_186_9, 0.1, 10, 21);
}

#[test]
#[ignore = "heavy"]
fn cube_20() {
    check(&cube(20, 1.0).unwrap(), 1_048_576.0, 0.1, 10, 22);
}

#[test]
#[ignore = "heavy"]
fn cube_30() {
    check(&cube(30, 1.0).unwrap(), 1_073_742_000.0, 0.2, 10, 23);
}

#[test]
#[ignore = "heavy"]
fn simplex_20_to_50() {
    for (i, n) in [20usize, 30, 40, 50].into_iter().enumerate() {
        check(&simplex(n).unwrap(), inv_factorial(n), 0.1, 10, 24 + i as u64);
    }
}

#[test]
#[ignore = "heavy"]
fn birkhoff_4_and_5() {
    check(&birkhoff(4).unwrap(), 0.000_970_018, 0.1, 10, 30);
    check(&birkhoff(5).unwrap(), 0.000_000_225, 0.1, 10, 31);
}

#[test]
#[ignore = "heavy"]
fn birkhoff_6() {
    check(&birkhoff(6).unwrap(), 9.455_459_196e-13, 0.5, 10, 32);
}

#[test]
#[ignore = "heavy: ~60 phases without rounding"]
fn skinny_cube_10_plain() {
    check(&skinny_cube(10, 100.0).unwrap(), 102_400.0, 0.1, 10, 33);
}
