//! Estimate a few reference bodies and print them next to their closed forms.
//!
//! Usage:
//!   cargo run --release -p polyvol --example reference_volumes -- [threads]
//!
//! Prints one line per body: name, dimension, phases, estimate, exact value,
//! relative error.

use polyvol::api::{
    birkhoff, cube, estimate_volume, ln_factorial, product_simplex, simplex, HPolytope,
    RandomSource, RunConfig,
};

fn main() {
    let threads = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);
    let bodies: Vec<(&str, HPolytope<f64>, f64)> = vec![
        ("cube10", cube(10, 1.0).unwrap(), 1024.0),
        ("simplex10", simplex(10).unwrap(), (-ln_factorial(10)).exp()),
        ("birk3", birkhoff(3).unwrap(), 0.125),
        (
            "prod_simplex_5_5",
            product_simplex(5, 5).unwrap(),
            (-2.0 * ln_factorial(5)).exp(),
        ),
    ];
    let config = RunConfig {
        thread_count: threads,
        repetitions: 5,
        ..RunConfig::default()
    };
    let mut rng = RandomSource::seeded(2025);
    println!(
        "{:<18} {:>4} {:>6} {:>14} {:>14} {:>8}",
        "body", "n", "phases", "estimate", "exact", "rel.err"
    );
    for (name, p, exact) in bodies {
        match estimate_volume(&p, &config, &mut rng) {
            Ok(est) => println!(
                "{:<18} {:>4} {:>6} {:>14.6e} {:>14.6e} {:>8.4}",
                name,
                p.dim(),
                est.phases(),
                est.volume(),
                exact,
                (est.volume() - exact).abs() / exact
            ),
            Err(e) => eprintln!("{name}: {e}"),
        }
    }
}
