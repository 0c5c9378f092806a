use super::families::{birkhoff, cross_polytope, cube, product_simplex, simplex, skinny_cube};
use super::*;
use crate::error::{DegenerateDirection, PolytopeError};
use nalgebra::{dvector, DMatrix, DVector};

fn unit_square() -> HPolytope<f64> {
    cube(2, 1.0).unwrap()
}

#[test]
fn contains_respects_boundary_tolerance() {
    let p = unit_square();
    assert!(p.contains(&dvector![0.0, 0.0]));
    assert!(p.contains(&dvector![1.0, -1.0]));
    assert!(p.contains(&dvector![1.0 + 1e-12, 0.0]));
    assert!(!p.contains(&dvector![1.01, 0.0]));
}

#[test]
fn halfspace_satisfies_matches_polytope_rows() {
    let p = simplex::<f64>(3).unwrap();
    let inside = dvector![0.2, 0.2, 0.2];
    let outside = dvector![0.6, 0.6, 0.0];
    assert!(p.halfspaces().all(|h| h.satisfies(&inside)));
    assert!(!p.halfspaces().all(|h| h.satisfies(&outside)));
    assert_eq!(p.halfspaces().count(), p.num_constraints());
}

#[test]
fn boundary_distance_on_square_diagonal() {
    let p = unit_square();
    let d = dvector![1.0, 1.0].normalize();
    let (lo, hi) = p.boundary_distance(&dvector![0.0, 0.0], &d).unwrap();
    let s = 2f64.sqrt();
    assert!((lo + s).abs() < 1e-12 && (hi - s).abs() < 1e-12);
    // Endpoints lie on the boundary.
    for t in [lo, hi] {
        let q = &d * t;
        assert!(p.contains(&q));
        assert!(!p.contains(&(&d * (t * 1.001))));
    }
}

#[test]
fn boundary_distance_off_center() {
    let p = unit_square();
    let (lo, hi) = p
        .boundary_distance(&dvector![0.5, 0.0], &dvector![1.0, 0.0])
        .unwrap();
    assert!((lo + 1.5).abs() < 1e-12);
    assert!((hi - 0.5).abs() < 1e-12);
}

#[test]
fn degenerate_direction_when_ray_is_unbounded() {
    // Strip |x| <= 1: any direction along y never hits a facet.
    let strip = HPolytope::<f64>::new(
        2,
        vec![
            Halfspace::new(dvector![1.0, 0.0], 1.0),
            Halfspace::new(dvector![-1.0, 0.0], 1.0),
        ],
    )
    .unwrap();
    assert_eq!(
        strip.boundary_distance(&dvector![0.0, 0.0], &dvector![0.0, 1.0]),
        Err(DegenerateDirection)
    );
    assert!(strip
        .boundary_distance(&dvector![0.0, 0.0], &dvector![1.0, 0.0])
        .is_ok());
}

#[test]
fn coordinate_distance_agrees_with_general_chord() {
    let p = simplex::<f64>(4).unwrap();
    let x = dvector![0.1, 0.2, 0.05, 0.3];
    let ax = p.a() * &x;
    for axis in 0..4 {
        let mut e = DVector::zeros(4);
        e[axis] = 1.0;
        let general = p.boundary_distance(&x, &e).unwrap();
        let coord = p.coordinate_distance(&ax, axis).unwrap();
        assert!((general.0 - coord.0).abs() < 1e-12);
        assert!((general.1 - coord.1).abs() < 1e-12);
    }
}

#[test]
fn ine_rows_use_negated_normals() {
    // Row "1 -1 0" means 1 - x >= 0, i.e. x <= 1.
    let rows = vec![
        vec![1.0, -1.0, 0.0],
        vec![1.0, 1.0, 0.0],
        vec![1.0, 0.0, -1.0],
        vec![1.0, 0.0, 1.0],
    ];
    let p = HPolytope::from_ine_rows(&rows).unwrap();
    assert_eq!(p.dim(), 2);
    assert_eq!(p.halfspace(0).a, dvector![1.0, 0.0]);
    assert_eq!(p.to_ine_rows(), rows);
}

#[test]
fn construction_rejects_structural_errors() {
    let bad = HPolytope::<f64>::new(
        2,
        vec![
            Halfspace::new(dvector![1.0, 0.0], 1.0),
            Halfspace::new(dvector![1.0], 1.0),
        ],
    );
    assert!(matches!(
        bad,
        Err(PolytopeError::DimensionMismatch { row: 1, .. })
    ));
    assert_eq!(
        HPolytope::<f64>::new(0, vec![]).unwrap_err(),
        PolytopeError::ZeroDimension
    );
    assert!(matches!(
        HPolytope::from_matrix(DMatrix::<f64>::zeros(3, 2), DVector::zeros(2)),
        Err(PolytopeError::RhsMismatch { rows: 3, rhs: 2 })
    ));
}

#[test]
fn well_formedness_checks() {
    assert!(unit_square().is_well_formed());
    // Two constraints cannot bound R^2.
    let strip = HPolytope::<f64>::new(
        2,
        vec![
            Halfspace::new(dvector![1.0, 0.0], 1.0),
            Halfspace::new(dvector![-1.0, 0.0], 1.0),
        ],
    )
    .unwrap();
    assert!(!strip.is_well_formed());
    let zero_row = HPolytope::<f64>::new(
        1,
        vec![
            Halfspace::new(dvector![1.0], 1.0),
            Halfspace::new(dvector![0.0], 1.0),
        ],
    )
    .unwrap();
    assert!(!zero_row.is_well_formed());
    let nan = HPolytope::<f64>::new(
        1,
        vec![
            Halfspace::new(dvector![1.0], f64::NAN),
            Halfspace::new(dvector![-1.0], 1.0),
        ],
    )
    .unwrap();
    assert!(!nan.is_well_formed());
}

#[test]
fn push_forward_then_pull_back_is_identity() {
    let p = simplex::<f64>(3).unwrap();
    let m = DMatrix::from_row_slice(3, 3, &[2.0, 0.1, 0.0, 0.0, 1.0, 0.3, 0.0, 0.0, 0.5]);
    let t = dvector![0.5, -1.0, 2.0];
    let q = p.push_forward(&m, &t).unwrap();
    // Image of an interior point is inside the image polytope.
    let x = dvector![0.1, 0.2, 0.3];
    assert!(q.contains(&(&m * &x + &t)));
    assert!(!q.contains(&(&m * dvector![0.6, 0.6, 0.1] + &t)));
    let back = q.pull_back(&m, &t);
    assert!((back.a() - p.a()).amax() < 1e-12);
    assert!((back.b() - p.b()).amax() < 1e-12);
    assert!(p.push_forward(&DMatrix::zeros(3, 3), &t).is_none());
}

#[test]
fn family_constraint_counts() {
    assert_eq!(cube::<f64>(5, 1.0).unwrap().num_constraints(), 10);
    assert_eq!(cross_polytope::<f64>(4).unwrap().num_constraints(), 16);
    assert_eq!(simplex::<f64>(7).unwrap().num_constraints(), 8);
    assert_eq!(product_simplex::<f64>(5, 5).unwrap().num_constraints(), 12);
    let b4 = birkhoff::<f64>(4).unwrap();
    assert_eq!(b4.dim(), 9);
    assert_eq!(b4.num_constraints(), 16);
    let skinny = skinny_cube::<f64>(3, 100.0).unwrap();
    assert!(skinny.contains(&dvector![0.0, 0.0, 99.0]));
    assert!(!skinny.contains(&dvector![0.0, 2.0, 0.0]));
    assert!(cross_polytope::<f64>(21).is_err());
    assert!(birkhoff::<f64>(1).is_err());
    assert!(cube::<f64>(0, 1.0).is_err());
}

#[test]
fn birkhoff_contains_doubly_stochastic_block() {
    // Uniform matrix (all entries 1/3) for k = 3.
    let b3 = birkhoff::<f64>(3).unwrap();
    let third = 1.0 / 3.0;
    assert!(b3.contains(&dvector![third, third, third, third]));
    // Identity permutation: block diag(1, 1), bottom-right entry forced to 1.
    assert!(b3.contains(&dvector![1.0, 0.0, 0.0, 1.0]));
    // Block with sum below k - 2 violates the bottom-right entry.
    assert!(!b3.contains(&dvector![0.1, 0.1, 0.1, 0.1]));
    assert!(b3.is_well_formed());
}
