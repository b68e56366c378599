use regioncut::math::{Point2, Real, Tolerance};
use regioncut::partition::{RegionCutRule, RegionLocation, Split};
use regioncut::shape::{Line, LineSubset, RegionTree2};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn tol() -> Tolerance {
    Tolerance::default()
}

/// The upper half-plane: everything on the minus side of the x-axis.
fn x_axis_tree() -> RegionTree2 {
    let mut region = RegionTree2::empty(tol());
    let root = region.root();
    assert!(region.insert_cut(root, &Line::x_axis()));
    region
}

/// The left half-plane: everything on the minus side of the y-axis.
fn y_axis_tree() -> RegionTree2 {
    let mut region = RegionTree2::empty(tol());
    let root = region.root();
    assert!(region.insert_cut(root, &Line::y_axis()));
    region
}

fn unit_square() -> RegionTree2 {
    let corners = [
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
    ];
    RegionTree2::from_boundaries(
        tol(),
        (0..4).map(|i| LineSubset::segment(corners[i], corners[(i + 1) % 4]).unwrap()),
    )
}

fn sample_points(n: usize, seed: u64) -> Vec<Point2<Real>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Point2::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0)))
        .collect()
}

#[test]
fn half_plane_classification() {
    let region = x_axis_tree();
    assert_eq!(region.classify(&Point2::new(0.0, 1.0)), RegionLocation::Inside);
    assert_eq!(
        region.classify(&Point2::new(0.0, -1.0)),
        RegionLocation::Outside
    );
    assert_eq!(
        region.classify(&Point2::new(2.0, 0.0)),
        RegionLocation::Boundary
    );
}

#[test]
fn plus_inside_rule_flips_the_marked_side() {
    let mut region = RegionTree2::empty(tol());
    let root = region.root();
    assert!(region.insert_cut_with_rule(root, &Line::x_axis(), RegionCutRule::PlusInside));
    assert_eq!(
        region.classify(&Point2::new(0.0, -1.0)),
        RegionLocation::Inside
    );
    assert_eq!(region.classify(&Point2::new(0.0, 1.0)), RegionLocation::Outside);
}

#[test]
fn inherit_rule_keeps_the_ambient_classification() {
    let mut region = x_axis_tree();
    let node = region.find_node(&Point2::new(0.0, 1.0));
    assert!(region.insert_cut_with_rule(node, &Line::y_axis(), RegionCutRule::Inherit));
    // Both new cells keep the inherited inside location, so the region
    // classifies exactly as before.
    for pt in sample_points(50, 7) {
        assert_eq!(region.classify(&pt), x_axis_tree().classify(&pt));
    }
}

#[test]
fn full_and_empty() {
    assert!(RegionTree2::full(tol()).is_full());
    assert!(RegionTree2::empty(tol()).is_empty());
    assert!(!x_axis_tree().is_full());
    assert!(!x_axis_tree().is_empty());
}

#[test]
fn complement_is_an_involution() {
    let region = unit_square();
    let twice = region.complement().complement();
    for pt in sample_points(200, 11) {
        assert_eq!(region.classify(&pt), twice.classify(&pt));
    }
    // Also exactly on the boundary.
    assert_eq!(
        twice.classify(&Point2::new(0.5, 0.0)),
        RegionLocation::Boundary
    );
}

#[test]
fn complement_swaps_inside_and_outside() {
    let region = unit_square().complement();
    assert_eq!(
        region.classify(&Point2::new(0.5, 0.5)),
        RegionLocation::Outside
    );
    assert_eq!(region.classify(&Point2::new(2.0, 2.0)), RegionLocation::Inside);
    assert_eq!(
        region.classify(&Point2::new(0.0, 0.5)),
        RegionLocation::Boundary
    );
}

#[test]
fn union_of_axis_trees_matches_the_reference_shape() {
    let union = x_axis_tree().union(&y_axis_tree());
    assert_eq!(union.count(), 5);
    assert_eq!(union.classify(&Point2::new(1.0, 1.0)), RegionLocation::Inside);
    assert_eq!(
        union.classify(&Point2::new(1.0, -1.0)),
        RegionLocation::Outside
    );
    assert_eq!(
        union.classify(&Point2::new(0.0, 0.0)),
        RegionLocation::Boundary
    );
}

#[test]
fn boolean_ops_satisfy_their_pointwise_laws() {
    let a = x_axis_tree();
    let b = unit_square();
    let union = a.union(&b);
    let intersection = a.intersection(&b);
    let difference = a.difference(&b);
    let xor = a.xor(&b);

    for pt in sample_points(300, 23) {
        let in_a = a.classify(&pt);
        let in_b = b.classify(&pt);
        if in_a == RegionLocation::Boundary || in_b == RegionLocation::Boundary {
            continue;
        }
        let in_a = in_a == RegionLocation::Inside;
        let in_b = in_b == RegionLocation::Inside;

        assert_eq!(
            union.classify(&pt) == RegionLocation::Inside,
            in_a || in_b,
            "union law failed at {pt}"
        );
        assert_eq!(
            intersection.classify(&pt) == RegionLocation::Inside,
            in_a && in_b,
            "intersection law failed at {pt}"
        );
        assert_eq!(
            difference.classify(&pt) == RegionLocation::Inside,
            in_a && !in_b,
            "difference law failed at {pt}"
        );
        assert_eq!(
            xor.classify(&pt) == RegionLocation::Inside,
            in_a != in_b,
            "xor law failed at {pt}"
        );
    }
}

#[test]
fn union_is_commutative_by_classification() {
    let a = x_axis_tree();
    let b = unit_square();
    let ab = a.union(&b);
    let ba = b.union(&a);
    for pt in sample_points(300, 31) {
        assert_eq!(ab.classify(&pt), ba.classify(&pt));
    }
}

#[test]
fn in_place_variants_match_the_copying_ones() {
    let a = unit_square();
    let b = y_axis_tree();

    let mut in_place = a.clone();
    in_place.union_assign(&b);
    let copied = a.union(&b);
    for pt in sample_points(200, 41) {
        assert_eq!(in_place.classify(&pt), copied.classify(&pt));
    }

    let mut in_place = a.clone();
    in_place.difference_assign(&b);
    let copied = a.difference(&b);
    for pt in sample_points(200, 43) {
        assert_eq!(in_place.classify(&pt), copied.classify(&pt));
    }
}

#[test]
fn operations_with_full_and_empty_operands() {
    let a = unit_square();
    let full = RegionTree2::full(tol());
    let empty = RegionTree2::empty(tol());

    assert!(a.union(&full).is_full());
    assert!(a.intersection(&empty).is_empty());
    for pt in sample_points(100, 53) {
        assert_eq!(a.union(&empty).classify(&pt), a.classify(&pt));
        assert_eq!(a.intersection(&full).classify(&pt), a.classify(&pt));
        assert_eq!(
            full.difference(&a).classify(&pt),
            a.complement().classify(&pt)
        );
    }
}

#[test]
fn results_are_condensed_to_single_leaves() {
    let a = x_axis_tree();
    // A region intersected with its complement is empty; the merge output
    // collapses to one leaf rather than keeping agreeing siblings.
    let nothing = a.intersection(&a.complement());
    assert!(nothing.is_empty());
    assert_eq!(nothing.count(), 1);

    let everything = a.union(&a.complement());
    assert!(everything.is_full());
    assert_eq!(everything.count(), 1);
}

#[test]
fn split_partitions_the_region() {
    let region = unit_square();
    let splitter = LineSubset::span(Line::y_axis());
    // The square lies entirely on the plus side of the y-axis.
    assert!(matches!(region.split(&splitter), Split::Plus(_)));

    let splitter = LineSubset::span(
        Line::try_new(Point2::new(0.5, 0.0), regioncut::math::Vector2::y()).unwrap(),
    );
    match region.split(&splitter) {
        Split::Both { minus, plus } => {
            assert!((minus.area() - 0.5).abs() < 1.0e-9);
            assert!((plus.area() - 0.5).abs() < 1.0e-9);
            assert_eq!(
                minus.classify(&Point2::new(0.25, 0.5)),
                RegionLocation::Inside
            );
            assert_eq!(
                plus.classify(&Point2::new(0.75, 0.5)),
                RegionLocation::Inside
            );
            // Each half ends at the splitter: nothing of the square leaks
            // across it.
            assert_eq!(
                minus.classify(&Point2::new(0.75, 0.5)),
                RegionLocation::Outside
            );
            assert_eq!(
                plus.classify(&Point2::new(0.25, 0.5)),
                RegionLocation::Outside
            );
            // Together the halves reassemble the original region.
            let rejoined = minus.union(&plus);
            for pt in sample_points(200, 61) {
                if region.classify(&pt) == RegionLocation::Boundary {
                    continue;
                }
                assert_eq!(rejoined.classify(&pt), region.classify(&pt));
            }
        }
        other => panic!("expected Both, got {other:?}"),
    }
}

#[test]
fn split_halves_are_bounded_by_the_splitter() {
    // A half-plane region split by a line through its interior: each half
    // must classify the far side of the splitter as outside even though
    // the original region extends there.
    let region = x_axis_tree();
    let splitter = LineSubset::span(Line::y_axis());
    match region.split(&splitter) {
        Split::Both { minus, plus } => {
            assert_eq!(
                minus.classify(&Point2::new(-1.0, 1.0)),
                RegionLocation::Inside
            );
            assert_eq!(
                minus.classify(&Point2::new(1.0, 1.0)),
                RegionLocation::Outside
            );
            assert_eq!(
                plus.classify(&Point2::new(1.0, 1.0)),
                RegionLocation::Inside
            );
            assert_eq!(
                plus.classify(&Point2::new(-1.0, 1.0)),
                RegionLocation::Outside
            );
            // Below the original half-plane both halves stay outside.
            assert_eq!(
                minus.classify(&Point2::new(-1.0, -1.0)),
                RegionLocation::Outside
            );
            assert_eq!(
                plus.classify(&Point2::new(1.0, -1.0)),
                RegionLocation::Outside
            );
        }
        other => panic!("expected Both, got {other:?}"),
    }
}

#[test]
fn empty_region_split_reports_on() {
    let empty = RegionTree2::empty(tol());
    let splitter = LineSubset::span(Line::x_axis());
    assert!(matches!(empty.split(&splitter), Split::On));
}

#[test]
fn boundaries_enclose_the_inside() {
    let region = unit_square();
    let pieces = region.boundaries();
    let mut length = 0.0;
    for piece in &pieces {
        let (a, b) = (piece.start_point().unwrap(), piece.end_point().unwrap());
        length += (b - a).norm();
        // Just inside each piece (its minus side) the region is inside.
        let line = piece.line();
        let mid = line.point_at((line.project_parameter(&a) + line.project_parameter(&b)) / 2.0);
        let probe = mid - line.normal() * 1.0e-3;
        assert_eq!(region.classify(&probe), RegionLocation::Inside);
    }
    assert!((length - 4.0).abs() < 1.0e-9);
}
