use proptest::num::f32::NORMAL;
use proptest::prelude::*;
use subgrid_geom::{Aabb, Vec3};

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e6)
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn approx_abs_rel(a: f32, b: f32, atol: f32, rtol: f32) -> bool {
    let diff = (a - b).abs();
    let scale = a.abs().max(b.abs());
    diff <= atol + rtol * scale
}

proptest! {
    // Lerp with t in [0,1] stays inside the box spanned by the endpoints (with float slack).
    #[test]
    fn lerp_stays_between_endpoints(a in arb_vec3(), b in arb_vec3(), t in 0.0f32..=1.0) {
        let p = a.lerp(b, t);
        let lo = a.min(b);
        let hi = a.max(b);
        // Rounding error scales with the larger endpoint magnitude
        let slack = |l: f32, h: f32| 1e-3 + 1e-5 * l.abs().max(h.abs());
        prop_assert!(p.x >= lo.x - slack(lo.x, hi.x) && p.x <= hi.x + slack(lo.x, hi.x));
        prop_assert!(p.y >= lo.y - slack(lo.y, hi.y) && p.y <= hi.y + slack(lo.y, hi.y));
        prop_assert!(p.z >= lo.z - slack(lo.z, hi.z) && p.z <= hi.z + slack(lo.z, hi.z));
    }

    // min/max are component-wise and order independent
    #[test]
    fn min_max_commute(a in arb_vec3(), b in arb_vec3()) {
        prop_assert_eq!(a.min(b), b.min(a));
        prop_assert_eq!(a.max(b), b.max(a));
    }

    // Including every point of a set yields a box containing all of them
    #[test]
    fn include_contains_all(points in prop::collection::vec(arb_vec3(), 1..32)) {
        let mut b = Aabb::EMPTY;
        for p in &points {
            b.include(*p);
        }
        prop_assert!(!b.is_empty());
        for p in &points {
            prop_assert!(b.contains(*p));
        }
    }

    // Normalized non-degenerate vectors have unit length
    #[test]
    fn normalized_is_unit(v in arb_vec3()) {
        prop_assume!(v.length() > 1e-3);
        prop_assert!(approx_abs_rel(v.normalized().length(), 1.0, 1e-3, 1e-3));
    }
}
