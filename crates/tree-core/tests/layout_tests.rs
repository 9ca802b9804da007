// Host-side tests for layout generation: counts, shell/cone bounds, determinism.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tree_core::layout::*;
use tree_core::ConfigError;

const EPS: f32 = 1e-4;

#[test]
fn generates_exactly_n_placements_for_any_count() {
    let mut rng = StdRng::seed_from_u64(7);
    for n in [0usize, 1, 2, 17, 1000] {
        assert_eq!(generate_foliage(n, &FoliageShape::default(), &mut rng).len(), n);
        assert_eq!(
            generate_ornament_placements(n, &OrnamentShape::default(), &mut rng).len(),
            n
        );
    }
}

#[test]
fn chaos_positions_lie_inside_the_shell() {
    let mut rng = StdRng::seed_from_u64(1);
    let shape = FoliageShape::default();
    for p in generate_foliage(5000, &shape, &mut rng) {
        let r = p.chaos.length();
        assert!(
            r >= shape.shell.r_min - EPS && r <= shape.shell.r_max() + EPS,
            "chaos radius {r} outside [{}, {}]",
            shape.shell.r_min,
            shape.shell.r_max()
        );
    }

    let oshape = OrnamentShape::default();
    for p in generate_ornament_placements(2000, &oshape, &mut rng) {
        let r = p.chaos.length();
        assert!(r >= oshape.shell.r_min - EPS && r <= oshape.shell.r_max() + EPS);
    }
}

#[test]
fn foliage_targets_lie_inside_the_cone() {
    let mut rng = StdRng::seed_from_u64(2);
    let shape = FoliageShape::default();
    let cone = shape.cone;
    for p in generate_foliage(5000, &shape, &mut rng) {
        let t = p.target;
        assert!(t.y >= 0.0 && t.y < cone.height, "height {} out of range", t.y);
        let radial = (t.x * t.x + t.z * t.z).sqrt();
        let limit = cone.radius * (1.0 - t.y / cone.height);
        assert!(radial <= limit + EPS, "radial {radial} exceeds {limit} at y={}", t.y);
    }
}

#[test]
fn ornament_targets_hug_the_surface_below_the_apex() {
    let mut rng = StdRng::seed_from_u64(3);
    let shape = OrnamentShape::default();
    for p in generate_ornament_placements(2000, &shape, &mut rng) {
        let t = p.target;
        assert!(t.y >= 0.0 && t.y < shape.cone.height - shape.apex_reserve + EPS);
        let radial = (t.x * t.x + t.z * t.z).sqrt();
        let expected = shape.cone.radius_at(t.y) * shape.surface_factor;
        assert!(
            (radial - expected).abs() < 1e-3,
            "ornament radial {radial} expected {expected}"
        );
    }
}

#[test]
fn same_seed_gives_identical_layout() {
    let a = generate_foliage(256, &FoliageShape::default(), &mut StdRng::seed_from_u64(42));
    let b = generate_foliage(256, &FoliageShape::default(), &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
    let c = generate_foliage(256, &FoliageShape::default(), &mut StdRng::seed_from_u64(43));
    assert_ne!(a, c);
}

#[test]
fn shell_directions_do_not_cluster_at_the_poles() {
    // Uniform on the sphere means z/r is uniform in [-1, 1]: each polar cap
    // |z/r| > 0.9 holds about 5% of the samples.
    let mut rng = StdRng::seed_from_u64(9);
    let shell = ShellParams {
        r_min: 1.0,
        r_spread: 0.0,
    };
    let n = 20_000;
    let caps = (0..n)
        .map(|_| sample_shell(&mut rng, &shell))
        .filter(|v| v.z.abs() > 0.9)
        .count();
    let share = caps as f32 / n as f32;
    assert!((share - 0.1).abs() < 0.015, "polar cap share {share}");
}

#[test]
fn cone_volume_sampling_is_area_uniform() {
    // With a spiral of zero and a flat disk slice, half the points of a disk
    // fall within radius R/sqrt(2).
    let mut rng = StdRng::seed_from_u64(11);
    let cone = ConeParams {
        height: 8.0,
        radius: 3.0,
    };
    let n = 20_000;
    let inner = (0..n)
        .map(|_| sample_cone_volume(&mut rng, &cone, 0.0))
        .filter(|t| {
            let radial = (t.x * t.x + t.z * t.z).sqrt();
            radial <= cone.radius_at(t.y) / std::f32::consts::SQRT_2
        })
        .count();
    let share = inner as f32 / n as f32;
    assert!((share - 0.5).abs() < 0.02, "inner disk share {share}");
}

#[test]
fn radius_at_is_zero_outside_the_cone() {
    let cone = ConeParams {
        height: 8.0,
        radius: 3.0,
    };
    assert_eq!(cone.radius_at(-0.1), 0.0);
    assert_eq!(cone.radius_at(8.0), 0.0);
    assert!((cone.radius_at(0.0) - 3.0).abs() < EPS);
    assert!((cone.radius_at(4.0) - 1.5).abs() < EPS);
}

#[test]
fn invalid_shapes_are_rejected() {
    let mut shape = FoliageShape::default();
    shape.cone.height = 0.0;
    assert!(matches!(
        shape.validate(),
        Err(ConfigError::InvalidShape {
            name: "cone.height",
            ..
        })
    ));

    let mut shape = FoliageShape::default();
    shape.shell.r_spread = f32::NAN;
    assert!(shape.validate().is_err());

    let mut oshape = OrnamentShape::default();
    oshape.apex_reserve = oshape.cone.height;
    assert!(oshape.validate().is_err());

    assert!(FoliageShape::default().validate().is_ok());
    assert!(OrnamentShape::default().validate().is_ok());
}
