// Host-side tests for the ornament animator: categories, weighted easing,
// repulsion, packing and the light colour override.

use glam::{Mat4, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tree_core::constants::{gold_vec3, srgb_to_linear_vec3, GOLD};
use tree_core::layout::{generate_ornament_placements, OrnamentShape, Placement};
use tree_core::ornaments::*;
use tree_core::pointer::{pointer_world, repulsion, sanitize_ndc, RepulsionParams};
use tree_core::ConfigError;

const EPS: f32 = 1e-4;

fn make_field(count: usize, seed: u64) -> OrnamentField {
    let params = OrnamentParams::default();
    let placements = generate_ornament_placements(
        count,
        &OrnamentShape::default(),
        &mut StdRng::seed_from_u64(seed),
    );
    OrnamentField::new(build_ornaments(&placements, &params), params).expect("valid field")
}

// Repulsion off, so positions are the pure blend.
fn no_pointer() -> Option<Vec2> {
    None
}

#[test]
fn category_rule_partitions_indices() {
    for i in 0..1000usize {
        let expected = if i % 10 == 0 {
            Category::Gift
        } else if i % 3 == 0 {
            Category::Light
        } else {
            Category::Ball
        };
        assert_eq!(Category::for_index(i), expected, "index {i}");
    }
    assert_eq!(Category::for_index(0), Category::Gift);
    assert_eq!(Category::for_index(30), Category::Gift);
    assert_eq!(Category::for_index(3), Category::Light);
    assert_eq!(Category::for_index(1), Category::Ball);
}

#[test]
fn category_counts_sum_to_total_and_buffers_are_exact() {
    for n in [0usize, 1, 10, 99, 300] {
        let field = make_field(n, 5);
        let counts = field.counts();
        assert_eq!(counts.total(), n);
        for c in Category::ALL {
            assert_eq!(field.instances(c).len(), counts.get(c));
        }
        assert_eq!(counts, CategoryCounts::of(field.ornaments()));
    }
    let counts = make_field(300, 5).counts();
    assert_eq!(counts.gift, 30);
    assert_eq!(counts.light, 90);
    assert_eq!(counts.ball, 180);
}

#[test]
fn weights_follow_category_and_gift_is_heaviest() {
    let field = make_field(60, 1);
    for o in field.ornaments() {
        let expected = field.params().style(o.category).weight;
        assert_eq!(o.weight, expected);
    }
    let p = OrnamentParams::default();
    assert!(p.gift.weight > p.ball.weight);
    assert!(p.ball.weight > p.light.weight);
}

#[test]
fn local_progress_endpoints_are_weight_independent() {
    for w in [0.01f32, 0.2, 1.0, 3.0, 50.0] {
        assert_eq!(local_progress(0.0, w, 0.5), 0.0);
        assert!((local_progress(1.0, w, 0.5) - 1.0).abs() < 1e-6);
    }
}

// The weight lag is the "heavy ornament" illusion: a heavier ornament may tie
// but must never lead a lighter one on the way in.
#[test]
fn heavier_ornaments_lag_lighter_ones() {
    let weights = [0.2f32, 1.0, 3.0];
    for i in 1..100 {
        let p = i as f32 / 100.0;
        let light = local_progress(p, weights[0], 0.5);
        let ball = local_progress(p, weights[1], 0.5);
        let gift = local_progress(p, weights[2], 0.5);
        assert!(gift <= ball && ball <= light, "ordering broken at p={p}");
        assert!(gift < light, "no lag at p={p}");
    }
}

#[test]
fn positions_hit_chaos_and_target_at_the_endpoints() {
    let mut field = make_field(120, 2);
    field.update(0.0, 0.0, no_pointer());
    for o in field.ornaments().to_vec() {
        let slot = packed_index(&field, o.index);
        let pos = field.instances(o.category)[slot].translation();
        assert!(pos.abs_diff_eq(o.chaos, EPS), "ornament {} not at chaos", o.index);
    }
    field.update(1.0, 0.0, no_pointer());
    for o in field.ornaments().to_vec() {
        let slot = packed_index(&field, o.index);
        let pos = field.instances(o.category)[slot].translation();
        assert!(pos.abs_diff_eq(o.target, EPS), "ornament {} not at target", o.index);
    }
}

fn packed_index(field: &OrnamentField, index: usize) -> usize {
    let category = field.ornaments()[index].category;
    field.ornaments()[..index]
        .iter()
        .filter(|o| o.category == category)
        .count()
}

#[test]
fn repulsion_is_zero_outside_the_radius() {
    let params = RepulsionParams::default();
    let pointer = Vec3::new(0.0, 3.0, 0.0);
    for d in [params.radius, params.radius + 0.01, 10.0] {
        let pos = pointer + Vec3::new(d, 0.0, 0.0);
        assert_eq!(repulsion(pos, pointer, 1.0, &params), Vec3::ZERO);
    }
}

#[test]
fn repulsion_pushes_away_with_linear_falloff_and_weight_resistance() {
    let params = RepulsionParams::default();
    let pointer = Vec3::new(1.0, 2.0, 0.0);
    let pos = pointer + Vec3::new(0.0, 0.0, 1.0);
    let push = repulsion(pos, pointer, 1.0, &params);
    // (1 - 1/2.5) * 0.5 / 1 = 0.3 along +z
    assert!(push.abs_diff_eq(Vec3::new(0.0, 0.0, 0.3), EPS), "{push:?}");

    let heavy = repulsion(pos, pointer, 3.0, &params);
    assert!((heavy.length() - 0.1).abs() < EPS);

    let closer = repulsion(pointer + Vec3::new(0.0, 0.0, 0.5), pointer, 1.0, &params);
    assert!(closer.length() > push.length());
}

#[test]
fn repulsion_at_the_pointer_is_finite_and_points_up() {
    let params = RepulsionParams::default();
    let pointer = Vec3::new(0.0, 3.0, 0.0);
    let push = repulsion(pointer, pointer, 1.0, &params);
    assert!(push.is_finite());
    assert!(push.abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), EPS), "{push:?}");
}

#[test]
fn pointer_maps_ndc_to_world_plane() {
    let params = RepulsionParams::default();
    assert!(pointer_world(Vec2::ZERO, &params).abs_diff_eq(Vec3::new(0.0, 3.0, 0.0), EPS));
    assert!(pointer_world(Vec2::new(1.0, -1.0), &params)
        .abs_diff_eq(Vec3::new(5.0, -2.0, 0.0), EPS));
    assert_eq!(sanitize_ndc(Vec2::new(f32::NAN, 0.0)), None);
    assert_eq!(sanitize_ndc(Vec2::new(3.0, -7.0)), Some(Vec2::new(1.0, -1.0)));
}

#[test]
fn repulsion_is_applied_after_the_blend() {
    // One ball placed right under the pointer-plane centre.
    let params = OrnamentParams::default();
    let placements = [
        Placement {
            chaos: Vec3::new(20.0, 0.0, 0.0),
            target: Vec3::new(0.0, 4.0, 0.0),
        },
        Placement {
            chaos: Vec3::new(20.0, 0.0, 0.0),
            target: Vec3::new(0.0, 4.0, 0.0),
        },
    ];
    let mut field =
        OrnamentField::new(build_ornaments(&placements, &params), params).expect("valid field");
    // index 1 is a ball (weight 1); pointer (0, 0) maps to (0, 3, 0), distance 1
    field.update(1.0, 0.0, Some(Vec2::ZERO));
    let pos = field.instances(Category::Ball)[0].translation();
    assert!(pos.abs_diff_eq(Vec3::new(0.0, 4.3, 0.0), EPS), "{pos:?}");

    // The table itself is untouched.
    assert_eq!(field.ornaments()[1].target, Vec3::new(0.0, 4.0, 0.0));

    // A NaN pointer disables repulsion instead of poisoning the output.
    field.update(1.0, 0.0, Some(Vec2::new(f32::NAN, f32::NAN)));
    let pos = field.instances(Category::Ball)[0].translation();
    assert!(pos.abs_diff_eq(Vec3::new(0.0, 4.0, 0.0), EPS));
}

// Lights always glow gold, whatever palette entry their index selects.
#[test]
fn lights_override_palette_with_gold() {
    let mut field = make_field(300, 4);
    field.update(0.5, 1.0, no_pointer());
    let gold = srgb_to_linear_vec3(GOLD);
    for inst in field.instances(Category::Light) {
        let c = Vec3::new(inst.color[0], inst.color[1], inst.color[2]);
        assert!(c.abs_diff_eq(gold, 1e-5), "light colour {c:?}");
        assert_eq!(inst.color[3], 1.0);
    }
    // Lights would otherwise have picked up non-gold palette entries.
    assert!(field
        .ornaments()
        .iter()
        .any(|o| o.category == Category::Light && Vec3::from(o.color) != gold_vec3()));

    let balls: Vec<&Ornament> = field
        .ornaments()
        .iter()
        .filter(|o| o.category == Category::Ball)
        .collect();
    for (inst, o) in field.instances(Category::Ball).iter().zip(balls) {
        let c = Vec3::new(inst.color[0], inst.color[1], inst.color[2]);
        assert!(c.abs_diff_eq(srgb_to_linear_vec3(o.color), 1e-5));
    }
}

#[test]
fn scales_by_category_and_lights_twinkle() {
    let mut field = make_field(40, 8);
    let params = field.params().clone();
    for t in [0.0f32, 0.4, 1.3] {
        field.update(1.0, t, no_pointer());
        for inst in field.instances(Category::Gift) {
            let (s, _, _) = Mat4::from_cols_array_2d(&inst.model).to_scale_rotation_translation();
            assert!((s.x - params.gift.scale).abs() < EPS);
        }
        for inst in field.instances(Category::Ball) {
            let (s, _, _) = Mat4::from_cols_array_2d(&inst.model).to_scale_rotation_translation();
            assert!((s.x - params.ball.scale).abs() < EPS);
        }
        for inst in field.instances(Category::Light) {
            let (s, _, _) = Mat4::from_cols_array_2d(&inst.model).to_scale_rotation_translation();
            assert!((s.x - params.light.scale).abs() <= params.light_twinkle_amplitude + EPS);
        }
    }
}

#[test]
fn rotation_never_moves_the_ornament() {
    let mut field = make_field(50, 12);
    field.update(0.7, 0.0, no_pointer());
    let before: Vec<Vec3> = field
        .instances(Category::Ball)
        .iter()
        .map(|i| i.translation())
        .collect();
    field.update(0.7, 5.0, no_pointer());
    for (inst, b) in field.instances(Category::Ball).iter().zip(before) {
        assert!(inst.translation().abs_diff_eq(b, EPS));
    }
}

#[test]
fn non_positive_weights_fail_at_construction() {
    for bad in [0.0f32, -1.0, f32::NAN] {
        let mut params = OrnamentParams::default();
        params.gift.weight = bad;
        let err = params.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositiveWeight {
                category: Category::Gift,
                ..
            }
        ));
    }

    let params = OrnamentParams::default();
    let placements = [Placement {
        chaos: Vec3::X,
        target: Vec3::Y,
    }];
    let mut table = build_ornaments(&placements, &params);
    table[0].weight = 0.0;
    assert!(OrnamentField::new(table, params).is_err());

    let mut params = OrnamentParams::default();
    params.palette.clear();
    assert_eq!(params.validate().unwrap_err(), ConfigError::EmptyPalette);
}

#[test]
fn non_finite_progress_or_time_reuses_the_last_good_frame() {
    let mut field = make_field(90, 6);
    field.update(0.5, 1.0, no_pointer());
    let good: Vec<Vec<OrnamentInstance>> = Category::ALL
        .iter()
        .map(|&c| field.instances(c).to_vec())
        .collect();

    for (progress, time) in [(f32::NAN, 1.0), (0.5, f32::NAN), (f32::NAN, f32::INFINITY)] {
        field.update(progress, time, no_pointer());
        for (c, before) in Category::ALL.iter().zip(&good) {
            assert_eq!(field.instances(*c), &before[..], "{c:?} progress={progress} time={time}");
        }
    }

    for c in Category::ALL {
        for inst in field.instances(c) {
            assert!(inst.model.iter().flatten().all(|v| v.is_finite()));
        }
    }
}
