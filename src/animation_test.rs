#![allow(clippy::float_cmp)]

use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::easing::ALL_EASINGS;

fn s(text: &str) -> Scalar {
    Scalar::parse(text).unwrap()
}

fn wp(x: f64, y: f64, range: &str) -> Waypoint {
    Waypoint::new(Vector2::from_f64(x, y), s(range))
}

fn flag() -> (Rc<Cell<u32>>, Callback) {
    let count = Rc::new(Cell::new(0));
    let inner = Rc::clone(&count);
    let callback: Callback = Box::new(move || inner.set(inner.get() + 1));
    (count, callback)
}

// --- animate_to ---

#[test]
fn idle_animator_does_nothing() {
    let mut camera = Camera::default();
    let mut animator = Animator::new();
    assert_eq!(animator.step(&mut camera, 100.0), Step::Idle);
    assert_eq!(camera, Camera::default());
}

#[test]
fn linear_midpoint() {
    let mut camera = Camera::default();
    let mut animator = Animator::new();
    animator.animate_to(&mut camera, wp(10.0, 10.0, "2"), 100.0, Easing::Linear, 0.0, None);
    assert_eq!(animator.step(&mut camera, 50.0), Step::Running { progress: 0.5 });
    assert_eq!(camera.pos, Vector2::from_f64(5.0, 5.0));
    assert_eq!(camera.range, s("1.5"));
}

#[test]
fn targets_are_set_on_start() {
    let mut camera = Camera::default();
    let mut animator = Animator::new();
    animator.animate_to(&mut camera, wp(3.0, 4.0, "0.5"), 100.0, Easing::Linear, 0.0, None);
    assert_eq!(camera.target_pos, Vector2::from_f64(3.0, 4.0));
    assert_eq!(camera.target_range, s("0.5"));
    assert_eq!(camera.pos, Vector2::zero());
}

#[test]
fn every_easing_lands_exactly_on_target() {
    for easing in ALL_EASINGS {
        let mut camera = Camera::default();
        let mut animator = Animator::new();
        let target = Waypoint::new(Vector2::new(s("0.1234567890123456789"), s("-7")), s("1e-80"));
        animator.animate_to(&mut camera, target.clone(), 400.0, easing, 0.0, None);
        for t in [100.0, 200.0, 399.0] {
            animator.step(&mut camera, t);
        }
        assert_eq!(animator.step(&mut camera, 400.0), Step::Finished, "{}", easing.name());
        assert_eq!(camera.pos, target.pos, "{}", easing.name());
        assert_eq!(camera.range, target.range, "{}", easing.name());
        assert!(!animator.is_animating());
    }
}

#[test]
fn overshooting_easings_keep_range_near_the_zoom() {
    for easing in ALL_EASINGS {
        let mut camera = Camera::default();
        let mut animator = Animator::new();
        animator.animate_to(&mut camera, wp(0.0, 0.0, "0.001"), 1000.0, easing, 0.0, None);
        let mut t = 0.0;
        while animator.is_animating() {
            t += 10.0;
            animator.step(&mut camera, t);
            let log = camera.range.log10().unwrap();
            assert!((-5.0..=2.0).contains(&log), "{} at {t}ms: log10(range) = {log}", easing.name());
        }
        assert_eq!(camera.range, s("0.001"), "{}", easing.name());
    }
}

#[test]
fn range_past_either_end_scales_geometrically() {
    let (start, target) = (s("1"), s("0.01"));
    assert_eq!(range_at(&start, &target, 0.5), s("0.505"));
    let over = range_at(&start, &target, 1.5).log10().unwrap();
    assert!((over + 3.0).abs() < 1e-9);
    let under = range_at(&start, &target, -0.5).log10().unwrap();
    assert!((under - 1.0).abs() < 1e-9);
}

#[test]
fn callback_fires_once_on_finish() {
    let mut camera = Camera::default();
    let mut animator = Animator::new();
    let (count, callback) = flag();
    animator.animate_to(&mut camera, wp(1.0, 0.0, "1"), 100.0, Easing::Default, 0.0, Some(callback));
    animator.step(&mut camera, 50.0);
    assert_eq!(count.get(), 0);
    animator.step(&mut camera, 100.0);
    animator.step(&mut camera, 200.0);
    assert_eq!(count.get(), 1);
}

#[test]
fn zero_duration_completes_on_first_step() {
    let mut camera = Camera::default();
    let mut animator = Animator::new();
    animator.animate_to(&mut camera, wp(2.0, 2.0, "1"), 0.0, Easing::Linear, 0.0, None);
    assert_eq!(animator.step(&mut camera, 0.0), Step::Finished);
    assert_eq!(camera.pos, Vector2::from_f64(2.0, 2.0));
}

#[test]
fn new_animation_supersedes_running_one() {
    let mut camera = Camera::default();
    let mut animator = Animator::new();
    let (first, callback) = flag();
    animator.animate_to(&mut camera, wp(10.0, 0.0, "1"), 100.0, Easing::Linear, 0.0, Some(callback));
    animator.step(&mut camera, 50.0);
    assert_eq!(camera.pos, Vector2::from_f64(5.0, 0.0));

    // Restart from where the camera is now.
    animator.animate_to(&mut camera, wp(5.0, 10.0, "1"), 100.0, Easing::Linear, 50.0, None);
    animator.step(&mut camera, 100.0);
    assert_eq!(camera.pos, Vector2::from_f64(5.0, 5.0));
    animator.step(&mut camera, 150.0);
    assert_eq!(camera.pos, Vector2::from_f64(5.0, 10.0));
    assert_eq!(first.get(), 0);
}

#[test]
fn target_range_is_clamped() {
    let mut camera = Camera::default();
    let mut animator = Animator::new();
    animator.animate_to(&mut camera, wp(0.0, 0.0, "1e-500"), 10.0, Easing::Linear, 0.0, None);
    animator.step(&mut camera, 10.0);
    assert_eq!(camera.range, camera.bounds().min_range);
}

#[test]
fn progress_never_runs_backwards() {
    let mut camera = Camera::default();
    let mut animator = Animator::new();
    animator.animate_to(&mut camera, wp(10.0, 0.0, "1"), 100.0, Easing::Linear, 0.0, None);
    animator.step(&mut camera, 60.0);
    assert_eq!(animator.step(&mut camera, 20.0), Step::Running { progress: 0.6 });
    assert_eq!(camera.pos, Vector2::from_f64(6.0, 0.0));
}

#[test]
fn cancel_stops_in_place_without_callback() {
    let mut camera = Camera::default();
    let mut animator = Animator::new();
    let (count, callback) = flag();
    animator.animate_to(&mut camera, wp(10.0, 0.0, "1"), 100.0, Easing::Linear, 0.0, Some(callback));
    animator.step(&mut camera, 30.0);
    animator.cancel(&mut camera);
    assert!(!animator.is_animating());
    assert_eq!(camera.target_pos, camera.pos);
    assert_eq!(animator.step(&mut camera, 200.0), Step::Idle);
    assert_eq!(camera.pos, Vector2::from_f64(3.0, 0.0));
    assert_eq!(count.get(), 0);
}

#[test]
fn perturbed_easing_moves_off_the_straight_path() {
    let mut camera = Camera::default();
    let mut animator = Animator::new();
    animator.animate_to(&mut camera, wp(10.0, 0.0, "1"), 100.0, Easing::Crane, 0.0, None);
    animator.step(&mut camera, 50.0);
    assert!(!camera.pos.y.is_zero());
}

// --- animate_through_points ---

#[test]
fn waypoints_are_visited_in_order() {
    let mut camera = Camera::default();
    let mut animator = Animator::new();
    let config = AnimationConfig::default();
    let (count, callback) = flag();
    let points = vec![wp(1.0, 0.0, "0.5"), wp(2.0, 0.0, "0.25"), wp(3.0, 0.0, "0.125")];
    animator.animate_through_points(&mut camera, points.clone(), Easing::Linear, 0.0, &config, Some(callback));
    assert_eq!(animator.pending_legs(), 2);

    assert_eq!(animator.step(&mut camera, 300.0), Step::LegComplete { remaining: 1 });
    assert_eq!(camera.pos, points[0].pos);
    assert_eq!(camera.range, points[0].range);
    assert_eq!(camera.target_pos, points[1].pos);

    // The second leg starts where the first landed.
    assert!(matches!(animator.step(&mut camera, 450.0), Step::Running { .. }));
    assert_eq!(camera.pos, Vector2::from_f64(1.5, 0.0));

    assert_eq!(animator.step(&mut camera, 600.0), Step::LegComplete { remaining: 0 });
    assert_eq!(camera.pos, points[1].pos);
    assert_eq!(count.get(), 0);

    assert!(matches!(animator.step(&mut camera, 1199.0), Step::Running { .. }));
    assert_eq!(animator.step(&mut camera, 1200.0), Step::Finished);
    assert_eq!(camera.pos, points[2].pos);
    assert_eq!(camera.range, points[2].range);
    assert_eq!(count.get(), 1);
}

#[test]
fn single_waypoint_uses_final_leg_duration() {
    let mut camera = Camera::default();
    let mut animator = Animator::new();
    let config = AnimationConfig::default();
    animator.animate_through_points(&mut camera, vec![wp(4.0, 0.0, "1")], Easing::Linear, 0.0, &config, None);
    assert_eq!(animator.step(&mut camera, 300.0), Step::Running { progress: 0.5 });
    assert_eq!(animator.step(&mut camera, 600.0), Step::Finished);
}

#[test]
fn empty_waypoint_list_is_noop() {
    let mut camera = Camera::default();
    let mut animator = Animator::new();
    let config = AnimationConfig::default();
    animator.animate_to(&mut camera, wp(10.0, 0.0, "1"), 100.0, Easing::Linear, 0.0, None);
    animator.animate_through_points(&mut camera, Vec::new(), Easing::Linear, 0.0, &config, None);
    assert!(animator.is_animating());
    assert_eq!(camera.target_pos, Vector2::from_f64(10.0, 0.0));
}

#[test]
fn direct_animation_drops_pending_legs() {
    let mut camera = Camera::default();
    let mut animator = Animator::new();
    let config = AnimationConfig::default();
    let points = vec![wp(1.0, 0.0, "1"), wp(2.0, 0.0, "1"), wp(3.0, 0.0, "1")];
    animator.animate_through_points(&mut camera, points, Easing::Linear, 0.0, &config, None);
    animator.animate_to(&mut camera, wp(-1.0, 0.0, "1"), 100.0, Easing::Linear, 10.0, None);
    assert_eq!(animator.pending_legs(), 0);
    assert_eq!(animator.step(&mut camera, 110.0), Step::Finished);
    assert_eq!(camera.pos, Vector2::from_f64(-1.0, 0.0));
}

// --- Durations ---

#[test]
fn leg_durations() {
    let config = AnimationConfig::default();
    assert_eq!(leg_duration(0, 3, Easing::Linear, &config), 300.0);
    assert_eq!(leg_duration(2, 3, Easing::Linear, &config), 600.0);
    assert_eq!(leg_duration(0, 3, Easing::Orbital, &config), 450.0);
    assert_eq!(leg_duration(2, 3, Easing::Earthquake, &config), 900.0);
}

#[test]
fn navigation_duration_at_zero_distance_is_base() {
    let camera = Camera::default();
    let config = AnimationConfig::default();
    assert_eq!(navigation_duration(&camera, &Vector2::zero(), &config), 500.0);
}

#[test]
fn navigation_duration_grows_with_relative_distance() {
    let camera = Camera::default();
    let config = AnimationConfig::default();
    let d = navigation_duration(&camera, &Vector2::from_f64(2.0, 0.0), &config);
    assert!((d - 1000.0).abs() < 1e-9);
}

#[test]
fn navigation_duration_is_capped() {
    let camera = Camera::default();
    let config = AnimationConfig::default();
    assert_eq!(navigation_duration(&camera, &Vector2::from_f64(1e6, 0.0), &config), 3000.0);
}

#[test]
fn navigation_duration_is_relative_to_zoom() {
    let mut camera = Camera::default();
    camera.jump_to(Vector2::zero(), &s("1e-50"));
    let config = AnimationConfig::default();
    let far = navigation_duration(&camera, &Vector2::from_f64(1.0, 0.0), &config);
    assert_eq!(far, 3000.0);
    let near = navigation_duration(&camera, &Vector2::new(s("2e-50"), Scalar::zero()), &config);
    assert!((near - 1000.0).abs() < 1e-9);
}
