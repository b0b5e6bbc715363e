#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_without_overrides() {
    let config = EngineConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.animation.base_duration_ms, 500.0);
    assert_eq!(config.animation.max_duration_ms, 3000.0);
    assert_eq!(config.tour.interval_ms, 3000.0);
    assert_eq!(config.tour.easing, Easing::Default);
}

#[test]
fn default_range_bounds() {
    let camera = CameraConfig::default();
    assert_eq!(camera.min_range, Scalar::parse("1e-100").unwrap());
    assert_eq!(camera.max_range, Scalar::parse("1e100").unwrap());
    assert_eq!(camera.default_range, Scalar::one());
}

#[test]
fn overrides_are_applied() {
    let config = EngineConfig::from_lookup(lookup_from(&[
        ("DEEPZOOM_MIN_RANGE", "1e-300"),
        ("DEEPZOOM_REFILTER_PAN_FRACTION", "0.2"),
        ("DEEPZOOM_BASE_DURATION_MS", "250"),
        ("DEEPZOOM_TOUR_INTERVAL_MS", "1500"),
        ("DEEPZOOM_TOUR_EASING", "drone"),
    ]))
    .unwrap();
    assert_eq!(config.camera.min_range, Scalar::parse("1e-300").unwrap());
    assert_eq!(config.visibility.pan_fraction, 0.2);
    assert_eq!(config.animation.base_duration_ms, 250.0);
    assert_eq!(config.tour.interval_ms, 1500.0);
    assert_eq!(config.tour.easing, Easing::Drone);
}

#[test]
fn unknown_easing_name_falls_back() {
    let config = EngineConfig::from_lookup(lookup_from(&[("DEEPZOOM_TOUR_EASING", "wobble")])).unwrap();
    assert_eq!(config.tour.easing, Easing::Default);
}

#[test]
fn unparseable_number_is_rejected() {
    let err = EngineConfig::from_lookup(lookup_from(&[("DEEPZOOM_MAX_DURATION_MS", "soon")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref var, .. } if var == "DEEPZOOM_MAX_DURATION_MS"));
}

#[test]
fn negative_duration_is_rejected() {
    let err = EngineConfig::from_lookup(lookup_from(&[("DEEPZOOM_BASE_DURATION_MS", "-5")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn unparseable_range_is_rejected() {
    let err = EngineConfig::from_lookup(lookup_from(&[("DEEPZOOM_MAX_RANGE", "huge")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn inverted_range_bounds_are_rejected() {
    let err = EngineConfig::from_lookup(lookup_from(&[("DEEPZOOM_MIN_RANGE", "10"), ("DEEPZOOM_MAX_RANGE", "1")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidRangeBounds { .. }));
}

#[test]
fn zero_min_range_is_rejected() {
    let err = EngineConfig::from_lookup(lookup_from(&[("DEEPZOOM_MIN_RANGE", "0")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidRangeBounds { .. }));
}

#[test]
fn default_range_is_clamped_into_bounds() {
    let config =
        EngineConfig::from_lookup(lookup_from(&[("DEEPZOOM_MAX_RANGE", "10"), ("DEEPZOOM_DEFAULT_RANGE", "50")]))
            .unwrap();
    assert_eq!(config.camera.default_range, Scalar::from(10));
}

#[test]
fn clamp_range_limits_both_ends() {
    let camera = CameraConfig::default();
    assert_eq!(camera.clamp_range(&Scalar::parse("1e-500").unwrap()), camera.min_range);
    assert_eq!(camera.clamp_range(&Scalar::parse("1e500").unwrap()), camera.max_range);
    assert_eq!(camera.clamp_range(&Scalar::from(3)), Scalar::from(3));
}

#[test]
fn unset_environment_variable_reads_as_none() {
    assert_eq!(env_var("DEEPZOOM_TEST_VARIABLE_THAT_IS_NEVER_SET"), None);
}
