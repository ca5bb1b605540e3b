// Host-side tests for face variants, host attributes and the resize adapter.

use operator_face::core::config::{is_low_power, FaceConfig, FaceVariant, HostConfig};
use operator_face::core::viewport::Viewport;
use std::collections::HashMap;

fn attrs(pairs: &[(&str, &str)]) -> HostConfig {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    HostConfig::from_attributes(|key| map.get(key).cloned())
}

#[test]
fn variant_names() {
    assert_eq!(FaceVariant::parse("face"), Some(FaceVariant::Idle));
    assert_eq!(FaceVariant::parse("idle"), Some(FaceVariant::Idle));
    assert_eq!(FaceVariant::parse("beat"), Some(FaceVariant::BeatReactive));
    assert_eq!(FaceVariant::parse("face-beat"), Some(FaceVariant::BeatReactive));
    assert_eq!(FaceVariant::parse("disco"), None);
}

#[test]
fn variant_presets_differ_where_expected() {
    let idle = FaceConfig::idle();
    let beat = FaceConfig::beat_reactive();
    assert!(idle.camera_drift && !beat.camera_drift);
    assert!(idle.glitch.is_some() && beat.glitch.is_none());
    assert!(idle.head.harmonics && !beat.head.harmonics);
    assert!(beat.head.speed_x > idle.head.speed_x);
    assert_eq!((idle.base_opacity, idle.base_bloom), (0.35, 0.35));
    assert_eq!((beat.base_opacity, beat.base_bloom), (0.25, 0.3));
    assert_eq!(FaceConfig::for_variant(FaceVariant::BeatReactive), beat);
}

#[test]
fn low_power_dims_only_the_idle_bloom() {
    assert_eq!(FaceConfig::idle().low_power().base_bloom, 0.25);
    assert_eq!(FaceConfig::beat_reactive().low_power().base_bloom, 0.3);
}

#[test]
fn host_defaults() {
    let host = attrs(&[]);
    assert_eq!(host, HostConfig::default());
    assert_eq!(host.variant, FaceVariant::Idle);
    assert!(!host.show_controls);
    assert!(host.model_url.ends_with("LeePerrySmith.glb"));
}

#[test]
fn host_attributes_are_parsed() {
    let host = attrs(&[
        ("variant", "beat"),
        ("width", "320px"),
        ("height", " 240 "),
        ("controls", ""),
        ("model-url", "/assets/head.glb"),
    ]);
    assert_eq!(host.variant, FaceVariant::BeatReactive);
    assert_eq!(host.width, Some(320.0));
    assert_eq!(host.height, Some(240.0));
    assert!(host.show_controls, "a bare controls attribute enables them");
    assert_eq!(host.model_url, "/assets/head.glb");
}

#[test]
fn malformed_host_attributes_keep_defaults() {
    let host = attrs(&[
        ("variant", "sideways"),
        ("width", "-5"),
        ("height", "tall"),
        ("controls", "false"),
        ("model-url", "   "),
    ]);
    assert_eq!(host.variant, FaceVariant::Idle);
    assert_eq!(host.width, None);
    assert_eq!(host.height, None);
    assert!(!host.show_controls);
    assert_eq!(host.model_url, HostConfig::default().model_url);
}

#[test]
fn initial_size_prefers_attributes_then_measurement() {
    let host = attrs(&[("width", "500")]);
    assert_eq!(host.initial_size(800.0, 600.0), (500.0, 600.0));
    assert_eq!(host.initial_size(0.0, 0.0), (500.0, 300.0));
}

#[test]
fn low_power_detection() {
    let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)";
    let desktop = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/128.0";
    assert!(is_low_power(iphone, 8.0));
    assert!(is_low_power("Mozilla/5.0 (Linux; Android 14)", 8.0));
    assert!(is_low_power(desktop, 4.0));
    assert!(!is_low_power(desktop, 16.0));
}

#[test]
fn pixel_ratio_is_capped() {
    let vp = Viewport::new(400.0, 300.0, 3.0, false);
    assert_eq!(vp.pixel_size(), (800, 600));
    let vp = Viewport::new(400.0, 300.0, 1.5, false);
    assert_eq!(vp.pixel_size(), (600, 450));
    let vp = Viewport::new(400.0, 300.0, 0.5, false);
    assert_eq!(vp.pixel_size(), (400, 300));
    let low = Viewport::new(400.0, 300.0, 3.0, true);
    assert_eq!(low.pixel_size(), (400, 300));
}

#[test]
fn resize_reports_aspect_and_backing_size() {
    let mut vp = Viewport::new(400.0, 300.0, 2.0, false);
    let change = vp.observe(800.0, 400.0).expect("size changed");
    assert_eq!(change.aspect, 2.0);
    assert_eq!((change.width_px, change.height_px), (1600, 800));
    assert_eq!(vp.current(), change);
}

#[test]
fn resize_ignores_collapsed_and_repeated_sizes() {
    let mut vp = Viewport::new(400.0, 300.0, 1.0, false);
    assert_eq!(vp.observe(0.0, 300.0), None);
    assert_eq!(vp.observe(400.0, -1.0), None);
    assert_eq!(vp.observe(f64::NAN, 300.0), None);
    assert_eq!(vp.observe(400.0, 300.0), None);
    assert!(vp.observe(401.0, 300.0).is_some());
    assert_eq!(vp.pixel_size(), (401, 300));
}
