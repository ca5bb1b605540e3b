// Host-side tests for head micro-motion and camera drift.

use operator_face::core::beat::BeatSample;
use operator_face::core::camera::{fixed_pose, Camera, CameraDrift};
use operator_face::core::config::FaceConfig;
use operator_face::core::head::HeadMotion;
use operator_face::core::random::seeded;

fn playing(pulse: f32) -> BeatSample {
    BeatSample {
        playing: true,
        phase: 0.0,
        pulse,
    }
}

#[test]
fn head_pose_is_pure() {
    let cfg = FaceConfig::idle();
    let head = HeadMotion::new(&cfg.head, false, &mut seeded(11));
    let mut t = 0.0;
    while t < 200_000.0 {
        let a = head.pose(t, BeatSample::default());
        let b = head.pose(t, BeatSample::default());
        assert_eq!(a, b, "pose differs at t={t}");
        t += 977.0;
    }
    // evaluating other times in between changes nothing
    let before = head.pose(5_000.0, BeatSample::default());
    let _ = head.pose(123_456.0, playing(1.0));
    assert_eq!(before, head.pose(5_000.0, BeatSample::default()));
}

#[test]
fn idle_head_stays_within_summed_ranges() {
    let cfg = FaceConfig::idle();
    for seed in 0..20 {
        let head = HeadMotion::new(&cfg.head, false, &mut seeded(seed));
        let max_x = 0.06 * 1.3 + 1e-6;
        let max_y = 0.09 * 1.25 + 1e-6;
        let mut t = 0.0;
        while t < 500_000.0 {
            let p = head.pose(t, BeatSample::default());
            assert!(p.rot_x.abs() <= max_x && p.rot_y.abs() <= max_y);
            assert!((p.breath - 1.0).abs() <= 0.002 + 1e-6);
            t += 1_013.0;
        }
    }
}

#[test]
fn idle_head_ignores_the_beat() {
    let cfg = FaceConfig::idle();
    let head = HeadMotion::with_phases(&cfg.head, false, 0.3, 1.1);
    for t in [0.0, 1_000.0, 77_777.0] {
        assert_eq!(head.pose(t, BeatSample::default()), head.pose(t, playing(1.0)));
    }
}

#[test]
fn beat_head_range_grows_by_half_while_playing() {
    let cfg = FaceConfig::beat_reactive();
    let head = HeadMotion::with_phases(&cfg.head, true, 0.4, 2.2);
    let mut t = 0.0;
    while t < 60_000.0 {
        let calm = head.pose(t, BeatSample::default());
        let driven = head.pose(t, playing(0.0));
        assert!((driven.rot_x - calm.rot_x * 1.5).abs() < 1e-6, "t={t}");
        assert!((driven.rot_y - calm.rot_y * 1.5).abs() < 1e-6, "t={t}");
        t += 333.0;
    }
}

#[test]
fn beat_pulse_adds_to_breathing() {
    let cfg = FaceConfig::beat_reactive();
    let head = HeadMotion::with_phases(&cfg.head, true, 0.0, 0.0);
    let t = 4_321.0;
    let rest = head.pose(t, playing(0.0)).breath;
    let kick = head.pose(t, playing(1.0)).breath;
    assert!((kick - rest - 0.01).abs() < 1e-6);
}

#[test]
fn beat_head_has_no_harmonic() {
    let cfg = FaceConfig::beat_reactive();
    let head = HeadMotion::with_phases(&cfg.head, true, 0.5, 0.25);
    let t = 10_000.0_f64;
    let p = head.pose(t, BeatSample::default());
    let expected_x = (t * 0.00015 + 0.5).sin() as f32 * 0.08;
    let expected_y = (t * 0.00012 + 0.25).sin() as f32 * 0.12;
    assert!((p.rot_x - expected_x).abs() < 1e-6);
    assert!((p.rot_y - expected_y).abs() < 1e-6);
}

#[test]
fn idle_head_adds_secondary_harmonic() {
    let cfg = FaceConfig::idle();
    let (px, py) = (0.7, 1.9);
    let head = HeadMotion::with_phases(&cfg.head, false, px, py);
    let t = 25_000.0_f64;
    let p = head.pose(t, BeatSample::default());
    let x = (t * 0.00006 + px).sin() * 0.06 + (t * 0.00006 * 0.7 + px * 1.3).sin() * 0.06 * 0.3;
    let y = (t * 0.00005 + py).sin() * 0.09 + (t * 0.00005 * 0.6 + py * 1.7).sin() * 0.09 * 0.25;
    assert!((p.rot_x as f64 - x).abs() < 1e-5);
    assert!((p.rot_y as f64 - y).abs() < 1e-5);
}

#[test]
fn camera_drift_is_pure() {
    let drift = CameraDrift::new(&mut seeded(5));
    let mut t = 0.0;
    while t < 1_000_000.0 {
        assert_eq!(drift.pose(t), drift.pose(t), "t={t}");
        t += 4_999.0;
    }
}

#[test]
fn camera_drift_stays_in_its_envelope() {
    for seed in 0..20 {
        let drift = CameraDrift::new(&mut seeded(seed));
        let mut t = 0.0;
        while t < 2_000_000.0 {
            let pose = drift.pose(t);
            assert!(pose.eye.x.abs() <= 0.3 + 1e-5);
            assert!((pose.eye.y - 0.5).abs() <= 0.138 + 1e-5);
            assert!((21.0..=29.0).contains(&pose.eye.z), "z={}", pose.eye.z);
            assert!(pose.look_at.x.abs() <= 0.03 + 1e-6);
            assert!(pose.look_at.y.abs() <= 0.02 + 1e-6);
            assert_eq!(pose.look_at.z, 0.0);
            t += 7_919.0;
        }
    }
}

#[test]
fn zoom_starts_fully_out() {
    let drift = CameraDrift {
        phase_x: 0.0,
        phase_y: 0.0,
        phase_look_x: 0.0,
        phase_look_y: 0.0,
    };
    let pose = drift.pose(0.0);
    assert!((pose.eye.z - 29.0).abs() < 1e-5);
    assert!(pose.eye.x.abs() < 1e-6);
    assert!((pose.eye.y - 0.5).abs() < 1e-6);
}

#[test]
fn beat_face_uses_fixed_camera() {
    let pose = fixed_pose();
    assert_eq!(pose.eye.to_array(), [0.0, 0.5, 16.0]);
    assert_eq!(pose.look_at.to_array(), [0.0, 0.0, 0.0]);
}

#[test]
fn camera_projects_look_target_to_screen_center() {
    let mut camera = Camera::new(16.0 / 9.0);
    camera.pose = fixed_pose();
    let clip = camera.view_projection() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
    let ndc = clip.truncate() / clip.w;
    assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
    assert!((0.0..1.0).contains(&ndc.z));
}
