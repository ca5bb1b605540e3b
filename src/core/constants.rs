// Shared animation and scene tuning constants.
//
// Time values are in milliseconds; angular speeds are radians per millisecond.

use std::f64::consts::TAU;

// Beat clock
pub const DEFAULT_BPM: f64 = 100.0;
pub const MS_PER_MINUTE: f64 = 60_000.0;

// Blink timing
pub const BLINK_CLOSE_MS: f64 = 80.0; // eyelid closes fast
pub const BLINK_OPEN_MS: f64 = 180.0; // and reopens slower
pub const BLINK_REARM_MIN_MS: f64 = 3000.0;
pub const BLINK_REARM_SPAN_MS: f64 = 4000.0; // next blink in [3000, 7000)

// Eye reference vertices on the head model
pub const LEFT_EYE_VERTEX: usize = 5248;
pub const RIGHT_EYE_VERTEX: usize = 558;

// Eye breathing and beat response
pub const EYE_BREATH_BASE: f32 = 0.95;
pub const EYE_BREATH_AMP: f32 = 0.05;
pub const EYE_BREATH_SPEED: f64 = 0.002;
pub const EYE_BEAT_SCALE: f32 = 0.1;
pub const PUPIL_BEAT_BASE: f32 = 1.0;
pub const PUPIL_BEAT_GAIN: f32 = 0.5;
pub const GLOW_BEAT_BASE: f32 = 0.2;
pub const GLOW_BEAT_GAIN: f32 = 0.3;

// Eye disc geometry relative to the eye size
pub const EYE_GLOW_RADIUS_IDLE: f32 = 2.0;
pub const EYE_GLOW_RADIUS_BEAT: f32 = 2.5;
pub const EYE_CORE_RADIUS: f32 = 0.4;

// Head placement
pub const HEAD_SCALE: f32 = 1.8;
pub const HEAD_BASE_Y: f32 = -2.0;
pub const HEAD_BREATH_SPEED: f64 = 0.0003;
pub const HEAD_BREATH_AMP: f32 = 0.002;
pub const HEAD_BEAT_SCALE: f32 = 0.01;
pub const HEAD_BEAT_MOTION: f32 = 1.5; // range multiplier while playing

// Secondary head harmonic (idle variant)
pub const HEAD_HARMONIC_X: (f64, f64, f32) = (0.7, 1.3, 0.3); // speed, phase, range factors
pub const HEAD_HARMONIC_Y: (f64, f64, f32) = (0.6, 1.7, 0.25);

// Camera
pub const CAMERA_FOVY_DEG: f32 = 40.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;
pub const CAMERA_BASE_Y: f32 = 0.5;
pub const CAMERA_BEAT_Z: f32 = 16.0;
pub const ZOOM_BASE_Z: f32 = 25.0;
pub const ZOOM_RANGE: f32 = 4.0; // zooms between 21 and 29
pub const ZOOM_SPEED: f64 = 0.00002;
pub const ZOOM_PHASE: f64 = std::f64::consts::FRAC_PI_2; // start zoomed out

// Glitch flash
pub const GLITCH_MAX_FRAMES: u32 = 3;
pub const GLITCH_OPACITY_MIN: f32 = 0.7;
pub const GLITCH_OPACITY_SPAN: f32 = 0.3;
pub const GLITCH_BLOOM_MIN: f32 = 0.9;
pub const GLITCH_BLOOM_SPAN: f32 = 0.4;
pub const GLITCH_JITTER_X: f32 = 0.06;
pub const GLITCH_JITTER_Y: f32 = 0.04;

// Idle wireframe shimmer (beat variant while stopped)
pub const SHIMMER_SPEED: f64 = 0.002;
pub const SHIMMER_AMP: f32 = 0.05;

// Post-processing
pub const BLOOM_RADIUS: f32 = 1.0;
pub const BLOOM_THRESHOLD: f32 = 0.3;
pub const LOW_POWER_BLOOM: f32 = 0.25;

// Viewport
pub const MAX_PIXEL_RATIO: f64 = 2.0;
pub const FALLBACK_SIZE_PX: f64 = 300.0;

pub const WIREFRAME_RGB: [f32; 3] = [0.0, 1.0, 65.0 / 255.0]; // #00ff41
pub const HEAD_MODEL_URL: &str = "https://cdn.jsdelivr.net/gh/mrdoob/three.js@dev/examples/models/gltf/LeePerrySmith/LeePerrySmith.glb";

/// Upper bound (exclusive) for per-instance random phase offsets.
pub const PHASE_SPAN: f64 = TAU;

// Status label shown over the canvas
pub const LOADING_TEXT: &str = "LOADING OPERATOR...";
pub const OFFLINE_TEXT: &str = "OPERATOR OFFLINE";
