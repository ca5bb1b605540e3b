//! Per-variant tuning and host element configuration.

use super::constants::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceVariant {
    /// Calm face with camera drift and glitch flashes.
    Idle,
    /// Face that pulses with the shared beat clock.
    BeatReactive,
}

impl FaceVariant {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "face" | "idle" => Some(FaceVariant::Idle),
            "beat" | "face-beat" | "beat-reactive" => Some(FaceVariant::BeatReactive),
            _ => None,
        }
    }
}

/// Sinusoidal head rotation tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadMotionConfig {
    pub speed_x: f64,
    pub speed_y: f64,
    pub range_x: f32,
    pub range_y: f32,
    /// Adds a slower overlapping harmonic per axis.
    pub harmonics: bool,
}

/// Glitch flash scheduling. Delays are `(min, span)` pairs in ms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlitchConfig {
    pub first_delay: (f64, f64),
    pub rearm_delay: (f64, f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeConfig {
    pub size: f32,
    pub glow_radius: f32,
    pub glow_opacity: f32,
    pub pupil_opacity: f32,
    pub core_opacity: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FaceConfig {
    pub variant: FaceVariant,
    pub head: HeadMotionConfig,
    pub eyes: EyeConfig,
    pub glitch: Option<GlitchConfig>,
    /// Camera drifts and zooms; otherwise it stays fixed.
    pub camera_drift: bool,
    pub base_opacity: f32,
    pub base_bloom: f32,
    pub background_rgb: [f32; 3],
}

impl FaceConfig {
    pub fn idle() -> Self {
        Self {
            variant: FaceVariant::Idle,
            head: HeadMotionConfig {
                speed_x: 0.00006,
                speed_y: 0.00005,
                range_x: 0.06,
                range_y: 0.09,
                harmonics: true,
            },
            eyes: EyeConfig {
                size: 0.15,
                glow_radius: EYE_GLOW_RADIUS_IDLE,
                glow_opacity: 0.15,
                pupil_opacity: 1.2,
                core_opacity: 1.0,
            },
            glitch: Some(GlitchConfig {
                first_delay: (3000.0, 5000.0),
                rearm_delay: (2000.0, 6000.0),
            }),
            camera_drift: true,
            base_opacity: 0.35,
            base_bloom: 0.35,
            background_rgb: [0.0, 0.0, 0.0],
        }
    }

    pub fn beat_reactive() -> Self {
        Self {
            variant: FaceVariant::BeatReactive,
            head: HeadMotionConfig {
                speed_x: 0.00015,
                speed_y: 0.00012,
                range_x: 0.08,
                range_y: 0.12,
                harmonics: false,
            },
            eyes: EyeConfig {
                size: 0.18,
                glow_radius: EYE_GLOW_RADIUS_BEAT,
                glow_opacity: 0.2,
                pupil_opacity: 1.2,
                core_opacity: 1.0,
            },
            glitch: None,
            camera_drift: false,
            base_opacity: 0.25,
            base_bloom: 0.3,
            background_rgb: [5.0 / 255.0, 5.0 / 255.0, 5.0 / 255.0],
        }
    }

    pub fn for_variant(variant: FaceVariant) -> Self {
        match variant {
            FaceVariant::Idle => Self::idle(),
            FaceVariant::BeatReactive => Self::beat_reactive(),
        }
    }

    /// Dimmer bloom for phones and low-core machines.
    pub fn low_power(mut self) -> Self {
        if self.variant == FaceVariant::Idle {
            self.base_bloom = LOW_POWER_BLOOM;
        }
        self
    }

    #[inline]
    pub fn beat_reactive_variant(&self) -> bool {
        self.variant == FaceVariant::BeatReactive
    }
}

/// Attributes read from the host element.
#[derive(Clone, Debug, PartialEq)]
pub struct HostConfig {
    pub variant: FaceVariant,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub show_controls: bool,
    pub model_url: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            variant: FaceVariant::Idle,
            width: None,
            height: None,
            show_controls: false,
            model_url: HEAD_MODEL_URL.to_string(),
        }
    }
}

impl HostConfig {
    /// Build from an attribute lookup; unknown or malformed values keep defaults.
    pub fn from_attributes(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(v) = lookup("variant").as_deref().and_then(FaceVariant::parse) {
            cfg.variant = v;
        }
        cfg.width = lookup("width").as_deref().and_then(parse_px);
        cfg.height = lookup("height").as_deref().and_then(parse_px);
        cfg.show_controls = match lookup("controls") {
            Some(v) => !matches!(v.trim(), "false" | "0" | "off"),
            None => false,
        };
        if let Some(url) = lookup("model-url") {
            let url = url.trim();
            if !url.is_empty() {
                cfg.model_url = url.to_string();
            }
        }
        cfg
    }

    /// Initial CSS size: explicit attributes first, then the measured
    /// container, then a fixed fallback.
    pub fn initial_size(&self, measured_w: f64, measured_h: f64) -> (f64, f64) {
        let pick = |attr: Option<f64>, measured: f64| {
            attr.unwrap_or(if measured > 0.0 {
                measured
            } else {
                FALLBACK_SIZE_PX
            })
        };
        (pick(self.width, measured_w), pick(self.height, measured_h))
    }
}

fn parse_px(raw: &str) -> Option<f64> {
    let v: f64 = raw.trim().trim_end_matches("px").trim().parse().ok()?;
    (v.is_finite() && v > 0.0).then_some(v)
}

/// Phones and machines with few cores render at 1x with dimmer bloom.
pub fn is_low_power(user_agent: &str, hardware_concurrency: f64) -> bool {
    const MOBILE: [&str; 6] = ["Android", "iPhone", "iPad", "iPod", "Opera Mini", "IEMobile"];
    let ua = user_agent.to_ascii_lowercase();
    let mobile = MOBILE.iter().any(|m| ua.contains(&m.to_ascii_lowercase()));
    mobile || hardware_concurrency <= 4.0
}
