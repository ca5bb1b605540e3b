//! Platform-independent animation core.
//!
//! Nothing here touches the DOM or the GPU, so the whole module builds and
//! tests on the host.

pub mod beat;
pub mod blink;
pub mod camera;
pub mod config;
pub mod constants;
pub mod eyes;
pub mod face;
pub mod glitch;
pub mod head;
pub mod mesh;
pub mod random;
pub mod rig;
pub mod viewport;

pub use beat::{BeatClock, BeatSample, SharedBeat};
pub use config::{FaceConfig, FaceVariant, HostConfig};
pub use face::{FaceAnimator, LoadState};
pub use mesh::{AssetError, HeadMesh};
pub use rig::FaceRig;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../../shaders/scene.wgsl");
pub static POST_WGSL: &str = include_str!("../../shaders/post.wgsl");
