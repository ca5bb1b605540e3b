//! Animated wireframe "operator" face for the web.
//!
//! [`core`] holds the platform-independent animation state and builds on
//! any target. Everything that touches the DOM or WebGPU is wasm-only.

pub mod core;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod asset;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod render;

#[cfg(target_arch = "wasm32")]
pub use app::{mount_operator_face, BeatHandle, FaceHandle};
