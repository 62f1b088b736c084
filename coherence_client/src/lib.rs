//! `coherence_client`
//!
//! Client-side systems:
//! - Per-binding interpolation with adaptive playback delay
//! - Teleport detection and stop/resume handling
//! - Simulated sample feed with latency, jitter and reordering
//! - Replay driver used by the `replay` binary

pub mod interp;
pub mod replay;
pub mod simulator;

pub use interp::BindingInterpolator;
