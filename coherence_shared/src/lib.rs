//! `coherence_shared`
//!
//! Building blocks for reconstructing smooth motion of networked bindings
//! from discrete, irregularly arriving samples.
//!
//! Design goals:
//! - Deterministic and single-threaded; callers own and serialize access.
//! - Clear separation of concerns (samples, buffering, smoothing, strategies).
//! - Per-type behaviour behind one capability trait, no runtime type switches.
//! - No `unsafe`.

pub mod config;
pub mod error;
pub mod interpolator;
pub mod math;
pub mod sample;
pub mod sample_buffer;
pub mod smoothing;
pub mod value;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::config::*;
    pub use crate::error::*;
    pub use crate::interpolator::*;
    pub use crate::math::*;
    pub use crate::sample::*;
    pub use crate::sample_buffer::{AdjacentSamples, SampleBuffer};
    pub use crate::value::*;
}
