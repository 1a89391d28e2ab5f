//! Truncated Gaussian smearing of macroparticle coordinates.

pub mod record;
pub mod rng;
pub mod sampler;

pub use record::{Component, ParticleRecord};
pub use rng::{BeamStream, StreamSet};
pub use sampler::{within, SamplerStats, TruncatedSampler};
