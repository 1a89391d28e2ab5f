//! Beam optics inputs and the Gaussian widths derived from them.

pub mod config;
pub mod constants;
pub mod sigmas;

pub use config::{BeamConfig, DEFAULT_MAX_ATTEMPTS};
pub use constants::{lorentz_gamma, ELECTRON_REST_MASS_GEV};
pub use sigmas::{DerivedSigmas, ParameterDeriver};
