//! Physical constants and unit conversions used when deriving beam sigmas.

/// Electron rest mass energy in GeV.
pub const ELECTRON_REST_MASS_GEV: f64 = 0.5109989461e-3;

/// Beta functions are given in mm.
pub const MM_TO_M: f64 = 1.0e-3;

/// Normalized emittances are given in 10^-6 m rad.
pub const EMITTANCE_TO_SI: f64 = 1.0e-6;

/// Metres to microns, radians to micro-radians.
pub const SI_TO_MICRO: f64 = 1.0e6;

/// Lorentz factor of an electron with the given total energy in GeV.
pub fn lorentz_gamma(energy_gev: f64) -> f64 {
    energy_gev / ELECTRON_REST_MASS_GEV
}
