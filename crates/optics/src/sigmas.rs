use serde::Serialize;
use shared::AppResult;
use tracing::warn;

use crate::config::{BeamConfig, TRUNCATE_WARN_THRESHOLD};
use crate::constants::{lorentz_gamma, EMITTANCE_TO_SI, MM_TO_M, SI_TO_MICRO};

/// Standard deviations of the six smeared variables.
///
/// Energy in GeV, positions in microns, angles in micro-radians. `gamma` is
/// the Lorentz factor the transverse sigmas were last derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedSigmas {
    pub energy: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub x_prime: f64,
    pub y_prime: f64,
    pub gamma: f64,
}

/// One transverse plane in SI units.
#[derive(Debug, Clone, Copy)]
struct Plane {
    emittance: f64,
    beta: f64,
}

impl Plane {
    fn new(emittance: f64, beta_mm: f64) -> Self {
        Self {
            emittance: emittance * EMITTANCE_TO_SI,
            beta: beta_mm * MM_TO_M,
        }
    }

    fn size(&self, gamma: f64) -> f64 {
        SI_TO_MICRO * (self.emittance * self.beta / gamma).sqrt()
    }

    fn divergence(&self, gamma: f64) -> f64 {
        SI_TO_MICRO * (self.emittance / (gamma * self.beta)).sqrt()
    }
}

/// Turns beam optics into Gaussian widths for the sampler.
#[derive(Debug, Clone)]
pub struct ParameterDeriver {
    mean_energy: f64,
    sigma_energy: f64,
    bunch_length: f64,
    horizontal: Plane,
    vertical: Plane,
}

impl ParameterDeriver {
    /// Validates `config` and captures its optics in SI units.
    ///
    /// This is the one place a run's configuration is checked.
    pub fn new(config: &BeamConfig) -> AppResult<Self> {
        config.validate()?;
        if config.truncate < TRUNCATE_WARN_THRESHOLD {
            warn!(
                truncate = config.truncate,
                "truncation bound below one sigma; most candidate draws will be rejected"
            );
        }
        Ok(Self {
            mean_energy: config.mean_energy,
            sigma_energy: config.sigma_energy(),
            bunch_length: config.bunch_length,
            horizontal: Plane::new(config.emitt_x, config.beta_x),
            vertical: Plane::new(config.emitt_y, config.beta_y),
        })
    }

    pub fn mean_energy(&self) -> f64 {
        self.mean_energy
    }

    /// Sigmas at the nominal beam energy.
    pub fn initial(&self) -> DerivedSigmas {
        let mut sigmas = DerivedSigmas {
            energy: self.sigma_energy,
            x: 0.0,
            y: 0.0,
            z: self.bunch_length,
            x_prime: 0.0,
            y_prime: 0.0,
            gamma: 0.0,
        };
        self.rederive_transverse(&mut sigmas, self.mean_energy);
        sigmas
    }

    /// Overwrite the four transverse sigmas for a particle of energy
    /// `sampled_energy`. Energy and bunch length widths are untouched.
    pub fn rederive_transverse(&self, sigmas: &mut DerivedSigmas, sampled_energy: f64) {
        let gamma = lorentz_gamma(sampled_energy);
        sigmas.gamma = gamma;
        sigmas.x = self.horizontal.size(gamma);
        sigmas.y = self.vertical.size(gamma);
        sigmas.x_prime = self.horizontal.divergence(gamma);
        sigmas.y_prime = self.vertical.divergence(gamma);
    }
}
