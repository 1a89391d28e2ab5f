use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::{AppError, AppResult};

pub(crate) const DEFAULT_OUTPUT_PATH: &str = "electronZ.ini";
const DEFAULT_SEED: u64 = 13;
const DEFAULT_ENERGY_SPREAD: f64 = 0.003;
const DEFAULT_PARTICLE_COUNT: u64 = 80_000;
const DEFAULT_MEAN_ENERGY_GEV: f64 = 45.6;
const DEFAULT_TRUNCATE: f64 = 4.0;
const DEFAULT_BUNCH_LENGTH_UM: f64 = 410.0;
const DEFAULT_BETA_X_MM: f64 = 18.0;
const DEFAULT_BETA_Y_MM: f64 = 0.39;
const DEFAULT_EMITT_X: f64 = 6.2;
const DEFAULT_EMITT_Y: f64 = 0.0485;
pub const DEFAULT_MAX_ATTEMPTS: u64 = 1_000_000;

/// Below this bound the rejection rate climbs steeply.
pub(crate) const TRUNCATE_WARN_THRESHOLD: f64 = 1.0;

/// Beam parameters for one generated file.
///
/// Energies are in GeV, beta functions in mm, normalized emittances in
/// 10^-6 m rad and the bunch length in microns, matching Guinea-PIG input
/// conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamConfig {
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_energy_spread")]
    pub energy_spread: f64,
    #[serde(default = "default_particle_count")]
    pub particle_count: u64,
    #[serde(default = "default_mean_energy")]
    pub mean_energy: f64,
    #[serde(default = "default_truncate")]
    pub truncate: f64,
    #[serde(default = "default_bunch_length")]
    pub bunch_length: f64,
    #[serde(default = "default_beta_x")]
    pub beta_x: f64,
    #[serde(default = "default_beta_y")]
    pub beta_y: f64,
    #[serde(default = "default_emitt_x")]
    pub emitt_x: f64,
    #[serde(default = "default_emitt_y")]
    pub emitt_y: f64,
    /// Recompute transverse sigmas from each sampled energy.
    #[serde(default = "default_per_particle_gamma")]
    pub per_particle_gamma: bool,
    /// Safety cap on candidate draws for a single particle.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u64,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            seed: default_seed(),
            energy_spread: default_energy_spread(),
            particle_count: default_particle_count(),
            mean_energy: default_mean_energy(),
            truncate: default_truncate(),
            bunch_length: default_bunch_length(),
            beta_x: default_beta_x(),
            beta_y: default_beta_y(),
            emitt_x: default_emitt_x(),
            emitt_y: default_emitt_y(),
            per_particle_gamma: default_per_particle_gamma(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl BeamConfig {
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|err| AppError::Message(format!("failed to read beam config {path:?}: {err}")))?;
        serde_json::from_str(&contents)
            .map_err(|err| AppError::Message(format!("invalid beam config JSON: {err}")))
    }

    /// Nominal energy spread in GeV.
    pub fn sigma_energy(&self) -> f64 {
        self.energy_spread * self.mean_energy
    }

    /// Reject parameter sets that cannot be sampled, before any output exists.
    pub fn validate(&self) -> AppResult<()> {
        let finite = [
            ("mean_energy", self.mean_energy),
            ("energy_spread", self.energy_spread),
            ("bunch_length", self.bunch_length),
            ("beta_x", self.beta_x),
            ("beta_y", self.beta_y),
            ("emitt_x", self.emitt_x),
            ("emitt_y", self.emitt_y),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(AppError::invalid(format!("{name} must be finite, got {value}")));
            }
        }
        // An infinite bound switches truncation off.
        if self.truncate.is_nan() {
            return Err(AppError::invalid("truncate must be a number"));
        }

        if self.mean_energy <= 0.0 {
            return Err(AppError::invalid(format!(
                "mean energy must be positive, got {} GeV",
                self.mean_energy
            )));
        }
        if self.energy_spread < 0.0 {
            return Err(AppError::invalid("energy spread must not be negative"));
        }
        if self.bunch_length < 0.0 {
            return Err(AppError::invalid("bunch length must not be negative"));
        }
        if self.emitt_x < 0.0 || self.emitt_y < 0.0 {
            return Err(AppError::invalid("emittances must not be negative"));
        }
        if self.beta_x <= 0.0 || self.beta_y <= 0.0 {
            return Err(AppError::invalid("beta functions must be positive"));
        }
        if self.truncate <= 0.0 {
            return Err(AppError::invalid(format!(
                "truncation bound must be positive, got {}",
                self.truncate
            )));
        }
        if self.max_attempts == 0 {
            return Err(AppError::invalid("max_attempts must be at least 1"));
        }

        Ok(())
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_energy_spread() -> f64 {
    DEFAULT_ENERGY_SPREAD
}

fn default_particle_count() -> u64 {
    DEFAULT_PARTICLE_COUNT
}

fn default_mean_energy() -> f64 {
    DEFAULT_MEAN_ENERGY_GEV
}

fn default_truncate() -> f64 {
    DEFAULT_TRUNCATE
}

fn default_bunch_length() -> f64 {
    DEFAULT_BUNCH_LENGTH_UM
}

fn default_beta_x() -> f64 {
    DEFAULT_BETA_X_MM
}

fn default_beta_y() -> f64 {
    DEFAULT_BETA_Y_MM
}

fn default_emitt_x() -> f64 {
    DEFAULT_EMITT_X
}

fn default_emitt_y() -> f64 {
    DEFAULT_EMITT_Y
}

fn default_per_particle_gamma() -> bool {
    true
}

fn default_max_attempts() -> u64 {
    DEFAULT_MAX_ATTEMPTS
}
