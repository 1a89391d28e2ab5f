use std::path::PathBuf;

use clap::{Parser, ValueHint};
use optics::BeamConfig;
use shared::AppResult;

#[derive(Debug, Parser)]
#[command(
    name = "beamsmear",
    about = "Generate Guinea-PIG beam files with truncated Gaussian smearing"
)]
pub struct CliArgs {
    /// Optional path to a JSON beam configuration file.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Path of the beam file to write.
    #[arg(long, short, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Base seed; the six variables use SEED through SEED+5.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Fractional energy spread sigma_E / E.
    #[arg(long, value_name = "FRACTION")]
    pub energy_spread: Option<f64>,

    /// Number of macroparticles to write.
    #[arg(long, short = 'n', value_name = "COUNT")]
    pub particles: Option<u64>,

    /// Mean beam energy in GeV.
    #[arg(long, value_name = "GEV")]
    pub mean_energy: Option<f64>,

    /// Truncate every variable at +- this many standard deviations.
    #[arg(long, value_name = "SIGMAS")]
    pub truncate: Option<f64>,

    /// RMS bunch length sigma_z in microns.
    #[arg(long, value_name = "UM")]
    pub bunch_length: Option<f64>,

    /// Horizontal beta function in mm.
    #[arg(long, value_name = "MM")]
    pub beta_x: Option<f64>,

    /// Vertical beta function in mm.
    #[arg(long, value_name = "MM")]
    pub beta_y: Option<f64>,

    /// Horizontal normalized emittance in 10^-6 m rad.
    #[arg(long, value_name = "EMITTANCE")]
    pub emitt_x: Option<f64>,

    /// Vertical normalized emittance in 10^-6 m rad.
    #[arg(long, value_name = "EMITTANCE")]
    pub emitt_y: Option<f64>,

    /// Derive transverse sizes from the nominal energy only.
    #[arg(long)]
    pub nominal_gamma: bool,

    /// Give up on a particle after this many rejected candidates.
    #[arg(long, value_name = "COUNT")]
    pub max_attempts: Option<u64>,

    /// Write a JSON run summary to this path.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub summary: Option<PathBuf>,

    /// Print the derived beam parameters and exit without sampling.
    #[arg(long)]
    pub print_params: bool,
}

/// Everything a single invocation needs.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub beam: BeamConfig,
    pub summary: Option<PathBuf>,
    pub print_params: bool,
}

impl RunOptions {
    /// Defaults, then the config file, then command line overrides.
    ///
    /// The beam itself is validated when the sampler is built.
    pub fn from_cli(args: CliArgs) -> AppResult<Self> {
        let mut beam = if let Some(path) = args.config.as_ref() {
            BeamConfig::from_path(path)?
        } else {
            BeamConfig::default()
        };

        if let Some(output) = args.output {
            beam.output_path = output;
        }
        if let Some(seed) = args.seed {
            beam.seed = seed;
        }
        if let Some(spread) = args.energy_spread {
            beam.energy_spread = spread;
        }
        if let Some(particles) = args.particles {
            beam.particle_count = particles;
        }
        if let Some(energy) = args.mean_energy {
            beam.mean_energy = energy;
        }
        if let Some(truncate) = args.truncate {
            beam.truncate = truncate;
        }
        if let Some(length) = args.bunch_length {
            beam.bunch_length = length;
        }
        if let Some(beta) = args.beta_x {
            beam.beta_x = beta;
        }
        if let Some(beta) = args.beta_y {
            beam.beta_y = beta;
        }
        if let Some(emittance) = args.emitt_x {
            beam.emitt_x = emittance;
        }
        if let Some(emittance) = args.emitt_y {
            beam.emitt_y = emittance;
        }
        if args.nominal_gamma {
            beam.per_particle_gamma = false;
        }
        if let Some(attempts) = args.max_attempts {
            beam.max_attempts = attempts;
        }

        Ok(Self {
            beam,
            summary: args.summary,
            print_params: args.print_params,
        })
    }
}
