use beamfile::{BeamFileWriter, RecordSink};
use optics::{BeamConfig, DerivedSigmas};
use shared::AppResult;
use smear::TruncatedSampler;
use tracing::info;

use crate::report::{build_summary, ColumnStats, RunSummary};

/// Sample `count` particles into `sink`, returning their column statistics.
pub fn generate<S: RecordSink>(
    sampler: &mut TruncatedSampler,
    count: u64,
    sink: &mut S,
) -> AppResult<ColumnStats> {
    let mut columns = ColumnStats::default();
    sampler.sample_into(count, |record| {
        columns.record(&record);
        sink.write_record(&record)
    })?;
    sink.finish()?;
    Ok(columns)
}

/// Validate `config`, then write its beam file.
///
/// Nothing is created on disk when the configuration is rejected.
pub fn run(config: &BeamConfig) -> AppResult<RunSummary> {
    let mut sampler = TruncatedSampler::new(config)?;
    log_parameters(config, sampler.nominal());

    let mut sink = BeamFileWriter::create(&config.output_path)?;
    let columns = generate(&mut sampler, config.particle_count, &mut sink)?;

    let summary = build_summary(
        &config.output_path,
        config.seed,
        config.truncate,
        *sampler.nominal(),
        sampler.stats(),
        &columns,
    );
    info!(
        path = ?config.output_path,
        particles = summary.particles,
        attempts = summary.attempts,
        acceptance = format!("{:.2}%", summary.acceptance_ratio * 100.0),
        "beam file written"
    );
    Ok(summary)
}

pub fn log_parameters(config: &BeamConfig, sigmas: &DerivedSigmas) {
    info!(
        path = ?config.output_path,
        particles = config.particle_count,
        seed = config.seed,
        mean_energy_gev = config.mean_energy,
        gamma = sigmas.gamma,
        energy_spread = config.energy_spread,
        sigma_e_gev = sigmas.energy,
        sigma_x_um = sigmas.x,
        sigma_y_um = sigmas.y,
        sigma_z_um = sigmas.z,
        sigma_xp_urad = sigmas.x_prime,
        sigma_yp_urad = sigmas.y_prime,
        truncate = config.truncate,
        per_particle_gamma = config.per_particle_gamma,
        "beam parameters"
    );
}

/// Human readable parameter block for `--print-params`.
pub fn render_parameters(config: &BeamConfig, sigmas: &DerivedSigmas) -> String {
    let rows = [
        ("bfile", config.output_path.display().to_string()),
        ("N", config.particle_count.to_string()),
        ("seed", config.seed.to_string()),
        ("Ebeam  (GeV)", config.mean_energy.to_string()),
        ("gamma", format!("{:.6}", sigmas.gamma)),
        ("sE/E", config.energy_spread.to_string()),
        ("sigmaE (GeV)", format!("{:.6}", sigmas.energy)),
        ("sigmaX  (um)", format!("{:.6}", sigmas.x)),
        ("sigmaY  (um)", format!("{:.6}", sigmas.y)),
        ("sigmaZ  (um)", format!("{:.6}", sigmas.z)),
        ("sigmaXP (urad)", format!("{:.6}", sigmas.x_prime)),
        ("sigmaYP (urad)", format!("{:.6}", sigmas.y_prime)),
        ("truncate (+-sigma)", config.truncate.to_string()),
        ("per-particle gamma", config.per_particle_gamma.to_string()),
    ];

    let mut out = String::new();
    for (name, value) in rows {
        out.push_str(&format!("{name:<20} {value}\n"));
    }
    out
}
