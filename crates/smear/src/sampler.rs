use optics::{BeamConfig, DerivedSigmas, ParameterDeriver};
use serde::Serialize;
use shared::{AppError, AppResult};
use tracing::{debug, trace};

use crate::record::{Component, ParticleRecord};
use crate::rng::StreamSet;

/// Counters for one sampling run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SamplerStats {
    pub accepted: u64,
    pub attempts: u64,
    pub rejected: u64,
    /// How often each variable fell outside the bound, in column order.
    pub out_of_range: [u64; 6],
}

impl SamplerStats {
    pub fn acceptance_ratio(&self) -> f64 {
        if self.attempts == 0 {
            return 1.0;
        }
        self.accepted as f64 / self.attempts as f64
    }
}

/// Rejection sampler for the truncated six-dimensional Gaussian beam.
///
/// A candidate is drawn as a whole: energy first, then the transverse widths
/// are rederived for that energy, then x, y, z, x' and y'. If any of the six
/// lies at or beyond `truncate` standard deviations the whole candidate is
/// discarded.
#[derive(Debug, Clone)]
pub struct TruncatedSampler {
    deriver: ParameterDeriver,
    nominal: DerivedSigmas,
    sigmas: DerivedSigmas,
    streams: StreamSet,
    truncate: f64,
    per_particle_gamma: bool,
    max_attempts: u64,
    stats: SamplerStats,
}

impl TruncatedSampler {
    pub fn new(config: &BeamConfig) -> AppResult<Self> {
        let deriver = ParameterDeriver::new(config)?;
        let nominal = deriver.initial();
        Ok(Self {
            deriver,
            nominal,
            sigmas: nominal,
            streams: StreamSet::new(config.seed),
            truncate: config.truncate,
            per_particle_gamma: config.per_particle_gamma,
            max_attempts: config.max_attempts,
            stats: SamplerStats::default(),
        })
    }

    /// Sigmas at the nominal beam energy.
    pub fn nominal(&self) -> &DerivedSigmas {
        &self.nominal
    }

    /// Sigmas used for the most recent candidate.
    pub fn current(&self) -> &DerivedSigmas {
        &self.sigmas
    }

    pub fn stats(&self) -> &SamplerStats {
        &self.stats
    }

    /// Draw candidates until one lies inside the truncation box.
    pub fn next_record(&mut self) -> AppResult<ParticleRecord> {
        let mean_energy = self.deriver.mean_energy();

        for _ in 0..self.max_attempts {
            self.stats.attempts += 1;

            let energy = self
                .streams
                .gaussian(Component::Energy, mean_energy, self.sigmas.energy);
            // Non-positive energy has no gamma; the draw is still made in
            // full so every stream advances once per attempt.
            let physical = energy > 0.0;
            if self.per_particle_gamma && physical {
                self.deriver.rederive_transverse(&mut self.sigmas, energy);
            }
            let x = self.streams.gaussian(Component::X, 0.0, self.sigmas.x);
            let y = self.streams.gaussian(Component::Y, 0.0, self.sigmas.y);
            let z = self.streams.gaussian(Component::Z, 0.0, self.sigmas.z);
            let x_prime = self.streams.gaussian(Component::XPrime, 0.0, self.sigmas.x_prime);
            let y_prime = self.streams.gaussian(Component::YPrime, 0.0, self.sigmas.y_prime);

            let candidate = ParticleRecord {
                energy,
                x,
                y,
                z,
                x_prime,
                y_prime,
            };

            if !physical {
                self.stats.out_of_range[Component::Energy.index()] += 1;
            } else if self.accept(&candidate, mean_energy) {
                self.stats.accepted += 1;
                return Ok(candidate);
            }

            self.stats.rejected += 1;
            trace!(?candidate, "candidate outside truncation box");
        }

        Err(AppError::RetryLimitExceeded {
            particle: self.stats.accepted,
            attempts: self.max_attempts,
        })
    }

    /// Produce `count` records, handing each to `emit` as soon as it is accepted.
    pub fn sample_into<F>(&mut self, count: u64, mut emit: F) -> AppResult<()>
    where
        F: FnMut(ParticleRecord) -> AppResult<()>,
    {
        for _ in 0..count {
            let record = self.next_record()?;
            emit(record)?;
        }
        debug!(
            accepted = self.stats.accepted,
            attempts = self.stats.attempts,
            rejected = self.stats.rejected,
            "sampling finished"
        );
        Ok(())
    }

    fn accept(&mut self, candidate: &ParticleRecord, mean_energy: f64) -> bool {
        let means = [mean_energy, 0.0, 0.0, 0.0, 0.0, 0.0];
        let widths = [
            self.sigmas.energy,
            self.sigmas.x,
            self.sigmas.y,
            self.sigmas.z,
            self.sigmas.x_prime,
            self.sigmas.y_prime,
        ];

        let mut in_range = true;
        for (i, value) in candidate.to_array().into_iter().enumerate() {
            if !within(value, means[i], widths[i], self.truncate) {
                self.stats.out_of_range[i] += 1;
                in_range = false;
            }
        }
        in_range
    }
}

/// A zero-width variable sits exactly on its mean and always passes.
pub fn within(value: f64, mean: f64, std_dev: f64, truncate: f64) -> bool {
    if std_dev == 0.0 {
        return true;
    }
    ((value - mean) / std_dev).abs() < truncate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> BeamConfig {
        BeamConfig {
            seed,
            particle_count: 500,
            ..BeamConfig::default()
        }
    }

    #[test]
    fn within_is_strict() {
        assert!(within(1.9, 0.0, 1.0, 2.0));
        assert!(!within(2.0, 0.0, 1.0, 2.0));
        assert!(!within(-2.5, 0.0, 1.0, 2.0));
        assert!(within(45.6, 45.6, 0.0, 0.5));
    }

    #[test]
    fn accepted_records_lie_inside_the_box() {
        let mut cfg = config(21);
        cfg.truncate = 1.5;
        let mut sampler = TruncatedSampler::new(&cfg).unwrap();
        let deriver = ParameterDeriver::new(&cfg).unwrap();
        let nominal = deriver.initial();

        for _ in 0..500 {
            let record = sampler.next_record().unwrap();
            let mut sigmas = nominal;
            deriver.rederive_transverse(&mut sigmas, record.energy);
            assert!(((record.energy - cfg.mean_energy) / sigmas.energy).abs() < cfg.truncate);
            assert!((record.x / sigmas.x).abs() < cfg.truncate);
            assert!((record.y / sigmas.y).abs() < cfg.truncate);
            assert!((record.z / sigmas.z).abs() < cfg.truncate);
            assert!((record.x_prime / sigmas.x_prime).abs() < cfg.truncate);
            assert!((record.y_prime / sigmas.y_prime).abs() < cfg.truncate);
        }
        assert!(sampler.stats().rejected > 0, "a 1.5 sigma box must reject some draws");
        assert_eq!(
            sampler.stats().attempts,
            sampler.stats().accepted + sampler.stats().rejected
        );
    }

    #[test]
    fn transverse_widths_follow_each_energy_sample() {
        let mut sampler = TruncatedSampler::new(&config(3)).unwrap();
        let record = sampler.next_record().unwrap();
        let expected = optics::lorentz_gamma(record.energy);
        assert_eq!(sampler.current().gamma, expected);
        assert_ne!(sampler.current().x, sampler.nominal().x);
    }

    #[test]
    fn nominal_gamma_mode_keeps_widths_fixed() {
        let mut cfg = config(3);
        cfg.per_particle_gamma = false;
        let mut sampler = TruncatedSampler::new(&cfg).unwrap();
        for _ in 0..20 {
            sampler.next_record().unwrap();
        }
        assert_eq!(sampler.current(), sampler.nominal());
    }

    #[test]
    fn zero_vertical_emittance_pins_y_to_zero() {
        let mut cfg = config(8);
        cfg.emitt_y = 0.0;
        let mut sampler = TruncatedSampler::new(&cfg).unwrap();
        sampler
            .sample_into(200, |record| {
                assert_eq!(record.y, 0.0);
                assert_eq!(record.y_prime, 0.0);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn same_seed_reproduces_records() {
        let mut a = TruncatedSampler::new(&config(99)).unwrap();
        let mut b = TruncatedSampler::new(&config(99)).unwrap();
        for _ in 0..100 {
            assert_eq!(a.next_record().unwrap(), b.next_record().unwrap());
        }

        let mut c = TruncatedSampler::new(&config(100)).unwrap();
        let mut d = TruncatedSampler::new(&config(99)).unwrap();
        assert_ne!(c.next_record().unwrap(), d.next_record().unwrap());
    }

    #[test]
    fn non_positive_energies_are_never_accepted() {
        let mut cfg = config(77);
        cfg.energy_spread = 0.6;
        cfg.truncate = 10.0;
        cfg.emitt_y = 0.0;
        let mut sampler = TruncatedSampler::new(&cfg).unwrap();
        sampler
            .sample_into(500, |record| {
                assert!(record.energy > 0.0, "energy {}", record.energy);
                assert!(record.x.is_finite() && record.x_prime.is_finite());
                assert_eq!(record.y, 0.0);
                assert_eq!(record.y_prime, 0.0);
                Ok(())
            })
            .unwrap();

        let stats = sampler.stats();
        assert!(stats.rejected > 0, "a 60% spread must produce negative energies");
        assert_eq!(stats.out_of_range[Component::Energy.index()], stats.rejected);
        assert!(sampler.current().x.is_finite());
    }

    #[test]
    fn retry_cap_surfaces_distinct_error() {
        let mut cfg = config(1);
        cfg.truncate = 0.01;
        cfg.max_attempts = 3;
        let mut sampler = TruncatedSampler::new(&cfg).unwrap();
        match sampler.next_record() {
            Err(AppError::RetryLimitExceeded { particle, attempts }) => {
                assert_eq!(particle, 0);
                assert_eq!(attempts, 3);
            }
            other => panic!("expected retry limit, got {other:?}"),
        }
    }

    #[test]
    fn sink_errors_stop_sampling() {
        let mut sampler = TruncatedSampler::new(&config(4)).unwrap();
        let mut seen = 0;
        let result = sampler.sample_into(10, |_| {
            seen += 1;
            if seen == 3 {
                return Err(AppError::Message("disk full".into()));
            }
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(seen, 3);
        assert_eq!(sampler.stats().accepted, 3);
    }

    #[test]
    fn wide_box_matches_configured_moments() {
        let mut cfg = config(2024);
        cfg.truncate = 10.0;
        let mut sampler = TruncatedSampler::new(&cfg).unwrap();
        let n = 20_000;
        let mut sum = [0.0; 6];
        let mut sum_sq = [0.0; 6];
        sampler
            .sample_into(n, |record| {
                for (i, value) in record.to_array().into_iter().enumerate() {
                    sum[i] += value;
                    sum_sq[i] += value * value;
                }
                Ok(())
            })
            .unwrap();
        assert_eq!(sampler.stats().rejected, 0);

        let nominal = *sampler.nominal();
        let means = [cfg.mean_energy, 0.0, 0.0, 0.0, 0.0, 0.0];
        let widths = [
            nominal.energy,
            nominal.x,
            nominal.y,
            nominal.z,
            nominal.x_prime,
            nominal.y_prime,
        ];
        let count = n as f64;
        for i in 0..6 {
            let mean = sum[i] / count;
            let std = (sum_sq[i] / count - mean * mean).max(0.0).sqrt();
            // five standard errors on the mean, three percent on the width
            assert!(
                (mean - means[i]).abs() < 5.0 * widths[i] / count.sqrt(),
                "column {i}: mean {mean} vs {}",
                means[i]
            );
            assert!(
                (std - widths[i]).abs() < 0.03 * widths[i],
                "column {i}: std {std} vs {}",
                widths[i]
            );
        }
    }
}
