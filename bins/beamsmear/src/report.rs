use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use optics::DerivedSigmas;
use serde::Serialize;
use shared::{AppError, AppResult};
use smear::{Component, ParticleRecord, SamplerStats};

/// Running moments of one column, updated one record at a time.
#[derive(Debug, Clone, Copy, Default)]
struct Moments {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl Moments {
    fn push(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    fn std_dev(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        (self.m2 / self.count as f64).sqrt()
    }
}

/// Per-column statistics of the records written so far.
#[derive(Debug, Clone, Default)]
pub struct ColumnStats {
    columns: [Moments; 6],
}

impl ColumnStats {
    pub fn record(&mut self, record: &ParticleRecord) {
        for (moments, value) in self.columns.iter_mut().zip(record.to_array()) {
            moments.push(value);
        }
    }

    pub fn count(&self) -> u64 {
        self.columns[0].count
    }

    pub fn mean(&self, component: Component) -> f64 {
        self.columns[component.index()].mean
    }

    pub fn std_dev(&self, component: Component) -> f64 {
        self.columns[component.index()].std_dev()
    }

    fn summaries(&self) -> Vec<ColumnSummary> {
        Component::ALL
            .into_iter()
            .map(|component| {
                let moments = &self.columns[component.index()];
                ColumnSummary {
                    component,
                    mean: moments.mean,
                    std_dev: moments.std_dev(),
                    min: moments.min,
                    max: moments.max,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub component: Component,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub seed: u64,
    pub generated_at: String,
    pub particles: u64,
    pub attempts: u64,
    pub rejected: u64,
    pub acceptance_ratio: f64,
    pub truncate: f64,
    pub nominal_sigmas: DerivedSigmas,
    pub out_of_range: Vec<(Component, u64)>,
    pub columns: Vec<ColumnSummary>,
}

impl RunSummary {
    pub fn write_json(&self, path: &Path) -> AppResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Message(format!("failed to serialise run summary: {err}")))?;
        fs::create_dir_all(path.parent().unwrap_or_else(|| Path::new(".")))
            .map_err(|err| AppError::Message(format!("failed to create directory for {path:?}: {err}")))?;
        fs::write(path, json)
            .map_err(|err| AppError::Message(format!("failed to write run summary {path:?}: {err}")))
    }

    pub fn render_table(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Wrote {} particles to {} | seed {} | attempts {} | acceptance {:.2}%\n",
            self.particles,
            self.output_path.display(),
            self.seed,
            self.attempts,
            self.acceptance_ratio * 100.0
        ));
        out.push_str(&format!(
            "{:<12} {:>16} {:>16} {:>16} {:>16} {:>10}\n",
            "Column", "Mean", "Std dev", "Min", "Max", "Rejects"
        ));
        out.push_str(&"-".repeat(91));
        out.push('\n');
        for (column, (_, rejects)) in self.columns.iter().zip(&self.out_of_range) {
            out.push_str(&format!(
                "{:<12} {:>16.6e} {:>16.6e} {:>16.6e} {:>16.6e} {:>10}\n",
                column.component.label(),
                column.mean,
                column.std_dev,
                column.min,
                column.max,
                rejects
            ));
        }
        out
    }
}

pub fn build_summary(
    output_path: &Path,
    seed: u64,
    truncate: f64,
    nominal_sigmas: DerivedSigmas,
    stats: &SamplerStats,
    columns: &ColumnStats,
) -> RunSummary {
    RunSummary {
        output_path: output_path.to_path_buf(),
        seed,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        particles: columns.count(),
        attempts: stats.attempts,
        rejected: stats.rejected,
        acceptance_ratio: stats.acceptance_ratio(),
        truncate,
        nominal_sigmas,
        out_of_range: Component::ALL
            .into_iter()
            .map(|component| (component, stats.out_of_range[component.index()]))
            .collect(),
        columns: columns.summaries(),
    }
}
