pub mod config;
pub mod generate;
pub mod report;

pub use config::{CliArgs, RunOptions};
pub use generate::{generate, render_parameters, run};
pub use report::{ColumnStats, RunSummary};
