use clap::Parser;
use tracing::info;

use beamsmear::{CliArgs, RunOptions};
use smear::TruncatedSampler;

fn main() -> shared::AppResult<()> {
    shared::init_tracing()?;

    let cli = CliArgs::parse();
    let options = RunOptions::from_cli(cli)?;

    if options.print_params {
        let sampler = TruncatedSampler::new(&options.beam)?;
        print!("{}", beamsmear::render_parameters(&options.beam, sampler.nominal()));
        return Ok(());
    }

    let summary = beamsmear::run(&options.beam)?;

    if let Some(path) = options.summary.as_ref() {
        summary.write_json(path)?;
        info!(path = ?path, "wrote run summary");
    }

    print!("{}", summary.render_table());
    Ok(())
}
