mod cli;

use crate::cli::CliArgs;
use anyhow::Context;
use clap::Parser;
use std::io::Write;
use zstylus::replay::{run_replay, ReplayScript};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let mut builder = env_logger::Builder::new();
    builder.filter_level(if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });
    builder.parse_default_env();
    builder.init();

    let script = ReplayScript::load(&args.script)?;
    let mut config = script.layered_config(&args.base_config()?)?;
    args.apply_overrides(&mut config);
    log::debug!("Interaction configuration: {:?}", config);

    let records = run_replay(&script, &config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for record in &records {
        let line = serde_json::to_string(record).context("failed to serialize a replay record")?;
        writeln!(out, "{}", line)?;
    }

    Ok(())
}
