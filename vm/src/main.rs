use std::{
    fmt::Write as _,
    fs::{read, write},
    io::{self, Write},
};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use vm::{demo, Engine, OperationTable, ProgramImage, RunReport};

mod cli;

fn render(section: &str, values: &[u64], out: &mut String) -> Result<()> {
    writeln!(out, "# {section}")?;
    for (slot, value) in values.iter().enumerate().filter(|(_, v)| **v != 0) {
        writeln!(out, "{slot} {value}")?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    if let Some(path) = &args.demo {
        let bytes: Vec<u8> = demo::multiply_image(6, 7)
            .and_then(|image| Ok(image.to_bytes()?))
            .context("failed to build the demo image")?;
        write(path, bytes)
            .with_context(|| format!("failed to write demo image '{}'", path.display()))?;
        info!("wrote demo image to '{}'", path.display());
        return Ok(());
    }

    let Some(path) = &args.program else {
        anyhow::bail!("no program image given");
    };

    let bytes: Vec<u8> = read(path)
        .with_context(|| format!("failed to read program image '{}'", path.display()))?;
    let image: ProgramImage = ProgramImage::from_bytes(&bytes)
        .with_context(|| format!("failed to decode program image '{}'", path.display()))?;
    info!(
        "loaded program image '{}': n={} q={}",
        path.display(),
        image.n,
        image.q
    );

    let mut engine: Engine = Engine::from_image(&image, OperationTable::default(), args.config())
        .context("failed to set up the engine")?;

    let report: RunReport = engine.run().context("program execution failed")?;
    info!("program halted after {} cycles", report.cycles);

    let mut out: String = String::new();
    render("registers", &engine.register_values(), &mut out)?;
    render("memory", &engine.memory_values(), &mut out)?;

    match &args.output {
        Some(path) => write(path, out)
            .with_context(|| format!("failed to write output file '{}'", path.display()))?,
        None => io::stdout()
            .write_all(out.as_bytes())
            .context("failed to write to stdout")?,
    }

    Ok(())
}
