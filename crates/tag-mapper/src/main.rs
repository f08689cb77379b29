// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use log::debug;
use simplelog::{Config, TermLogger, TerminalMode};
use tag_mapper::{
    config::{GeneralConfig, MapperConfig},
    mapper::execute,
};

#[derive(Parser)]
#[clap(
    name = env!("CARGO_BIN_NAME"),
    about = "Maps monitored SCADA tags to the ladder logic instructions that write them. Reads a tag list and an L5X program export and writes a table of destination, source and rung location for every monitored tag",
    rename_all = "kebab-case",
    author,
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Args {
    /// Tag list (CSV) holding the monitored tags
    #[clap(long = "tags", short = 't', required_unless_present = "print_config")]
    pub tags: Option<PathBuf>,

    /// Program export (L5X)
    #[clap(long = "program", short = 'p', required_unless_present = "print_config")]
    pub program: Option<PathBuf>,

    /// TOML configuration file
    #[clap(long = "config", short = 'c')]
    pub config: Option<PathBuf>,

    /// General options
    #[clap(flatten)]
    pub general_config: GeneralConfig,
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => MapperConfig::load(path)?,
        None => MapperConfig::default(),
    };
    args.general_config.apply(&mut config);

    if args.general_config.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    // A logger may already be installed.
    let _ = TermLogger::init(config.verbosity_level, Config::default(), TerminalMode::Stderr);
    debug!("tag-mapper CLI version: {}", env!("CARGO_PKG_VERSION"));

    let (Some(tags), Some(program)) = (&args.tags, &args.program) else {
        anyhow::bail!("both --tags and --program are required");
    };
    let summary = execute(tags, program, &config)?;
    println!(
        "Mapped {} rows into {}",
        summary.rows,
        summary.output.display()
    );
    if summary.salvage_warnings > 0 {
        println!(
            "{}",
            format!(
                "{} structural problems in the program export were repaired",
                summary.salvage_warnings
            )
            .yellow()
        );
    }
    Ok(())
}

fn main() {
    #[cfg(windows)]
    let _ = colored::control::set_virtual_terminal(true);

    if let Err(err) = run(Args::parse()) {
        let err = format!("{:?}", err);
        println!("{}", err.bold().red());
        std::process::exit(1);
    }
}
