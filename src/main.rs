// Copyright © 2026 Quillpost. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Quillpost CLI
//!
//! Entry point for the `quillpost` binary. Parses arguments, sets up
//! logging from the verbosity count and runs the selected command.

use std::io;

use anyhow::Context;
use log::{info, LevelFilter};
use quillpost::cli;

/// Maps `-v` occurrences to a log level. `RUST_LOG` still wins.
fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Runs the command described by the process arguments.
fn run() -> anyhow::Result<()> {
    let matches = cli::build().get_matches();

    env_logger::Builder::new()
        .filter_level(level_for(matches.get_count("verbose")))
        .parse_default_env()
        .init();
    info!("quillpost {}", cli::VERSION);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    cli::execute(&matches, &mut out)
        .context("quillpost command failed")?;
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
