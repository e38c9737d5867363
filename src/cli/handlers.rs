//! Command handlers

use crate::cli::CliArgs;
use crate::config::Config;
use crate::fs::RealFileSystem;
use crate::pipeline;
use std::fs::File;
use std::io::{self, BufWriter};
use tracing::warn;

/// Run the completion dump.
///
/// Always returns exit code 0: the consuming editor cannot act on partial
/// failure except by getting fewer completions, so every failure mode
/// degrades to a shorter (possibly empty) stream.
pub fn handle_dump(args: &CliArgs) -> i32 {
    let config =
        Config::from_env().with_overrides(args.management.clone(), args.django.clone());
    let fs = RealFileSystem::new();

    let result = match &args.output {
        Some(path) => match File::create(path) {
            Ok(file) => pipeline::run(&fs, &config, BufWriter::new(file)),
            Err(err) => {
                warn!(file = %path.display(), %err, "cannot open output file");
                return 0;
            }
        },
        None => {
            let stdout = io::stdout();
            pipeline::run(&fs, &config, BufWriter::new(stdout.lock()))
        }
    };

    if let Err(err) = result {
        warn!("completion dump incomplete: {err:#}");
    }
    0
}
