use django_completions::cli::{handle_dump, CliArgs};
use django_completions::util::logging::{init_logging, LoggingConfig};
use django_completions::VERSION;

use clap::Parser;
use tracing::debug;

fn main() {
    let args = CliArgs::parse();
    init_logging(LoggingConfig::from_args(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
    ));

    debug!("django-completions v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = handle_dump(&args);
    std::process::exit(exit_code);
}
