use clap::Parser;
use std::path::PathBuf;

/// Completion data generator for Django projects
#[derive(Parser, Debug)]
#[command(
    name = "django-completions",
    about = "Generate editor completion data for a Django project",
    version,
    long_about = "django-completions scans a Django installation and project sources for \
                  setting names, QuerySet methods, template tags and template filters, \
                  and prints them as a grouped completion stream for editor plugins.\n\n\
                  The stream goes to stdout; logs go to stderr. The process exits 0 even \
                  when no Django installation can be found."
)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to the project's manage.py (overrides _DJANGOPLUS_MANAGEMENT)"
    )]
    pub management: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Django installation directory (overrides auto-detection)"
    )]
    pub django: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Verbose logging on stderr")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        // Verify that CLI structure is valid
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["django-completions"]);
        assert!(args.management.is_none());
        assert!(args.django.is_none());
        assert!(args.output.is_none());
        assert!(args.log_level.is_none());
        assert!(!args.verbose);
        assert!(!args.quiet);
    }

    #[test]
    fn test_all_flags() {
        let args = CliArgs::parse_from([
            "django-completions",
            "--management",
            "/proj/manage.py",
            "--django",
            "/venv/lib/python3.12/site-packages/django",
            "-o",
            "/tmp/out.txt",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.management, Some(PathBuf::from("/proj/manage.py")));
        assert_eq!(
            args.django,
            Some(PathBuf::from("/venv/lib/python3.12/site-packages/django"))
        );
        assert_eq!(args.output, Some(PathBuf::from("/tmp/out.txt")));
        assert_eq!(args.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(CliArgs::try_parse_from(["django-completions", "-v", "-q"]).is_err());
    }
}
