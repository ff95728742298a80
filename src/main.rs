use std::process::ExitCode;

use clap::{ArgAction, Parser};
use pandoc_defaults::cli::{self, DefaultsArgs};
use pandoc_defaults::logging;

/// Generate a pandoc defaults file from layered settings and frontmatter.
#[derive(Debug, Parser)]
#[command(name = "pandoc-defaults", version, about)]
struct Cli {
    #[command(flatten)]
    args: DefaultsArgs,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    match cli::execute(&cli.args.into_request()) {
        Ok(rendered) => {
            print!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
