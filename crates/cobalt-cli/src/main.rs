mod commands;
mod error;
mod utils;

use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};

#[derive(Parser, Debug)]
#[command(name = "cobalt")]
#[command(about = "Cobalt declaration space and member resolver", long_about = None)]
struct Args {
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Resolve declaration manifests and report diagnostics
    Check {
        /// Declaration manifests, resolved together as one program
        #[arg(value_name = "MANIFEST", required = true)]
        manifests: Vec<PathBuf>,
        /// Compiler configuration (defaults to the nearest cobalt.toml)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Print every recorded type and member
        #[arg(short, long)]
        members: bool,
    },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    match args.command {
        Command::Check { manifests, config, members } => {
            commands::check::handle_check(&manifests, config.as_deref(), members)?;
        }
    }
    Ok(())
}
