use clap::Parser;
use std::process;

use epictask::cli;
use epictask::cli::commands::{Cli, Commands};

fn main() {
    let cli_args = Cli::parse();
    let json_output = cli_args.json;
    let root = cli_args.root.clone();
    let root = root.as_deref();

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(json_output, root),
        Commands::Status => cli::status::run(json_output, root),
        Commands::Next => cli::next::run(json_output, root),
        Commands::Parallel => cli::parallel::run(json_output, root),
        Commands::Complete { id } => cli::complete::run(&id, json_output, root),
        Commands::Block { id, reason } => cli::block::run(&id, &reason, json_output, root),
        Commands::Expand { verify } => cli::expand::run(verify, json_output, root),
        Commands::Merge { base, epics } => cli::merge::run(base, epics, json_output, root),
        Commands::Cleanup { epics } => cli::cleanup::run(epics, json_output, root),
        Commands::Sync { direction } => cli::sync::run(direction, json_output, root),
        Commands::Reboot => cli::reboot::run(json_output, root),
    };

    process::exit(exit_code);
}
