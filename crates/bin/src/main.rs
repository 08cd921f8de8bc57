use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use output::OutputFormat;

fn main() {
    // Diagnostics go to stderr so command output stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CFGTREE_LOG")
                .unwrap_or_else(|_| EnvFilter::new("cfgtree=info,cfgtree_bin=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::from_json_flag(cli.json);

    let result = match &cli.command {
        Commands::Show(args) => commands::show::run(args, format),
        Commands::Get(args) => commands::get::run(args, format),
        Commands::Set(args) => commands::set::run(args, format),
        Commands::Leaves(args) => commands::leaves::run(args, format),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
