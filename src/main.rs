use clap::Parser;
use tracing_subscriber::EnvFilter;

use variant_cooccurrence::{cli, web};

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("variant_cooccurrence=debug,info")
    } else {
        EnvFilter::new("variant_cooccurrence=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Compute(args) => {
            cli::compute::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Normalize(args) => {
            cli::normalize::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Datasets(args) => {
            cli::datasets::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Serve(args) => {
            web::server::run(args)?;
        }
    }

    Ok(())
}
