use clap::Parser;
use miette::Result;
use rpn_cli::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    miette::set_panic_hook();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    match args.action {
        Commands::Anchors(opts) => opts.anchors()?,
        Commands::Iou(opts) => opts.iou()?,
    }

    Ok(())
}
