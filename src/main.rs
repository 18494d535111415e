use anyhow::Result;
use clap::Parser;

use meridian_route::cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    Cli::parse().run()
}
