use clap::Parser;
use rask_logging::app::{self, Cli};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    app::run(Cli::parse())
}
