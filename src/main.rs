use clap::Parser;
use redsearch::cli::{self, Cli};

#[tokio::main]
async fn main() {
    redsearch::tracing::init();

    let cli = Cli::parse();

    if let Err(e) = cli::run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
