//! kiosk-setup - first-boot provisioning for single-board kiosk devices

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kiosk_setup::cli::Cli;
use kiosk_setup::output::OutputContext;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let out = OutputContext::new(cli.no_color, cli.quiet);
    if let Err(e) = cli.run(&out).await {
        out.error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
