//! dev-lxc - Per-project LXD developer containers

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dev_lxc::cli::Cli;
use dev_lxc::domain::InstanceError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e
                .downcast_ref::<InstanceError>()
                .map_or(1, InstanceError::exit_code);
            ExitCode::from(code)
        }
    }
}

/// Log to stderr, filtered by `DEV_LXC_LOG` or else by `-v` count.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("DEV_LXC_LOG").unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}
