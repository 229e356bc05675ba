//! `faultline` — investigation-first automated debugger.

mod cli_args;
mod commands;

use std::sync::Arc;

use clap::Parser;
use faultline_core::config::FaultlineConfig;
use faultline_core::error::FaultlineError;

use cli_args::Cli;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let exit_code = if cli.serve {
        run_server(cli.port).await
    } else {
        run_analyze(cli).await
    };

    std::process::exit(exit_code);
}

async fn run_server(port: u16) -> i32 {
    let config = FaultlineConfig::from_env();
    let state = Arc::new(faultline_server::AppState::new(config));
    if let Err(err) = faultline_server::serve(state, port).await {
        eprintln!("faultline: server error: {err}");
        return 1;
    }
    0
}

async fn run_analyze(cli: Cli) -> i32 {
    match commands::analyze::run(cli.log_file, cli.root, cli.language, cli.no_apply).await {
        Ok(()) => 0,
        Err(FaultlineError::LogEmpty) => {
            eprintln!("faultline: log is empty");
            2
        }
        Err(err) => {
            eprintln!("faultline: {err}");
            1
        }
    }
}
