//! compatcheck CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use compatcheck::cancel::CancellationToken;
use compatcheck::cli::{Cli, RunCommand};
use compatcheck::context::TerminalContext;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("compatcheck=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("compatcheck=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("compatcheck starting with args: {:?}", cli);

    let cwd = std::env::current_dir().unwrap_or_default();
    let mut ctx = TerminalContext::new(CancellationToken::new());
    if cli.json {
        ctx = ctx.with_output_on_stderr();
    }

    let run = match RunCommand::from_cli(&cli, &cwd) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    run.execute(&mut ctx);

    if cli.json {
        match serde_json::to_string_pretty(&ctx.take_telemetry()) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::error!("Failed to serialize telemetry: {}", e),
        }
    }

    ExitCode::SUCCESS
}
