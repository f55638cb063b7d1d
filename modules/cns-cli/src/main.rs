//! `cns-orchestrator`: reconciling controller entrypoint (spec §6).

use std::process::ExitCode;

use cns_common::{EngineConfig, Ui};
use cns_engine::Engine;

mod cli;

use cli::ParseOutcome;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let outcome = match cli::parse(std::env::args()) {
        Ok(outcome) => outcome,
        Err(e) => {
            // No config is resolved yet at this point, so fall back on the
            // default (coloured, non-silent) Ui for the exit message.
            Ui::new(false, false, false).error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let config = match outcome {
        ParseOutcome::Print(text) => {
            println!("{text}");
            return ExitCode::SUCCESS;
        }
        ParseOutcome::Parsed(cli) => cli.into_config(),
    };

    init_tracing(&config);
    let ui = Ui::new(config.monochrome, config.silent, config.debug);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            ui.error(&format!("failed to start async runtime: {e}"));
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(&ui, config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(ui: &Ui, config: EngineConfig) -> anyhow::Result<()> {
    config.log_redacted();

    ui.info(&format!("connecting to {}:{}", config.host, config.port));
    let engine =
        Engine::connect(&config.host, config.port, &config.username, &config.password).await?;
    ui.info("cache loaded, watching for changes");

    engine.run().await
}

fn init_tracing(config: &EngineConfig) {
    use tracing_subscriber::EnvFilter;

    let default_level = if config.silent {
        "error"
    } else if config.debug {
        "debug"
    } else {
        "info"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(!config.monochrome)
        .init();
}
