//! dyndns53 - keep Route 53 record sets pointed at the current public IP.

use clap::CommandFactory;
use dyndns53::config::{Cli, Config};
use dyndns53::detector::IpDetector;
use dyndns53::error::fatal_line;
use dyndns53::logging;
use dyndns53::providers::Route53Publisher;
use dyndns53::state::StateStore;
use dyndns53::updater::Updater;
use std::process::ExitCode;

async fn run(config: Config) -> anyhow::Result<()> {
    let detector = IpDetector::new();
    let store = StateStore::in_working_dir();
    let publisher = Route53Publisher::new();

    Updater::new(&detector, &store, &publisher)
        .run(config.record_set)
        .await?;

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if std::env::args_os().len() <= 1 {
        eprintln!("{}", Cli::command().render_help());
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse_compat(std::env::args_os());

    let config = match Config::try_from(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", fatal_line(&e));
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.log) {
        eprintln!("{}", fatal_line(&e));
        return ExitCode::FAILURE;
    }

    let log = config.log.clone();
    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let err: &(dyn std::error::Error + 'static) = e.as_ref();
            logging::report_fatal(&log, &fatal_line(err));
            ExitCode::FAILURE
        }
    }
}
