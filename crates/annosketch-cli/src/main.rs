//! `gt` entry point.

use std::{env, process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use annosketch_cli::{Cli, error_adapter::to_reportables, normalize_args};

fn main() {
    miette::set_panic_hook();

    let cli = Cli::parse_from(normalize_args(env::args_os()));

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting gt");
    debug!(cli:?; "Parsed arguments");

    if let Err(err) = annosketch_cli::run(&cli) {
        let reporter = miette::GraphicalReportHandler::new();

        for reportable in to_reportables(&err) {
            let mut writer = String::new();
            reporter
                .render_report(&mut writer, &reportable)
                .expect("Writing to String buffer is infallible");

            error!("{writer}");
        }

        process::exit(1);
    }

    info!("Completed successfully");
}
