// ledctl - Steuert einen seriellen RGB LED-Controller
//
// Built-in Modi werden einmalig gesendet; Patterns laufen als
// blockierende Schleife, bis SIGINT/SIGTERM eintrifft.

use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use ledctl::cli::Cli;

/// Main Entry Point
///
/// Initialisiert Logging, parst die Argumente und führt das Kommando aus.
/// Fehler werden samt Ursachenkette als `ledctl: <fehler>: <ursache>`
/// ausgegeben, Exit-Code 1.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Default `info`, RUST_LOG hat Vorrang vor -v
    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ledctl: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    cli.execute()?;
    Ok(())
}
