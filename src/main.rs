//! Solar car energy simulator entry point.

use std::process;

use clap::{CommandFactory, Parser, error::ErrorKind};
use tracing::error;

use vehicle_sim::cli::{Cli, USAGE_ERROR, USAGE_EXIT_CODE};
use vehicle_sim::error::Result;
use vehicle_sim::io::export::export_csv;
use vehicle_sim::io::weather::WeatherTable;
use vehicle_sim::logging::setup_logging;
use vehicle_sim::runner::run_scenario;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                // stdout may already be closed; nothing useful to do about it.
                let _ = e.print();
                process::exit(0);
            }
            ErrorKind::MissingRequiredArgument => {
                eprintln!("{USAGE_ERROR}");
                eprintln!("{}", Cli::command().render_usage());
                process::exit(USAGE_EXIT_CODE);
            }
            _ => {
                let _ = e.print();
                process::exit(USAGE_EXIT_CODE);
            }
        },
    };

    if let Err(e) = setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        eprintln!("error: {e}");
        process::exit(1);
    }

    if let Err(e) = run(&cli) {
        error!("{e}");
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let scenario = cli.load_scenario()?;
    let weather = cli
        .weather
        .as_deref()
        .map(WeatherTable::from_csv_path)
        .transpose()?;

    #[cfg(feature = "tui")]
    if cli.tui {
        return vehicle_sim::tui::run(scenario, weather);
    }

    if cli.print_params {
        print!("{}", scenario.params);
        println!("====================");
    }

    let output = run_scenario(&scenario, weather)?;

    for r in &output.records {
        println!("{}", r.with_columns(&output.columns));
    }
    if cli.print_params {
        println!("====================");
        print!("{}", output.params);
    }
    println!("\n{}", output.summary);

    if let Some(path) = &cli.telemetry_out {
        export_csv(&output.records, &output.columns, path)?;
        eprintln!("Telemetry written to {}", path.display());
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(vehicle_sim::api::AppState::from(output));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(vehicle_sim::api::serve(state, addr))?;
    }

    Ok(())
}
