//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `carlot_core` linkage with deterministic output.
//! - Optionally open a database, seed sample cars when empty, and print the
//!   inventory.
//!
//! Configuration comes from the environment:
//! - `CARLOT_DB_PATH` (or the first argument): database file to open.
//! - `CARLOT_LOG_DIR`: absolute directory for rolling logs; logging is off
//!   when unset.
//! - `CARLOT_LOG_LEVEL`: defaults to the build-mode level.

use carlot_core::db::open_db;
use carlot_core::{
    default_log_level, init_logging, sample_cars, CarService, HandlerFailure,
    SqliteCarRepository,
};
use log::info;
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("carlot_core ping={}", carlot_core::ping());
    println!("carlot_core version={}", carlot_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var("CARLOT_LOG_DIR") {
        let level =
            std::env::var("CARLOT_LOG_LEVEL").unwrap_or_else(|_| default_log_level().to_string());
        init_logging(&level, &log_dir)?;
    }

    let Some(db_path) = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CARLOT_DB_PATH").ok())
    else {
        return Ok(());
    };

    let report = inventory_report(Path::new(&db_path))?;
    println!("cars={} seeded={}", report.lines.len(), report.seeded);
    for line in &report.lines {
        println!("{line}");
    }

    Ok(())
}

/// Seeded count plus one printable line per stored car.
#[derive(Debug)]
struct InventoryReport {
    seeded: usize,
    lines: Vec<String>,
}

fn inventory_report(db_path: &Path) -> Result<InventoryReport, Box<dyn Error>> {
    let conn = open_db(db_path)?;
    let service = CarService::new(SqliteCarRepository::try_new(&conn)?);

    let seeded = service.seed_if_empty(&sample_cars())?;
    info!("event=cli_inventory module=cli status=start seeded={seeded}");

    let cars = service.list_cars().map_err(|err| {
        let failure = HandlerFailure::from_repo_error(&err);
        format!("{:?}: {}", failure.kind, failure.message)
    })?;

    let lines = cars
        .iter()
        .map(|car| {
            format!(
                "#{} {} {} {} color={} price={:.2}",
                car.id, car.year, car.make, car.model, car.color, car.price
            )
        })
        .collect();

    Ok(InventoryReport { seeded, lines })
}
