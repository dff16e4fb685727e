use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use satwatch::anomaly::{train_model, ForestParams};
use satwatch::orbit::load_catalog;
use satwatch::report::{write_csv, PositionReport};
use satwatch::store::SatelliteRecord;
use satwatch::web::{self, Config};

#[derive(Parser)]
#[command(name = "satwatch")]
#[command(about = "Satellite tracking, decay estimation and anomaly checks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// YAML config file; defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print position and decay estimates for every satellite in a TLE file
    Inspect {
        catalog: PathBuf,
        /// Evaluate this far in the future, e.g. "90min" or "2days"
        #[arg(long)]
        ahead: Option<humantime::Duration>,
        /// Write CSV to stdout instead of a table
        #[arg(long)]
        csv: bool,
    },
    /// Add every satellite in a TLE file to the configured store
    Import {
        catalog: PathBuf,
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Train the anomaly model on synthetic orbits and write it as JSON
    TrainModel {
        #[arg(short, long, default_value = "anomaly_model.json")]
        output: PathBuf,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(config.as_deref()),
        Commands::Inspect {
            catalog,
            ahead,
            csv,
        } => inspect(&catalog, ahead, csv),
        Commands::Import { catalog, config } => import(&catalog, &config),
        Commands::TrainModel { output, seed } => train(&output, seed),
    }
}

fn read_config(path: Option<&Path>) -> Option<Config> {
    let Some(path) = path else {
        return Some(Config::default());
    };
    match Config::from_file(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Error reading config {}: {}", path.display(), e);
            None
        }
    }
}

fn serve(config_path: Option<&Path>) -> ExitCode {
    let Some(config) = read_config(config_path) else {
        return ExitCode::FAILURE;
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(web::run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn inspect(path: &Path, ahead: Option<humantime::Duration>, csv: bool) -> ExitCode {
    let entries = match load_catalog(path) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading catalog: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let at = match evaluation_time(Utc::now(), ahead) {
        Ok(at) => at,
        Err(e) => {
            eprintln!("Invalid --ahead duration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let reports: Vec<PositionReport> = entries
        .iter()
        .map(|e| PositionReport::compute(&e.name, e.norad_id, &e.line1, &e.line2, at))
        .collect();

    if csv {
        return match write_csv(&reports, std::io::stdout()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error writing CSV: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    println!("{} satellites at {}", reports.len(), at);
    for report in &reports {
        let position = match (report.latitude, report.longitude, report.altitude_km) {
            (Some(lat), Some(lon), Some(alt)) => {
                format!("{:7.2} {:8.2} {:9.2} km", lat, lon, alt)
            }
            _ => "position unavailable".to_string(),
        };
        let lifetime = report
            .lifetime_days
            .map(|l| format!("{:.2} days", l))
            .unwrap_or_else(|| "N/A".to_string());
        println!(
            "  {:>6} {:<24} {}  epoch {}  lifetime {}  {}",
            report.norad_id,
            report.name,
            position,
            report.epoch.as_deref().unwrap_or("N/A"),
            lifetime,
            report.decay_status
        );
    }
    ExitCode::SUCCESS
}

/// `now` shifted by `ahead`, or a message when the result is not representable.
fn evaluation_time(
    now: DateTime<Utc>,
    ahead: Option<humantime::Duration>,
) -> Result<DateTime<Utc>, String> {
    let Some(ahead) = ahead else {
        return Ok(now);
    };
    chrono::Duration::from_std(*ahead)
        .ok()
        .and_then(|offset| now.checked_add_signed(offset))
        .ok_or_else(|| format!("{} is out of range", ahead))
}

fn import(catalog: &Path, config_path: &Path) -> ExitCode {
    let Some(config) = read_config(Some(config_path)) else {
        return ExitCode::FAILURE;
    };
    if config.storage.base_folder.is_none() {
        eprintln!("Import needs storage.base_folder in the config");
        return ExitCode::FAILURE;
    }

    let entries = match load_catalog(catalog) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading catalog: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let store = web::server::open_store(&config);
    for entry in &entries {
        let record =
            SatelliteRecord::new(entry.name.as_str(), entry.norad_id, &entry.line1, &entry.line2);
        match store.insert(record) {
            Ok(id) => println!("  {} {} -> {}", entry.norad_id, entry.name, id),
            Err(e) => {
                eprintln!("Error storing {}: {}", entry.name, e);
                return ExitCode::FAILURE;
            }
        }
    }
    println!("Imported {} satellites", entries.len());
    ExitCode::SUCCESS
}

fn train(output: &Path, seed: u64) -> ExitCode {
    let params = ForestParams {
        seed,
        ..ForestParams::default()
    };

    let forest = match train_model(params) {
        Ok(forest) => forest,
        Err(e) => {
            eprintln!("Training failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match forest.save(output) {
        Ok(()) => {
            println!(
                "Model written to {} (threshold {:.4})",
                output.display(),
                forest.threshold()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error writing model: {}", e);
            ExitCode::FAILURE
        }
    }
}
