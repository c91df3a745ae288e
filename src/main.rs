//! Simulator entry point: CLI wiring and config-driven series construction.

use std::path::Path;
use std::process;

use tou_sim::config::ScenarioConfig;
use tou_sim::demand::DemandProfile;
use tou_sim::io::export::export_csv;
use tou_sim::io::import::load_demand_csv;
use tou_sim::schedule::TouSchedule;
use tou_sim::sim::engine;
use tou_sim::sim::report::AnnualReport;
use tou_sim::sim::types::HourlyRecord;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    demand_path: Option<String>,
    out_path: Option<String>,
}

fn print_help() {
    eprintln!("tou-sim — hourly time-of-use battery dispatch simulator");
    eprintln!();
    eprintln!("Usage: tou-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>   Load scenario from TOML config file");
    eprintln!("  --preset <name>     Use a built-in preset (baseline, lossless, undersized)");
    eprintln!("  --seed <u64>        Override the demand profile seed");
    eprintln!("  --demand <path>     Read hourly demand (and optional periods) from CSV");
    eprintln!("  --out <path>        Export the dispatched series to CSV");
    eprintln!("  --help              Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        demand_path: None,
        out_path: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--demand" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --demand requires a path argument");
                    process::exit(1);
                }
                cli.demand_path = Some(args[i].clone());
            }
            "--out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --out requires a path argument");
                    process::exit(1);
                }
                cli.out_path = Some(args[i].clone());
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Builds the hourly input series from the scenario and optional demand CSV.
///
/// Imported demand replaces the synthetic profile; imported periods (when
/// the CSV has a `period` column) take precedence over the TOU calendar.
fn build_series(cfg: &ScenarioConfig, demand_path: Option<&str>) -> Vec<HourlyRecord> {
    let schedule = TouSchedule::from_config(&cfg.schedule);

    let (demand, imported_periods) = match demand_path {
        Some(path) => match load_demand_csv(Path::new(path)) {
            Ok(series) => (series.demand_kwh, series.periods),
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => {
            let mut profile = DemandProfile::from_config(&cfg.demand, cfg.simulation.seed);
            (profile.year(cfg.simulation.hours), None)
        }
    };

    let periods = match imported_periods {
        Some(periods) => periods,
        None => schedule.year(demand.len()),
    };

    engine::build_series(&demand, &periods)
}

fn main() {
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    // Apply seed override
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Build the series and run the engine
    let series = build_series(&scenario, cli.demand_path.as_deref());
    let params = scenario.system.to_parameters();
    let results = match engine::run(series, &params) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    // Print the annual report
    let report = AnnualReport::from_records(&results, params.storage_size);
    println!("{report}");

    // Export CSV if requested
    if let Some(ref path) = cli.out_path {
        if let Err(e) = export_csv(&results, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Results written to {path}");
    }
}
