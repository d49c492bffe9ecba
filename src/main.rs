use clap::{Arg, ArgAction, ArgMatches, Command};
use navalcalc::engine::FiringSolutionEngine;
use navalcalc::logging::{init_logging, parse_log_level, LogConfig, LogOutput};
use navalcalc::mission::{CalibrationConfig, MissionConfig, MissionFile, MissionOutcome, PolarConfig, WindConfig};
use navalcalc::models::{FiringSolution, ShipClass, WindVector};
use tracing::debug;

fn main() {
    let matches = build_cli().get_matches();

    if let Err(e) = setup_logging(&matches) {
        eprintln!("error: failed to initialise logging: {}", e);
        std::process::exit(1);
    }

    let result = match matches.subcommand() {
        Some(("solve", sub)) => run_solve(sub),
        Some(("wind", sub)) => run_wind(sub),
        Some(("mission", sub)) => run_mission_file(sub),
        _ => {
            show_default_help();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn build_cli() -> Command {
    Command::new("navalcalc")
        .version("0.1.0")
        .about("Naval artillery calculator")
        .long_about("Computes per-gun firing azimuth and distance for frigate and battleship\n\
                     batteries, and derives wind correction from a calibration shot.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Log verbosity (-v: info, -vv: debug, -vvv: trace)")
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .global(true)
                .help("Log level (trace, debug, info, warn, error); overrides -v")
        )
        .arg(
            Arg::new("log-output")
                .long("log-output")
                .value_name("TARGET")
                .global(true)
                .default_value("console")
                .help("Log output: console, file, both")
        )
        .arg(
            Arg::new("log-dir")
                .long("log-dir")
                .value_name("DIR")
                .global(true)
                .default_value("logs")
                .help("Directory for log files")
        )
        .subcommand(
            with_fire_mission_args(Command::new("solve").about("Compute firing solutions for every gun"))
                .arg(number_arg("wind-azimuth", "Wind azimuth in degrees").default_value("0"))
                .arg(number_arg("wind-strength", "Wind strength").default_value("0"))
        )
        .subcommand(
            with_fire_mission_args(Command::new("wind").about("Derive wind from a calibration shot of the second gun"))
                .arg(number_arg("explosion-azimuth", "Azimuth from ship center to the explosion").required(true))
                .arg(number_arg("explosion-distance", "Distance from ship center to the explosion").required(true))
                .arg(
                    Arg::new("transfer")
                        .long("transfer")
                        .action(ArgAction::SetTrue)
                        .help("Also compute firing solutions with the derived wind")
                )
        )
        .subcommand(
            Command::new("mission")
                .about("Run a YAML fire mission file")
                .arg(
                    Arg::new("file")
                        .short('f')
                        .long("file")
                        .value_name("FILE")
                        .required(true)
                        .help("Fire mission file (.yaml)")
                )
                .arg(
                    Arg::new("info")
                        .short('i')
                        .long("info")
                        .action(ArgAction::SetTrue)
                        .help("Only print the mission summary")
                )
        )
}

fn number_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("NUM")
        .allow_negative_numbers(true)
        .value_parser(clap::value_parser!(f64))
        .help(help)
}

fn with_fire_mission_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("ship")
                .short('s')
                .long("ship")
                .value_name("CLASS")
                .required(true)
                .help("Ship class: frigate, battleship")
        )
        .arg(number_arg("heading", "Ship heading in degrees").required(true))
        .arg(number_arg("commander-azimuth", "Commander azimuth to the target").required(true))
        .arg(number_arg("commander-distance", "Commander distance to the target").required(true))
}

fn setup_logging(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let verbose_level = matches.get_count("verbose");
    let level = match matches.get_one::<String>("log-level") {
        Some(level) => parse_log_level(level),
        None => LogConfig::level_from_verbosity(verbose_level),
    };

    let mut config = LogConfig {
        level,
        ..LogConfig::default()
    };
    if let Some(output) = matches.get_one::<String>("log-output") {
        config.output = output.parse::<LogOutput>()?;
    }
    if let Some(dir) = matches.get_one::<String>("log-dir") {
        config.log_dir = dir.clone();
    }

    init_logging(config)
}

/// コマンドライン引数からミッション設定を組み立て
fn mission_from_args(matches: &ArgMatches) -> Result<MissionConfig, Box<dyn std::error::Error>> {
    let ship = matches
        .get_one::<String>("ship")
        .map(String::as_str)
        .unwrap_or_default()
        .parse::<ShipClass>()?;

    let number = |name: &str| matches.get_one::<f64>(name).copied().unwrap_or_default();

    let wind = matches
        .try_get_one::<f64>("wind-azimuth")
        .ok()
        .flatten()
        .map(|_| WindConfig {
            azimuth_deg: number("wind-azimuth"),
            strength_m: number("wind-strength"),
        });

    let calibration = matches
        .try_get_one::<f64>("explosion-azimuth")
        .ok()
        .flatten()
        .map(|_| CalibrationConfig {
            explosion: PolarConfig {
                azimuth_deg: number("explosion-azimuth"),
                distance_m: number("explosion-distance"),
            },
            transfer_wind: matches.try_get_one::<bool>("transfer").ok().flatten().copied().unwrap_or(false),
        });

    let mission = MissionConfig {
        id: "cli".to_string(),
        ship,
        heading_deg: number("heading"),
        commander: PolarConfig {
            azimuth_deg: number("commander-azimuth"),
            distance_m: number("commander-distance"),
        },
        wind,
        calibration,
    };
    mission.validate()?;

    debug!("コマンドライン入力: {:?}", mission);
    Ok(mission)
}

fn run_solve(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let mission = mission_from_args(matches)?;
    let engine = FiringSolutionEngine::for_ship(mission.ship);
    let outcome = mission.execute(&engine);

    print_solutions(&outcome.solutions);
    Ok(())
}

fn run_wind(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let mission = mission_from_args(matches)?;
    let engine = FiringSolutionEngine::for_ship(mission.ship);
    let outcome = mission.execute(&engine);

    if let Some(wind) = outcome.calibrated_wind {
        print_wind(&wind);
    }
    if mission.calibration.is_some_and(|c| c.transfer_wind) {
        println!();
        print_solutions(&outcome.solutions);
    }
    Ok(())
}

fn run_mission_file(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let path = matches
        .get_one::<String>("file")
        .ok_or("mission file is required")?;
    let file = MissionFile::from_file(path)?;

    if matches.get_flag("info") {
        file.print_summary();
        return Ok(());
    }

    for outcome in file.execute_all() {
        print_outcome(&outcome);
        println!();
    }
    Ok(())
}

fn print_outcome(outcome: &MissionOutcome) {
    println!("=== {} ({}) ===", outcome.id, outcome.ship);
    if let Some(wind) = &outcome.calibrated_wind {
        print_wind(wind);
    }
    println!(
        "Wind used: {:.1}°, {}",
        outcome.wind_used.azimuth_deg, outcome.wind_used.strength
    );
    print_solutions(&outcome.solutions);
}

fn print_solutions(solutions: &[FiringSolution]) {
    for solution in solutions {
        println!("{}", solution);
    }
}

fn print_wind(wind: &WindVector) {
    println!("Wind Azimuth: {:.1}°, Wind Strength: {}", wind.azimuth_deg, wind.strength);
}

fn show_default_help() {
    println!("Usage:");
    println!("  navalcalc <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  solve    Compute firing solutions for every gun");
    println!("  wind     Derive wind from a calibration shot of the second gun");
    println!("  mission  Run a YAML fire mission file");
    println!();
    println!("Examples:");
    println!("  navalcalc solve --ship frigate --heading 0 --commander-azimuth 90 --commander-distance 300");
    println!("  navalcalc solve -s battleship --heading 45 --commander-azimuth 10 --commander-distance 250 \\");
    println!("      --wind-azimuth 120 --wind-strength 20");
    println!("  navalcalc wind -s frigate --heading 0 --commander-azimuth 0 --commander-distance 100 \\");
    println!("      --explosion-azimuth 20.5 --explosion-distance 85.6 --transfer");
    println!("  navalcalc mission -f missions/sample.yaml -v");
}
