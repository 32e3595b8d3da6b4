use clap::{value_parser, Arg, ArgMatches, Command};
use log::info;
use spot_input::{
    config::{read_config, read_config_as, SpotInputConfig},
    cube::{CubeList, TimeFilter},
    spotdata::{get_additional_diagnostics, get_method_prerequisites_at, Resolved},
};
use std::path::{Path, PathBuf};

fn main() {
    env_logger::init();

    let matches = build_cli().get_matches();

    let result = match matches.subcommand() {
        Some(("prerequisites", sub_matches)) => run_prerequisites(sub_matches),
        Some(("find", sub_matches)) => run_find(sub_matches),
        Some(("config", sub_matches)) => run_config(sub_matches),
        Some(("run", sub_matches)) => run_from_config(sub_matches),
        _ => Err("Please specify a subcommand. Use --help for more information.".to_string()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn required<'a, T: Clone + Send + Sync + 'static>(matches: &'a ArgMatches, name: &str) -> Result<&'a T, String> {
    matches
        .get_one::<T>(name)
        .ok_or_else(|| format!("Missing required argument --{}", name))
}

fn parse_time(time: Option<&String>) -> Result<Option<TimeFilter>, String> {
    time.map(|t| t.parse::<TimeFilter>().map_err(|e| e.to_string()))
        .transpose()
}

fn print_cubes(label: &str, cubes: &CubeList) {
    println!("{}: {} cube(s)", label, cubes.len());
    for cube in cubes {
        println!("  {} [{}]", cube, cube.source.display());
    }
}

fn resolve_and_print(method: &str, data_dir: &Path, time: Option<&TimeFilter>) -> Result<(), String> {
    info!("Resolving prerequisites for {} in {}", method, data_dir.display());

    match get_method_prerequisites_at(method, data_dir, time).map_err(|e| e.to_string())? {
        Resolved::NoPrerequisites => println!("Method {} has no prerequisite diagnostics", method),
        Resolved::Loaded(diagnostics) => {
            for (name, cubes) in &diagnostics {
                match time {
                    Some(time) => print_cubes(&format!("{} at {}", name, time), cubes),
                    None => print_cubes(name, cubes),
                }
            }
        }
    }

    Ok(())
}

fn run_prerequisites(matches: &ArgMatches) -> Result<(), String> {
    let method = required::<String>(matches, "method")?;
    let data_dir = required::<PathBuf>(matches, "data-dir")?;
    resolve_and_print(method, data_dir, None)
}

fn run_find(matches: &ArgMatches) -> Result<(), String> {
    let diagnostic = required::<String>(matches, "diagnostic")?;
    let data_dir = required::<PathBuf>(matches, "data-dir")?;
    let time = parse_time(matches.get_one::<String>("time"))?;

    let cubes = get_additional_diagnostics(diagnostic, data_dir, time.as_ref()).map_err(|e| e.to_string())?;
    print_cubes(diagnostic, &cubes);
    Ok(())
}

fn run_config(matches: &ArgMatches) -> Result<(), String> {
    let path = required::<PathBuf>(matches, "path")?;
    let config = read_config(path).map_err(|e| e.to_string())?;
    let pretty = serde_json::to_string_pretty(&config).map_err(|e| e.to_string())?;
    println!("{}", pretty);
    Ok(())
}

fn run_from_config(matches: &ArgMatches) -> Result<(), String> {
    let path = required::<PathBuf>(matches, "config")?;
    let config: SpotInputConfig = read_config_as(path).map_err(|e| e.to_string())?;

    // A configured time narrows each prerequisite to that validity time
    let time = parse_time(config.time.as_ref())?;
    resolve_and_print(&config.method, &config.diagnostic_data_path, time.as_ref())
}

fn data_dir_arg() -> Arg {
    Arg::new("data-dir")
        .short('d')
        .long("data-dir")
        .value_name("DIR")
        .help("Root directory holding diagnostic data files")
        .value_parser(value_parser!(PathBuf))
        .required(true)
}

fn build_cli() -> Command {
    Command::new("spot_input")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Locate and load the diagnostics needed for spot data extraction")
        .subcommand_required(true)
        .subcommand(
            Command::new("prerequisites")
                .about("Load every diagnostic an extraction method requires")
                .arg(
                    Arg::new("method")
                        .short('m')
                        .long("method")
                        .value_name("METHOD")
                        .help("Extraction method, e.g. model_level_temperature_lapse_rate")
                        .required(true),
                )
                .arg(data_dir_arg()),
        )
        .subcommand(
            Command::new("find")
                .about("Find and load a single diagnostic")
                .arg(
                    Arg::new("diagnostic")
                        .short('n')
                        .long("diagnostic")
                        .value_name("NAME")
                        .help("Diagnostic name, matched against file names")
                        .required(true),
                )
                .arg(data_dir_arg())
                .arg(
                    Arg::new("time")
                        .short('t')
                        .long("time")
                        .value_name("DATETIME")
                        .help("Only keep data valid at this time (YYYY-MM-DD HH:MM:SS)"),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Read and print a JSON configuration file")
                .arg(
                    Arg::new("path")
                        .short('p')
                        .long("path")
                        .value_name("FILE")
                        .help("Configuration file")
                        .value_parser(value_parser!(PathBuf))
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("run")
                .about("Resolve prerequisites described by a JSON configuration file")
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("FILE")
                        .help("Configuration with method, diagnostic_data_path and optional time")
                        .value_parser(value_parser!(PathBuf))
                        .required(true),
                ),
        )
}
