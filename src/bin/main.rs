#[macro_use]
extern crate log;

use clap::{CommandFactory, Parser};
use mysql_structgen::{Config, Error};
use std::{env, path::PathBuf, process};

#[derive(Parser)]
#[command(version, about = "Generate Go structs from the information schema of a MySQL database")]
struct Opts {
    /// JSON configuration file,
    /// connection settings in it are overridden by the environment variables listed below
    #[arg(long = "json", value_name = "JSON file")]
    json: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Parse the program options
    let opts = Opts::parse();

    if let Err(error) = try_main(opts) {
        debug!("{:?}", error);
        eprintln!("error: {}", error);
        process::exit(1);
    }
}

fn try_main(opts: Opts) -> Result<(), Error> {
    // Read the configuration
    let config = Config::load(opts.json.as_deref(), |name| env::var(name).ok())?;
    if !config.has_host() {
        return usage(&config);
    }

    // Run the transformation
    let code = mysql_structgen::run(&config)?;

    // Write the result
    mysql_structgen::write_output(&config, &code)
}

fn usage(config: &Config) -> Result<(), Error> {
    let names = config.kind().unwrap_or_default().env_names();
    let stdout_error = |e: std::io::Error| Error::Write("stdout".to_string(), e);

    Opts::command().print_help().map_err(stdout_error)?;
    println!("\n  or use these environmental variables.");
    for name in names.all().iter() {
        println!("{}", name);
    }
    Ok(())
}
