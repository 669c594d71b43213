use clap::Parser as ClapParser;
use ffigen::driver::{Cli, GeneratorDriver};
use std::process::exit;

fn main() {
    let config = Cli::parse().into_config();
    let default_filter = if config.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let mut driver = GeneratorDriver::from_config(config);
    if let Err(e) = driver.run() {
        eprintln!("{}", e);
        exit(1);
    }
}
