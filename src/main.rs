use log::debug;
use std::process;

use wholebif_launcher::cli::dispatch::handle;
use wholebif_launcher::logger::setup_logger;
use wholebif_launcher::model::Config;

fn main() {
    // Verbosity comes from the config file, so it is read before logging starts
    let config_path = Config::locate();
    let loaded = match &config_path {
        Some(path) => Config::load_from_file(path),
        None => Ok(Config::default()),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    };

    setup_logger(config.logging.verbose);
    match &config_path {
        Some(path) => debug!("Loaded config from {}", path.display()),
        None => debug!("No launcher.toml found, using built-in defaults"),
    }

    let status = handle(&config, std::env::args_os().skip(1));
    process::exit(status);
}
