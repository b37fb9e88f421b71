use std::env;

use hotac::cli;
use hotac::logging::{init_logging, LoggingConfig};

fn main() {
    init_logging(&LoggingConfig::from_env());
    let args: Vec<String> = env::args().collect();
    std::process::exit(cli::run_with_args(&args));
}
