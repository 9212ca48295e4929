#![forbid(unsafe_code)]

mod cli;

use tracing_subscriber::EnvFilter;

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(error) = cli::run_from_env() {
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}
