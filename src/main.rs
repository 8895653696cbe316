//! ezio-gen - build driver for the ezio networking library
//!
//! ## Architecture
//!
//! ```text
//! CLI → build/<BuildType>/ → cmake -G Ninja → cmake --build
//! ```

mod build;
mod cli;
mod config;
mod error;
mod exec;
mod utils;

use error::GenError;
use utils::terminal::print_error;

fn main() {
    let result = cli::parse_options(std::env::args_os())
        .map_err(anyhow::Error::from)
        .and_then(cli::Cli::execute);

    if let Err(err) = result {
        match err.downcast_ref::<GenError>() {
            Some(gen_err) => {
                gen_err.display_with_hints();
                std::process::exit(gen_err.exit_code());
            }
            None => {
                print_error(&format!("{:#}", err));
                std::process::exit(1);
            }
        }
    }
}
