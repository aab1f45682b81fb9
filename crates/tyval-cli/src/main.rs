use clap::Parser;

use tyval_cli::args::CliArgs;
use tyval_cli::driver;
use tyval_common::logging;

fn main() {
    let args = CliArgs::parse();
    logging::init(args.verbosity());

    match driver::run(args.command) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(2);
        }
    }
}
