use clap::Parser;
use color_eyre::eyre;

use eventcal::{commands, options::Opt};

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let args = Opt::parse();

    let _logger = flexi_logger::Logger::try_with_env_or_str(if args.verbose {
        "debug"
    } else {
        "info"
    })?
    .start()?;

    commands::run(args)
}
