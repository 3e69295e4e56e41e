use clap::Parser;
use tradeplot::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    tradeplot::cli::init_logging(cli.verbose);
    run(cli)
}
