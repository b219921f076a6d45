use clap::Parser;
use colored::Colorize;

mod cli;

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_module("rankvault", log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn main() {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = cli::run(cli) {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}
