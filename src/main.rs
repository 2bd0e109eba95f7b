use catseq::cli::{self, Commands};
use catseq::commands::{self, filter::FilterBounds, RunContext};
use catseq::config::Config;
use clap::Parser;
use log::LevelFilter;

fn main() {
    let args = cli::Args::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: cli::Args) -> anyhow::Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let ctx = RunContext::new(&args, &config);

    match args.command {
        Commands::Info {
            input,
            summary,
            nxx,
            json,
        } => commands::info::run(&ctx, &input, summary, nxx, json),
        Commands::Filter {
            input,
            length_min,
            length_max,
            error_rate_avg_min,
            error_rate_avg_max,
            qual_avg_min,
            qual_avg_max,
            output,
        } => {
            let bounds = FilterBounds {
                length_min,
                length_max,
                error_rate_avg_min,
                error_rate_avg_max,
                qual_avg_min,
                qual_avg_max,
            };
            commands::filter::run(&ctx, &input, bounds, output)
        }
        Commands::Grep {
            pattern,
            input,
            field,
            invert_match,
            ignore_case,
            output,
        } => commands::grep::run(&ctx, &input, &pattern, field, invert_match, ignore_case, output),
    }
}
