use clap::Parser;
use jp2_remediator_cli::{Args, Subcommands};

fn main() -> std::process::ExitCode {
    let Args {
        subcommand,
        globals,
    } = Args::parse();

    if !globals.quiet {
        let filter = match globals.verbose {
            0 => tracing::level_filters::LevelFilter::INFO,
            1 => tracing::level_filters::LevelFilter::DEBUG,
            2.. => tracing::level_filters::LevelFilter::TRACE,
        };
        let env_filter = tracing_subscriber::EnvFilter::builder()
            .with_default_directive(filter.into())
            .from_env_lossy();
        tracing_subscriber::fmt()
            .with_span_events(tracing_subscriber::fmt::format::FmtSpan::ACTIVE)
            .with_env_filter(env_filter)
            .init();
    }

    let result = match subcommand {
        Subcommands::File(args) => jp2_remediator_cli::file::handle_file(args),
        Subcommands::Dir(args) => jp2_remediator_cli::dir::handle_dir(args),
        Subcommands::Bucket(args) => jp2_remediator_cli::bucket::handle_bucket(args),
        Subcommands::Inspect(args) => jp2_remediator_cli::inspect::handle_inspect(args),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::ExitCode::FAILURE
    } else {
        std::process::ExitCode::SUCCESS
    }
}
