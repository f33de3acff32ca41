use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trest::cli::Cli;
use trest::http::ReqwestTransport;
use trest::report::{ConsoleReporter, JUnitReporter, MultiReporter};
use trest::{SuiteLoader, SuiteRunner};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let config = cli.run_config();
    let suites = SuiteLoader::new(&config.suite_root)?.load()?;

    let transport = ReqwestTransport::new(config.timeout_ms)?;
    let runner = SuiteRunner::new(config, Box::new(transport));

    let mut reporter = MultiReporter::default();
    reporter.push(Box::new(ConsoleReporter::new()));
    if !cli.no_junit {
        reporter.push(Box::new(JUnitReporter::new(&cli.report_dir)));
    }

    let summary = runner.run(&suites, &mut reporter).await?;
    info!(
        total = summary.total(),
        passed = summary.passed,
        failed = summary.failed,
        skipped_cases = summary.skipped_cases,
        "run finished"
    );
    Ok(summary.success())
}
