use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use linkscout_common::observability::{init_logging, LogOptions};
use linkscout_common::{GenerationConfig, RecordPolicy, ScoutConfig};
use linkscout_drivers::scout_browser::driver::ScoutDriver;
use linkscout_drivers::scout_browser::hardening::HardeningProfile;
use linkscout_llm::azure::AzureChatClient;
use linkscout_search::aggregate::ResultAggregator;
use linkscout_search::duckduckgo::DuckDuckGoBrowser;
use linkscout_search::generate::QueryGenerator;
use linkscout_search::pacing::HumanPacer;
use linkscout_search::pipeline::Pipeline;
use linkscout_search::session::SearchSession;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

mod files;

/// Locate public profile links for a list of people.
#[derive(Parser, Debug)]
#[command(name = "linkscout")]
struct Cli {
    /// Input JSON file of person records.
    input: PathBuf,

    /// Output JSON file, written once at the end of the run.
    output: PathBuf,

    /// Text-generation endpoint URL.
    #[arg(long, env = "AZURE_ENDPOINT", hide_env_values = true)]
    endpoint: String,

    /// Credential sent as the api-key header.
    #[arg(long, env = "AZURE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// WebDriver service the browser session attaches to.
    #[arg(
        long,
        env = "LINKSCOUT_WEBDRIVER_URL",
        default_value = "http://localhost:9515"
    )]
    webdriver_url: String,

    /// Run the browser without a visible window.
    #[arg(long)]
    headless: bool,

    /// Maximum profile URLs collected per query.
    #[arg(long, default_value_t = 15)]
    max_results: usize,

    /// What to do with a record whose query generation fails outright.
    #[arg(long, value_enum, default_value_t = FailurePolicy::Skip)]
    on_generation_failure: FailurePolicy,

    /// Skip the automation-suppressing Chrome flags and JS evasions.
    #[arg(long)]
    plain_browser: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FailurePolicy {
    Skip,
    IncludeWithNulls,
}

impl From<FailurePolicy> for RecordPolicy {
    fn from(policy: FailurePolicy) -> Self {
        match policy {
            FailurePolicy::Skip => RecordPolicy::Skip,
            FailurePolicy::IncludeWithNulls => RecordPolicy::IncludeWithNulls,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(1);
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("linkscout: {err:#}");
            ExitCode::from(1)
        }
    }
}

#[tokio::main]
async fn run(cli: Cli) -> Result<()> {
    let config = ScoutConfig {
        generation: GenerationConfig::new(cli.endpoint, cli.api_key),
        webdriver_url: cli.webdriver_url,
        headless: cli.headless,
        max_results: cli.max_results,
        on_generation_failure: cli.on_generation_failure.into(),
    };
    config.validate()?;

    init_logging(LogOptions {
        mirror_stderr: true,
        ..LogOptions::default()
    })?;

    let records = files::read_records(&cli.input)?;
    tracing::info!(
        count = records.len(),
        input = %cli.input.display(),
        "loaded person records"
    );

    let llm = Arc::new(AzureChatClient::new(&config.generation)?);
    let generator = QueryGenerator::new(llm, config.generation.temperature);

    let profile = if cli.plain_browser {
        HardeningProfile::Minimal
    } else {
        HardeningProfile::Hardened
    };
    let driver = ScoutDriver::connect(&config.webdriver_url, config.headless, profile).await?;
    let browser = DuckDuckGoBrowser::new(driver);

    let mut pipeline = Pipeline::new(
        browser,
        HumanPacer,
        generator,
        ResultAggregator::new(SearchSession::new(config.max_results)),
        config.on_generation_failure,
    );

    let output = pipeline.run(records).await;

    // The session is released before anything that could still fail.
    if let Err(err) = pipeline.into_browser().close().await {
        tracing::warn!(error = %err, "browser session did not close cleanly");
    }

    files::write_records(&cli.output, &output)?;
    tracing::info!(
        count = output.len(),
        output = %cli.output.display(),
        "final JSON written"
    );
    Ok(())
}
