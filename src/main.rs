//! esdomain CLI entrypoint.
//!
//! This is the main entrypoint for the esdomain command-line tool.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use esdomain::cli::{Cli, Commands, LogFormat, OutputFormat, OutputFormatter};
use esdomain::config::{find_config_file, ConfigParser, ConfigValidator, DomainParams};
use esdomain::error::Result;
use esdomain::es::{DomainApi, EsClient};
use esdomain::planner::DesiredDomain;
use esdomain::reconciler::Reconciler;

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log_format);

    // One provider call at a time; a single thread is enough
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system. Logs go to stderr.
fn init_logging(verbose: bool, format: LogFormat) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);

    match cli.command {
        Commands::Apply { yes } => cmd_apply(cli.config.as_ref(), yes, cli.output, &formatter).await,
        Commands::Plan => cmd_plan(cli.config.as_ref(), &formatter).await,
        Commands::Validate { warnings } => cmd_validate(cli.config.as_ref(), warnings, &formatter),
        Commands::Show => cmd_show(cli.config.as_ref(), &formatter).await,
    }
}

/// Validate the declaration.
fn cmd_validate(
    config_path: Option<&PathBuf>,
    show_warnings: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let (params, _) = load_params(config_path)?;

    let validator = ConfigValidator::new();
    let result = validator.validate(&params)?;

    emit(&formatter.format_validation(&params, &result, show_warnings));
    Ok(())
}

/// Show what apply would do.
async fn cmd_plan(config_path: Option<&PathBuf>, formatter: &OutputFormatter) -> Result<()> {
    let (params, desired) = load_desired(config_path)?;
    let client = create_client(&params).await?;

    let plan = Reconciler::new(&client, &desired).plan().await?;

    emit(&formatter.format_plan(&plan));
    Ok(())
}

/// Reconcile the domain.
async fn cmd_apply(
    config_path: Option<&PathBuf>,
    auto_approve: bool,
    output: OutputFormat,
    formatter: &OutputFormatter,
) -> Result<()> {
    let (params, desired) = load_desired(config_path)?;
    let client = create_client(&params).await?;
    let reconciler = Reconciler::new(&client, &desired);

    let plan = reconciler.plan().await?;

    // Confirm
    if plan.is_changing() && !auto_approve && output == OutputFormat::Text {
        eprintln!("{}", formatter.format_plan(&plan));
        eprint!("Do you want to apply this plan? [y/N]: ");
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            eprintln!("Apply cancelled.");
            return Ok(());
        }
    }

    let result = reconciler.apply(plan).await?;

    emit(&formatter.format_reconciliation(&result));
    Ok(())
}

/// Describe the domain.
async fn cmd_show(config_path: Option<&PathBuf>, formatter: &OutputFormatter) -> Result<()> {
    let (params, _) = load_params(config_path)?;
    let client = create_client(&params).await?;

    let description = client.describe_domain(&params.name).await?;

    emit(&formatter.format_domain(&description));
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Writes command output to stdout.
#[allow(clippy::print_stdout)]
fn emit(output: &str) {
    println!("{}", output.trim_end());
}

/// Resolves the configuration file path.
fn resolve_config_path(config_path: Option<&PathBuf>) -> Result<PathBuf> {
    config_path.map_or_else(|| find_config_file("."), |path| Ok(path.clone()))
}

/// Loads the declaration with `.env` and environment overrides applied.
fn load_params(config_path: Option<&PathBuf>) -> Result<(DomainParams, PathBuf)> {
    let config_file = resolve_config_path(config_path)?;
    debug!("Loading configuration from: {}", config_file.display());

    let parser = ConfigParser::new()
        .with_base_path(config_file.parent().unwrap_or_else(|| Path::new(".")));
    parser.load_dotenv()?;

    let params = parser.load_with_env(&config_file)?;
    Ok((params, config_file))
}

/// Loads and validates the declaration, then builds the desired domain.
fn load_desired(config_path: Option<&PathBuf>) -> Result<(DomainParams, DesiredDomain)> {
    let (params, config_file) = load_params(config_path)?;

    let validation = ConfigValidator::new().validate(&params)?;
    for warning in &validation.warnings {
        warn!("{}: {warning}", config_file.display());
    }

    let desired = DesiredDomain::from_params(&params)?;
    Ok((params, desired))
}

/// Creates the configuration API client.
async fn create_client(params: &DomainParams) -> Result<EsClient> {
    let client = EsClient::connect(
        params.region.as_deref(),
        params.profile.as_deref(),
        params.endpoint_url.as_deref(),
    )
    .await?;

    info!("Connected to region {}", client.region());
    Ok(client)
}
