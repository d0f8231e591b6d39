//! CLI command handling for stubwright

mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use stubwright_config::{logging, AppConfig};
use stubwright_foundation::{ErrorReport, StubError};
use stubwright_lang_java::{AugmentRequest, EditResult, FrameworkKind, LinkTarget, Session};
use tracing::{error, info};

/// The main CLI struct.
#[derive(Parser)]
#[command(name = "stubwright")]
#[command(about = "Augment generated Java test-method stubs for the configured test framework")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to stubwright.toml in the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to run.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

/// The available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Augment one test method, or every fresh stub of a file with --batch
    ///
    /// Examples:
    ///   stubwright augment CircleTest.java --method testArea --link-class Circle --link-method area
    ///   stubwright augment ShapeTest.java --batch --class-under-test com.example.Shape
    Augment {
        /// Java test file to modify
        file: PathBuf,

        /// Framework identifier (junit3, junit4, testng); overrides configuration
        #[arg(long)]
        framework: Option<String>,

        /// Project whose per-project framework setting applies
        #[arg(long)]
        project: Option<String>,

        /// Test method to augment
        #[arg(long, required_unless_present = "batch", conflicts_with = "batch")]
        method: Option<String>,

        /// Class under test the documentation links to
        #[arg(long, required_unless_present = "batch", conflicts_with = "batch")]
        link_class: Option<String>,

        /// Method under test the documentation links to
        #[arg(long, requires = "link_class")]
        link_method: Option<String>,

        /// Parameter type of the method under test (repeatable, in order)
        #[arg(long = "param", requires = "link_method")]
        params: Vec<String>,

        /// Augment every method of the primary type whose name has the prefix
        #[arg(long, requires = "class_under_test")]
        batch: bool,

        /// Class under test linked from every stub in batch mode
        #[arg(long, requires = "batch")]
        class_under_test: Option<String>,

        /// Method name prefix for batch mode (defaults to testing.prefix)
        #[arg(long, requires = "batch")]
        prefix: Option<String>,

        /// Report the outcome without writing the file
        #[arg(long)]
        dry_run: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },
}

/// Parse arguments, run the command and return the process exit code
pub fn run() -> i32 {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return 2;
        }
    };
    logging::initialize(&config);

    let format = match &cli.command {
        Commands::Augment { format, .. } => *format,
    };

    match execute(cli.command, &config) {
        Ok(()) => 0,
        Err(e) => {
            error!(error = %e, "Command failed");
            match e.downcast_ref::<StubError>() {
                Some(stub_error) => {
                    let report = ErrorReport::from(stub_error);
                    if format == OutputFormat::Json {
                        report::print_json(&report);
                    }
                    eprintln!("Error: {}", report);
                }
                None => eprintln!("Error: {:#}", e),
            }
            1
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_file(path)?,
        None => AppConfig::load()?,
    };
    Ok(config)
}

fn execute(command: Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Augment {
            file,
            framework,
            project,
            method,
            link_class,
            link_method,
            params,
            batch,
            class_under_test,
            prefix,
            dry_run,
            format,
        } => {
            let identifier = framework
                .as_deref()
                .unwrap_or_else(|| config.testing.framework_for(project.as_deref()));
            let framework = FrameworkKind::from_identifier(identifier)?;

            let request = if batch {
                let class_under_test = class_under_test
                    .context("--class-under-test is required with --batch")?;
                let prefix = prefix.unwrap_or_else(|| config.testing.prefix.clone());
                AugmentRequest::batch(prefix, class_under_test, framework)
            } else {
                let method = method.context("--method is required without --batch")?;
                let link_class = link_class.context("--link-class is required without --batch")?;
                let link = match link_method {
                    Some(link_method) => LinkTarget::method(link_class, link_method, params),
                    None => LinkTarget::class(link_class),
                };
                AugmentRequest::single(method, link, framework)
            };

            augment_file(&file, &request, dry_run, format)
        }
    }
}

fn augment_file(
    file: &Path,
    request: &AugmentRequest,
    dry_run: bool,
    format: OutputFormat,
) -> Result<()> {
    let display = file.display().to_string();
    let _span = logging::augment_span(&display).entered();

    let original = std::fs::read_to_string(file).map_err(|e| StubError::io(file, e))?;
    let result = Session::run_source(&original, request)?;

    let written = match &result {
        EditResult::Changed(changed) if !dry_run => {
            std::fs::write(file, &changed.text).map_err(|e| StubError::io(file, e))?;
            info!(file = %file.display(), "Wrote augmented file");
            true
        }
        _ => false,
    };

    match format {
        OutputFormat::Pretty => report::print_pretty(&display, &result, dry_run),
        OutputFormat::Json => report::print_json(&report::AugmentReport::new(
            &display, &result, written, dry_run,
        )),
    }
    Ok(())
}
