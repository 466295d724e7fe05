//! Tarball Publisher CLI
//!
//! Publishes every pre-built npm tarball under a directory

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::process;
use tarball_publisher::core::workflow::{self, RUNNER_DEBUG};
use tarball_publisher::{NpmExecutor, PublishError, PublishReport, RawInputs, TarballPublisher};
use tracing_subscriber::EnvFilter;

/// Publish pre-built npm tarballs to a registry
#[derive(Parser)]
#[command(name = "tarball-publisher")]
#[command(version)]
#[command(about = "Publish pre-built npm tarballs to a registry", long_about = None)]
struct Cli {
    /// Directory searched for *.tgz files (defaults to current directory) [env: INPUT_PATH]
    #[arg(long)]
    path: Option<String>,

    /// Registry host without scheme, e.g. registry.npmjs.org [env: INPUT_REGISTRY]
    #[arg(long)]
    registry: Option<String>,

    /// Auth token for the registry [env: INPUT_TOKEN]
    #[arg(long)]
    token: Option<String>,

    /// Access level (public|restricted) [env: INPUT_ACCESS]
    #[arg(long)]
    access: Option<String>,

    /// Only perform dry-run; enabled only by the exact value "true" [env: INPUT_DRYRUN]
    #[arg(
        long = "dry-run",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    dry_run: Option<String>,

    /// Derive --tag from prerelease versions; enabled only by the exact value "true" [env: INPUT_USETAGS]
    #[arg(
        long = "use-tags",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    use_tags: Option<String>,

    /// Credentials file (defaults to $HOME/.npmrc)
    #[arg(long, value_name = "PATH")]
    npmrc: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Flags first, then the `INPUT_*` environment
    fn inputs(&self) -> RawInputs {
        self.flags().or(RawInputs::from_env())
    }

    fn flags(&self) -> RawInputs {
        RawInputs {
            path: self.path.clone(),
            registry: self.registry.clone(),
            token: self.token.clone(),
            access: self.access.clone(),
            dry_run: self.dry_run.clone(),
            use_tags: self.use_tags.clone(),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose || workflow::is_debug(env::var(RUNNER_DEBUG).ok().as_deref()) {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("\n❌ Error");
            eprintln!("{:#}", e);
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let cwd = env::current_dir().context("Failed to get current directory")?;

    let Some(npmrc) = cli.npmrc.clone().or_else(default_npmrc_path) else {
        return Ok(report_failure(&PublishError::HomeNotSet));
    };

    let publisher = TarballPublisher::new(NpmExecutor::new(), npmrc, cwd);

    match publisher.run(&cli.inputs()).await {
        Ok(report) => {
            print_summary(&report);
            Ok(0)
        }
        Err(e) => Ok(report_failure(&e)),
    }
}

fn default_npmrc_path() -> Option<PathBuf> {
    env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(".npmrc"))
}

fn print_summary(report: &PublishReport) {
    tracing::debug!(
        "Report: {}",
        serde_json::to_string(report).unwrap_or_default()
    );

    let mode = if report.dry_run { " (dry-run)" } else { "" };
    println!(
        "\n✅ Published {} of {} tarballs{}",
        report.published.len(),
        report.candidates.len(),
        mode
    );
    for failed in &report.failed {
        println!("  ⚠️  {}: {}", failed.path.display(), failed.error);
    }
}

fn report_failure(error: &PublishError) -> i32 {
    tracing::error!(code = error.code(), "{}", error);
    println!("{}", workflow::error_command(&error.to_string()));

    if error.is_configuration_error() {
        eprintln!("\n❌ Invalid configuration: {}", error);
    } else {
        eprintln!("\n❌ Publishing failed: {}", error);
    }
    for action in error.suggested_actions() {
        eprintln!("  - {}", action);
    }

    1
}
