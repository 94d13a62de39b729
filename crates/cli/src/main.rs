//! autopatch command-line tool.
//!
//! Applies a unified-diff patch to a Git working tree with `git apply --3way`,
//! auto-resolves conflict regions by keeping the patch's incoming side, then
//! stages, commits, and pushes the result.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use autopatch_core::{ApplyConfig, ApplyEngine, ApplyReport};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Apply a patch to a Git repository, preferring the patch on conflicts.
#[derive(Parser, Debug)]
#[command(
    name = "autopatch",
    version,
    about = "Apply a patch to a Git repository, auto-resolving conflicts in favor of the patch"
)]
struct Cli {
    /// Path to the unified-diff patch file.
    patch: PathBuf,

    /// Path to the Git repository working tree.
    #[arg(default_value = ".")]
    repo: PathBuf,

    /// Commit message (default: "Auto-patch: <patch name> (<timestamp>)").
    #[arg(short, long)]
    message: Option<String>,

    /// Commit but do not push.
    #[arg(long)]
    no_push: bool,

    /// Report what would happen without modifying anything.
    #[arg(long)]
    dry_run: bool,

    /// Print the run report as JSON.
    #[arg(long)]
    json: bool,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Resolve to absolute paths so nothing depends on the process cwd.
    let patch_path = cli.patch.canonicalize().unwrap_or(cli.patch);
    let repo_path = cli.repo.canonicalize().unwrap_or(cli.repo);

    let config = ApplyConfig {
        message: cli.message,
        push: !cli.no_push,
        dry_run: cli.dry_run,
        ..ApplyConfig::new(patch_path, repo_path)
    };

    let engine = ApplyEngine::new(config);
    let report = engine.run().await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Report output
// ---------------------------------------------------------------------------

fn print_report(report: &ApplyReport) {
    println!("Patch apply report");
    println!("==================");
    println!();
    if report.dry_run {
        println!("  Mode           : dry run (nothing was modified)");
    }
    println!("  Patch targets  : {}", report.targets.len());
    println!(
        "  Clean 3-way    : {}",
        if report.applied_cleanly { "yes" } else { "no" }
    );
    if report.resolved.is_empty() {
        println!("  Resolved files : none");
    } else {
        println!("  Resolved files : {}", report.resolved.len());
        for path in &report.resolved {
            println!("    - {}", path);
        }
    }
    println!("  Commit message : {}", report.commit_message);
    println!("  Committed      : {}", yes_no(report.committed));
    println!("  Pushed         : {}", yes_no(report.pushed));
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
