//! tfsync - Terraform dependency version reconciler
//!
//! Keeps the versions declared for:
//! - Terraform itself (`required_version`)
//! - Providers (`required_providers`)
//! - Registry and Git modules
//!
//! at the latest version allowed by the constraint comment next to them.

use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;
use tfsync::cli::{CliArgs, Command, GetArgs, ListArgs, RunArgs, SetArgs};
use tfsync::config::Config;
use tfsync::confirm::confirm_apply;
use tfsync::orchestrator::{Orchestrator, OrchestratorConfig};
use tfsync::output::create_formatter;
use tfsync::registry::{RegistrySet, VersionSource};
use tfsync::terraform::{detect_terraform_files, scan_files, DependencyIndex};
use tfsync::update::{get_attribute, set_attribute};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    init_logging(args.verbose, args.quiet);

    if args.no_color {
        colored::control::set_override(false);
    }

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout carries only the report
fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let level = match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            EnvFilter::new(format!("warn,tfsync={}", level))
        })
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with(filter)
        .init();
}

async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let config = Config::resolve(args.config.as_deref(), args.path())?;
    let pattern = args
        .scan()
        .pattern
        .clone()
        .unwrap_or_else(|| config.pattern().to_string());

    let env_token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
    let retrieval = config.retrieval_config(env_token);

    tracing::debug!(
        path = %args.path().display(),
        pattern = %pattern,
        registry = %retrieval.registry_url,
        github_token = retrieval.github_token.is_some(),
        "Starting"
    );

    match &args.command {
        Command::Plan(run_args) | Command::Apply(run_args) => {
            let source = RegistrySet::new(&retrieval)?;
            run_reconcile(&args, run_args, pattern, Box::new(source)).await
        }
        Command::Get(get_args) => {
            let source = RegistrySet::new(&retrieval)?;
            run_get(&args, get_args, &pattern, &source).await
        }
        Command::List(list_args) => run_list(&args, list_args, &pattern),
        Command::Set(set_args) => run_set(&args, set_args, &pattern),
    }
}

async fn run_reconcile(
    args: &CliArgs,
    run_args: &RunArgs,
    pattern: String,
    source: Box<dyn VersionSource>,
) -> anyhow::Result<ExitCode> {
    if !args.auto_approve() && io::stdin().is_terminal() {
        let approved =
            confirm_apply(&mut io::stdin().lock(), &mut io::stderr(), &run_args.path)?;
        if !approved {
            eprintln!("Apply cancelled.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    let config = OrchestratorConfig::new(run_args.path.clone())
        .with_pattern(pattern)
        .with_apply(args.is_apply())
        .with_filter(run_args.filter()?)
        .with_progress(args.show_progress());

    let result = Orchestrator::new(config, source).run().await?;

    let formatter = create_formatter(args.output_config());
    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    if result.has_errors() {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn load_index(path: &Path, pattern: &str) -> anyhow::Result<DependencyIndex> {
    let files = detect_terraform_files(path, pattern)?;
    Ok(scan_files(&files)?)
}

async fn run_get(
    args: &CliArgs,
    get_args: &GetArgs,
    pattern: &str,
    source: &RegistrySet,
) -> anyhow::Result<ExitCode> {
    let index = load_index(&get_args.path, pattern)?;
    let value = get_attribute(
        &index,
        source,
        get_args.kind,
        &get_args.name,
        get_args.attribute,
        &get_args.options(),
    )
    .await?;

    let mut stdout = io::stdout().lock();
    if args.json {
        let output = serde_json::json!({
            "target": get_args.kind,
            "name": get_args.name,
            "attribute": get_args.attribute.as_str(),
            "value": value,
        });
        writeln!(stdout, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        writeln!(stdout, "{}", value)?;
    }
    stdout.flush()?;

    Ok(ExitCode::SUCCESS)
}

fn run_list(args: &CliArgs, list_args: &ListArgs, pattern: &str) -> anyhow::Result<ExitCode> {
    let index = load_index(&list_args.path, pattern)?;
    let records: Vec<_> = index.by_target(list_args.kind).collect();

    let mut stdout = io::stdout().lock();
    if args.json {
        let output: Vec<_> = records
            .iter()
            .map(|record| {
                serde_json::json!({
                    "target": list_args.kind,
                    "name": record.name,
                    "kind": record.kind,
                    "source": record.source,
                    "version": record.version,
                    "constraint": record.constraint,
                    "file": record.file_path.display().to_string(),
                })
            })
            .collect();
        writeln!(stdout, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        for record in &records {
            writeln!(stdout, "{}", record.name)?;
        }
    }
    stdout.flush()?;

    Ok(ExitCode::SUCCESS)
}

fn run_set(args: &CliArgs, set_args: &SetArgs, pattern: &str) -> anyhow::Result<ExitCode> {
    let index = load_index(&set_args.path, pattern)?;
    let outcome = set_attribute(
        &index,
        set_args.kind,
        &set_args.name,
        set_args.attribute,
        &set_args.value,
        &set_args.options(),
    )?;

    let formatter = create_formatter(args.output_config());
    let mut stdout = io::stdout().lock();
    formatter.format_set(&outcome, &mut stdout)?;
    stdout.flush()?;

    Ok(ExitCode::SUCCESS)
}
