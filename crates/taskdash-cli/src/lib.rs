pub mod cli;
pub mod commands;
pub mod config;
pub mod render;

use std::ffi::OsString;
use std::io::{self, IsTerminal};

use anyhow::Context;
use clap::Parser;
use taskdash_core::http::HttpTaskService;
use tracing::{debug, info};

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        "starting taskdash CLI"
    );

    let mut cfg = config::Config::load(cli.config.as_deref())?;
    cfg.apply_overrides(
        cli.rc_overrides
            .into_iter()
            .map(|kv| (kv.key, kv.value))
            .chain(cli.api.map(|url| ("api.url".to_string(), url))),
    );
    debug!(files = ?cfg.loaded_files, "configuration resolved");

    let api_url = cfg.api_url();
    let service = HttpTaskService::new(&api_url)
        .with_context(|| format!("failed to configure task service at {api_url}"))?;
    let default_sort = cfg.default_sort()?;

    let stdout = io::stdout();
    let tty = stdout.is_terminal();
    let mut renderer = render::Renderer::new(&cfg, stdout.lock(), tty)?;

    let command = cli
        .command
        .unwrap_or(cli::Command::List { sort: None });

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(commands::dispatch(
        command,
        &service,
        &mut renderer,
        default_sort,
        chrono::Utc::now(),
    ))
}
