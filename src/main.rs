mod cli;
mod config;
mod error;
mod github;
mod orchestrator;
mod output;
mod summarize;

use clap::Parser;
use cli::{Cli, OutputFormat};
use config::load_settings;
use error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use orchestrator::Orchestrator;
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(0) => {}
        Ok(failed) => {
            eprintln!("{} repo(s) failed to summarize", failed);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Drive the whole pipeline; returns the number of repos that failed
async fn run(cli: &Cli) -> Result<usize> {
    let settings = load_settings(cli.config.as_deref(), &cli.overrides())?;
    let orchestrator = Orchestrator::new(settings)?;

    let repos = orchestrator.list_repos(&cli.username).await?;
    tracing::info!(count = repos.len(), user = %cli.username, "repositories fetched");

    let readme_mode = cli.readme_mode();
    let progress = ProgressBar::new(repos.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    // One repo at a time; a failure skips that repo, not the batch
    let mut items = Vec::with_capacity(repos.len());
    let mut failed = 0usize;
    for repo in &repos {
        progress.set_message(format!("Summarizing {}", repo.name));
        match orchestrator
            .summarize_repo(&cli.username, repo, cli.full, readme_mode)
            .await
        {
            Ok(item) => items.push(item),
            Err(e) => {
                tracing::warn!(repo = %repo.name, error = %e, "skipping repo");
                eprintln!("warning: {}: {}", repo.name, e);
                failed += 1;
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    let payload = match cli.format {
        OutputFormat::Json => output::to_json(&items)?,
        OutputFormat::Md => output::to_markdown(&items),
    };

    match &cli.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &payload)?;
            println!("wrote {} ({} repos)", path.display(), items.len());
        }
        None => println!("{}", payload),
    }

    Ok(failed)
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "ghsum=warn",
        1 => "ghsum=info",
        2 => "ghsum=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
