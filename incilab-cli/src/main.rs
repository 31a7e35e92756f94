mod app;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use incilab_core::transport::{Backend, HttpBackend};
use incilab_core::{
    Config, ExpansionTracker, HealthMonitor, ProgressNarrator, SearchSession, ValidateStart,
    ValidationSession,
};
use incilab_core::view;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "incilab")]
#[command(about = "Ingredient search and formulation compliance client", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Search the ingredient database")]
    Search {
        query: String,
    },

    #[command(about = "Check a formulation against the compliance backend")]
    Validate {
        #[arg(short, long, default_value = "")]
        name: String,

        #[arg(help = "Ingredient mapping as JSON, e.g. '{\"Aqua\": \"40%\"}'")]
        ingredients: String,
    },

    #[command(about = "Probe backend liveness")]
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        Config::load(&cli.config).context("Failed to load config")?
    } else {
        Config::default()
    };

    let base_url = config.backend_url();
    let backend = match config.backend.request_timeout_secs {
        Some(secs) => HttpBackend::with_timeout(base_url.clone(), Duration::from_secs(secs))
            .context("Failed to build HTTP client")?,
        None => HttpBackend::new(base_url.clone()),
    };

    match cli.command {
        Some(Commands::Search { query }) => run_search(&backend, &query).await,
        Some(Commands::Validate { name, ingredients }) => {
            run_validate(&backend, &name, &ingredients).await
        }
        Some(Commands::Health) => run_health(&backend).await,
        None => app::run(Arc::new(backend), base_url).await,
    }
}

async fn run_search(backend: &HttpBackend, query: &str) -> Result<()> {
    let mut health = HealthMonitor::new();
    health.probe(backend).await;

    let mut session = SearchSession::new();
    session.set_query(query);
    let Some(ticket) = session.begin() else {
        println!("Nothing to search for.");
        return Ok(());
    };
    let outcome = backend.search(query).await;
    session.complete(ticket, outcome);

    // One-shot output expands every row so the detail fields print.
    let mut expansion = ExpansionTracker::new();
    for item in session.results() {
        if !expansion.is_expanded(&item.source_id) {
            expansion.toggle(&item.source_id);
        }
    }

    render::print_document(&view::compose(
        &session,
        &expansion,
        &ValidationSession::new(),
        &ProgressNarrator::new(),
        health.is_up(),
        backend.base_url(),
    ));
    Ok(())
}

async fn run_validate(backend: &HttpBackend, name: &str, ingredients: &str) -> Result<()> {
    let mut health = HealthMonitor::new();
    health.probe(backend).await;

    let mut session = ValidationSession::new();
    session.set_name(name);
    session.set_ingredients_raw(ingredients);

    match session.begin() {
        ValidateStart::Rejected => {
            println!("Nothing to validate.");
            return Ok(());
        }
        ValidateStart::Invalid => {}
        ValidateStart::Issued { ticket, request } => {
            let outcome = backend.validate(&request).await;
            session.complete(ticket, outcome);
        }
    }

    render::print_document(&view::compose(
        &SearchSession::new(),
        &ExpansionTracker::new(),
        &session,
        &ProgressNarrator::new(),
        health.is_up(),
        backend.base_url(),
    ));
    Ok(())
}

async fn run_health(backend: &HttpBackend) -> Result<()> {
    let mut health = HealthMonitor::new();
    health.probe(backend).await;

    if health.is_up() {
        println!("{} backend is online", "✓".green().bold());
    } else {
        println!("{} backend is offline", "✗".red().bold());
    }
    Ok(())
}
