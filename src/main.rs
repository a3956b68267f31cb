// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Load .env, read configuration, parse command-line arguments
// 2. Set up logging (to stderr, so it never mixes with the panels)
// 3. Build the one shared HTTP client and hand it to the views
// 4. Load the requested page, print it, exit with a meaningful code
//    (0 = every panel loaded, 1 = some panel failed, 2 = error)
//
// Rust concepts used:
// - async/await: Every panel's request runs concurrently
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to handle different subcommands
// =============================================================================

mod cli;
mod config;
mod error;
mod fetch;
mod http;
mod schema;
mod views;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, Overrides};
use fetch::{FetchContext, FetchRequest};
use http::{HttpMethod, ReqwestHttpClient};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use views::{PageSummary, RepositoriesPage, Sidebar, UserPage, View};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let overrides = Overrides {
        api_url: cli.api_url.clone(),
        token: cli.token.clone(),
    };
    let config = Config::from_env(&overrides)?;

    init_tracing(&config)?;
    tracing::debug!(api_url = %config.api_url, sequencing = ?config.sequencing, "Configuration loaded");

    let client = ReqwestHttpClient::new(config.timeout).context("Failed to create HTTP client")?;
    let context = FetchContext::new(Arc::new(client), config.api_url.clone())
        .with_token(config.token.clone())
        .with_sequencing(config.sequencing);

    match cli.command {
        Commands::User => {
            let page = UserPage::new(&context);
            let sidebar = Sidebar::new(&context, "/");
            show_page(&page, &sidebar, cli.json, async {
                futures::join!(sidebar.load(), page.load());
            })
            .await
        }
        Commands::Repositories => {
            let page = RepositoriesPage::new(&context);
            let sidebar = Sidebar::new(&context, "/repositories");
            show_page(&page, &sidebar, cli.json, async {
                futures::join!(sidebar.load(), page.load());
            })
            .await
        }
        Commands::Account => {
            let sidebar = Sidebar::new(&context, "");
            sidebar.load().await;
            print_view(&sidebar, cli.json)?;
            Ok(0)
        }
        Commands::Fetch {
            endpoint,
            method,
            body,
        } => handle_fetch(&context, &endpoint, method, body.as_deref()).await,
    }
}

/// Loads a page (with progress lines while it runs), prints sidebar and
/// page, and turns the page's panel states into an exit code. The sidebar
/// does not count towards it.
async fn show_page(
    page: &dyn View,
    sidebar: &Sidebar,
    json: bool,
    load: impl std::future::Future<Output = ()>,
) -> Result<i32> {
    // Progress lines go to stderr, and only in text mode
    let watchers = if json { Vec::new() } else { views::watch_progress(page) };

    // Race the page load against Ctrl-C. Whichever finishes first wins and
    // the other future is dropped.
    tokio::select! {
        _ = load => {}
        _ = tokio::signal::ctrl_c() => {
            // Unmount so any request still finishing can't publish into a
            // page nobody is going to print
            page.unmount();
            sidebar.unmount();
            anyhow::bail!("Interrupted");
        }
    }
    // Every panel has settled, so the watchers are about to finish too
    for watcher in watchers {
        watcher.await.ok();
    }

    if json {
        let output = serde_json::json!({
            "sidebar": views::snapshot(sidebar),
            "page": views::snapshot(page),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        eprintln!();
        print_view(sidebar, false)?;
        print_view(page, false)?;
    }

    let summary = PageSummary::of(page);
    if !json {
        if summary.all_loaded() {
            println!("✅ All {} panels loaded", summary.total);
        } else {
            println!("📋 {} of {} panels loaded", summary.loaded, summary.total);
        }
    }

    Ok(if summary.failed > 0 { 1 } else { 0 })
}

fn print_view(view: &dyn View, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&views::snapshot(view))?);
    } else {
        let mut out = String::new();
        view.render(&mut out).context("Failed to render view")?;
        print!("{}", out);
    }
    Ok(())
}

// Handles the 'fetch' subcommand: one controller, one request, one state
async fn handle_fetch(
    context: &FetchContext,
    endpoint: &str,
    method: HttpMethod,
    body: Option<&str>,
) -> Result<i32> {
    let mut request = FetchRequest::new(endpoint);
    if let Some(raw) = body {
        let body = serde_json::from_str(raw).context("--body must be valid JSON")?;
        request = request.with_body(body);
    }

    let controller = context.controller(method);
    tracing::debug!(method = %controller.method(), endpoint, "Issuing single fetch");
    controller.fetch_data(request).await;

    let state = controller.state();
    println!("{}", serde_json::to_string_pretty(&state)?);

    Ok(if state.error.is_some() { 1 } else { 0 })
}

fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("Invalid RUST_LOG filter '{}'", config.log_level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
