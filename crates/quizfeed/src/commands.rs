// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations.
//!
//! Each command opens the store, calls one [`FeedService`] operation and
//! prints the outcome. Fetch failures never hide the existing feed.

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use tracing::{error, warn};

use quizfeed_config::model::{FeedConfig, QuizfeedConfig};
use quizfeed_core::{FeedError, HealthStatus, LifecycleStatus, PluginAdapter, KNOWN_CATEGORIES};
use quizfeed_feed::{category_filter, prompts, FeedService, ALL_CATEGORIES};

use crate::app::App;
use crate::render;
use crate::Commands;

/// Dispatches one subcommand.
pub async fn run(command: Commands, config: &QuizfeedConfig) -> Result<(), FeedError> {
    match command {
        Commands::Categories => {
            print!("{}", categories_listing());
            return Ok(());
        }
        Commands::Config => {
            let rendered = quizfeed_config::render_effective(config)
                .map_err(|e| FeedError::Config(e.to_string()))?;
            print!("{rendered}");
            return Ok(());
        }
        _ => {}
    }

    let app = App::open(config).await?;
    let result = match command {
        Commands::Status => {
            print!("{}", status_report(&app.adapters()).await);
            Ok(())
        }
        command => run_with_service(command, &app.service, &config.feed).await,
    };
    if let Err(e) = app.close().await {
        warn!(error = %e, "store shutdown failed");
    }
    result
}

async fn run_with_service(
    command: Commands,
    service: &FeedService,
    feed: &FeedConfig,
) -> Result<(), FeedError> {
    match command {
        Commands::List { archived, category } => {
            let status = if archived {
                LifecycleStatus::Archived
            } else {
                LifecycleStatus::Active
            };
            let view = service
                .list_view(status, category_filter(category.as_deref()))
                .await?;
            print!("{}", render::feed(&view));
        }
        Commands::Fetch {
            category,
            more,
            refresh,
        } => {
            let category = category_filter(category.as_deref());
            let prompt = fetch_prompt(feed, category, more, refresh);
            match fetch_and_store(service, &prompt).await {
                Ok(count) => println!("Fetched {count} new item(s).\n"),
                Err(e) => {
                    // Show what is already stored instead of an empty feed.
                    error!(error = %e, "fetch failed");
                    let view = service.list_view(LifecycleStatus::Active, category).await?;
                    print!("{}", render::feed(&view));
                    return Err(explain(e));
                }
            }
            let view = service.list_view(LifecycleStatus::Active, category).await?;
            print!("{}", render::feed(&view));
        }
        Commands::Custom { request } => {
            let request = request.join(" ");
            let item = match service.request_custom(&request).await {
                Ok(item) => item,
                Err(FeedError::Unpersisted { items, source }) => {
                    warn!(error = %source, "retrying store write once");
                    service.retry_persist(&items).await?;
                    items.into_iter().next().ok_or_else(|| {
                        FeedError::Internal("custom fetch returned no item".into())
                    })?
                }
                Err(e) => return Err(explain(e)),
            };
            print!("{}", render::item_block(&item));
        }
        Commands::Archive { id } => match service.toggle_archive(&id).await? {
            Some(LifecycleStatus::Archived) => println!("Archived {id}."),
            Some(LifecycleStatus::Active) => println!("Restored {id} to the feed."),
            None => println!("No item with id {id}."),
        },
        Commands::Delete { id } => {
            service.remove(&id).await?;
            println!("Deleted {id}.");
        }
        Commands::Enrich { id } => match service.enrich(&id).await.map_err(explain)? {
            Some(item) => print!("{}", render::item_block(&item)),
            None => println!("No item with id {id}."),
        },
        Commands::Export { output } => {
            let blob = service.export_now().await?;
            match output {
                Some(path) => {
                    write_file(&path, &blob)?;
                    println!("Backup written to {}.", path.display());
                }
                None => println!("{blob}"),
            }
        }
        Commands::Import { path } => {
            let contents = std::fs::read_to_string(&path).map_err(|e| {
                FeedError::InvalidBackup(format!("cannot read {}: {e}", path.display()))
            })?;
            service.import_from(&contents).await?;
            let count = service.store().get_all().await?.len();
            println!("Restored {count} item(s) from {}.", path.display());
        }
        Commands::Categories | Commands::Config | Commands::Status => {}
    }
    Ok(())
}

/// Fetches a batch, retrying the store write once if only persisting failed.
async fn fetch_and_store(service: &FeedService, prompt: &str) -> Result<usize, FeedError> {
    match service.request_fetch(prompt).await {
        Ok(items) => Ok(items.len()),
        Err(FeedError::Unpersisted { items, source }) => {
            warn!(error = %source, "retrying store write once");
            service.retry_persist(&items).await?;
            Ok(items.len())
        }
        Err(e) => Err(e),
    }
}

/// Chooses the prompt for a fetch.
fn fetch_prompt(feed: &FeedConfig, category: Option<&str>, more: bool, refresh: bool) -> String {
    if refresh {
        return prompts::refresh(feed.batch_size);
    }
    match category {
        Some(category) => prompts::category(category, feed.batch_size, more),
        None => prompts::today(feed.today_size),
    }
}

/// Prints a hint for rate-limit exhaustion and passes the error through.
fn explain(e: FeedError) -> FeedError {
    if e.is_rate_limited() {
        eprintln!("The API is still rate limiting after retries; try again in a minute.");
    }
    e
}

/// One line per adapter: kind, name, version and current health.
async fn status_report(adapters: &[Arc<dyn PluginAdapter>]) -> String {
    let mut out = String::new();
    for adapter in adapters {
        let health = match adapter.health_check().await {
            Ok(HealthStatus::Healthy) => "healthy".green().to_string(),
            Ok(HealthStatus::Degraded(reason)) => format!("{} ({reason})", "degraded".yellow()),
            Ok(HealthStatus::Unhealthy(reason)) => format!("{} ({reason})", "unhealthy".red()),
            Err(e) => format!("{} ({e})", "error".red()),
        };
        out.push_str(&format!(
            "{:<11} {:<14} v{:<8} {health}\n",
            adapter.adapter_type().to_string(),
            adapter.name(),
            adapter.version().to_string(),
        ));
    }
    out
}

fn write_file(path: &Path, contents: &str) -> Result<(), FeedError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(FeedError::storage)?;
    }
    std::fs::write(path, contents).map_err(FeedError::storage)
}

fn categories_listing() -> String {
    let mut out = format!("{ALL_CATEGORIES}\n");
    for category in KNOWN_CATEGORIES {
        out.push_str(category);
        out.push('\n');
    }
    out
}
