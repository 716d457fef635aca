use chaser_agent::*;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::sync::Arc;

use chaser_agent::cache::TaskCache;
use chaser_agent::client::WorkflowClient;
use chaser_agent::config::{Args, Command, Config};
use chaser_agent::domain::deadline;
use chaser_agent::monitor::{CountdownDriver, TaskMonitor};
use chaser_agent::session::{FileSessionStore, SessionStore};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args = Args::parse();
    let config = Config::load(&args.config)?;

    let client = Arc::new(WorkflowClient::new(
        &config.workflow,
        config.polling.request_timeout(),
    ));
    let store = FileSessionStore::new(config.session_path());

    match args.command {
        Command::Login { email } => login(&client, &store, &email).await,
        Command::Logout => {
            store.clear()?;
            info!("👋 Signed out");
            Ok(())
        }
        Command::Watch => watch(client, store, &config).await,
        Command::Assign { email, task, due } => {
            assign_command(&client, &store, &email, &task, &due).await
        }
    }
}

// ===============================
// LOGIN / SESSION
// ===============================

async fn login(client: &WorkflowClient, store: &FileSessionStore, email: &str) -> Result<()> {
    let user = client
        .fetch_employee(email)
        .await?
        .with_context(|| format!("no account found for {}", email))?;

    store.save(&user)?;
    info!(
        "🔑 Signed in as {} ({})",
        user.name,
        if user.is_admin { "admin" } else { "employee" }
    );
    Ok(())
}

// ===============================
// WATCH (live dashboard)
// ===============================

async fn watch(client: Arc<WorkflowClient>, store: FileSessionStore, config: &Config) -> Result<()> {
    let Some(user) = store.load() else {
        anyhow::bail!("no session — run `chaser-agent login --email <you>` first");
    };

    let cache = TaskCache::new();
    let monitor = TaskMonitor::new(client, cache.clone(), config.refresh_interval());

    info!(
        "🔄 Watching as {} ({}) — refreshing every {}s",
        user.name,
        if user.is_admin { "admin" } else { "employee" },
        config.refresh_interval().as_secs()
    );

    if user.is_admin {
        // Roster re-renders once per second off the shared cache; the
        // poller only swaps data in and flags broken deadlines.
        let _driver = CountdownDriver::start({
            let cache = cache.clone();
            move || {
                let cache = cache.clone();
                async move {
                    dashboard::render_admin(&cache).await;
                }
            }
        });

        monitor
            .start_polling(move |records| async move {
                for r in records.iter().filter(|r| !r.is_admin && r.has_task()) {
                    if let Some(raw) = r.deadline.as_deref() {
                        if !raw.trim().is_empty() {
                            if let Err(e) = deadline::parse_deadline(raw) {
                                logging::log_parse_failure(raw, &e.to_string());
                            }
                        }
                    }
                }
            })
            .await;
    } else {
        let email = user.email.clone();

        let _driver = CountdownDriver::start({
            let cache = cache.clone();
            let email = email.clone();
            move || {
                let cache = cache.clone();
                let email = email.clone();
                async move {
                    dashboard::render_employee(&cache, &email).await;
                }
            }
        });

        let prev_deadline = Arc::new(tokio::sync::Mutex::new(
            user.deadline
                .as_deref()
                .and_then(|d| deadline::parse_deadline(d).ok()),
        ));

        monitor
            .start_polling(move |records| {
                let store = store.clone();
                let email = email.clone();
                let prev_deadline = prev_deadline.clone();

                async move {
                    let Some(me) = records.into_iter().find(|r| r.email == email) else {
                        return;
                    };

                    let new_deadline = me
                        .deadline
                        .as_deref()
                        .and_then(|d| deadline::parse_deadline(d).ok());

                    {
                        let mut prev = prev_deadline.lock().await;
                        if let (Some(old), Some(new)) = (*prev, new_deadline) {
                            if new < old {
                                warn!(
                                    "⏳ Time update! Deadline moved up to {}",
                                    deadline::format_db_deadline(new)
                                );
                            }
                        }
                        *prev = new_deadline;
                    }

                    // session mirrors the freshest server record
                    if let Err(e) = store.save(&me) {
                        warn!("session refresh failed: {}", e);
                    }
                }
            })
            .await;
    }

    Ok(())
}

// ===============================
// ASSIGN (admin write path)
// ===============================

async fn assign_command(
    client: &WorkflowClient,
    store: &FileSessionStore,
    email: &str,
    task: &str,
    due: &str,
) -> Result<()> {
    let admin = store
        .load()
        .context("no session — run `chaser-agent login --email <you>` first")?;
    if !admin.is_admin {
        anyhow::bail!("only admins can assign tasks");
    }

    let employee = client
        .fetch_employee(email)
        .await?
        .with_context(|| format!("no employee record for {}", email))?;

    tasks::assign(client, &employee, task, due).await
}
