//! nudge-server: adaptive nudge scheduler daemon and tools.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use nudge_core::models::{EventType, Scenario};
use nudge_core::tracing_setup::init_tracing;
use nudge_core::{CancellationToken, NudgeConfig};
use nudge_server::api::{self, AppState};
use nudge_server::cli::{Cli, Command};
use nudge_server::App;
use nudge_storage::render_csv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = NudgeConfig::load(&cli.config, Some(&cli.overrides()))
        .with_context(|| format!("loading {}", cli.config.display()))?;
    init_tracing(&config.observability);

    if let Command::Config = cli.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let app = App::open(config).context("opening scheduler state")?;

    match cli.command {
        Command::Serve { no_loop } => serve(app, no_loop).await?,
        Command::Cycle { count } => {
            for _ in 0..count {
                let report = app.orchestrator.run_cycle()?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Command::Report {
            source,
            event_type,
            details,
        } => {
            let outcome = app
                .orchestrator
                .report_event(&source, EventType::from(event_type), &details)?;
            match outcome.adjusted {
                Some((category, weight)) => {
                    println!("logged; {category} weight is now {weight:.2}")
                }
                None => println!("logged; no weight change"),
            }
        }
        Command::History { limit } => {
            let limit = limit.unwrap_or(app.config.scheduler.recent_limit);
            let deployed: Vec<_> = app
                .orchestrator
                .audit()
                .read_all()?
                .into_iter()
                .filter(|e| e.event_type == EventType::NudgeDeployed)
                .collect();
            let skip = deployed.len().saturating_sub(limit);
            for event in &deployed[skip..] {
                println!("{}  {}", event.timestamp.to_rfc3339(), event.details);
            }
        }
        Command::Audit { limit, summary } => {
            let audit = app.orchestrator.audit();
            if summary {
                let mut counts: BTreeMap<String, usize> = BTreeMap::new();
                for event in audit.read_all()? {
                    *counts.entry(event.event_type.to_string()).or_default() += 1;
                }
                for (event_type, n) in counts {
                    println!("{event_type}\t{n}");
                }
            } else {
                let events = match limit {
                    Some(n) => audit.recent(n)?,
                    None => audit.read_all()?,
                };
                print!("{}", render_csv(&events));
            }
        }
        Command::State => {
            println!("{}", serde_json::to_string_pretty(&app.orchestrator.state())?);
        }
        Command::SetScenario { name } => {
            let scenario = Scenario::from_name(&name)?;
            app.orchestrator.set_scenario(scenario)?;
            println!("scenario set to {scenario}");
        }
        Command::Config => {}
    }
    Ok(())
}

async fn serve(app: App, no_loop: bool) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            info!("shutdown signal received");
            cancel.cancel();
        });
    }

    let runner = (!no_loop).then(|| app.spawn_cycle_loop(cancel.clone()));

    let addr = app.config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "webhook listener started");

    let router = api::router(AppState::new(Arc::clone(&app.orchestrator)));
    let shutdown = cancel.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("webhook listener failed")?;

    if let Some(handle) = runner {
        match handle.await {
            Ok(Ok(outcome)) => info!(?outcome, "cycle loop finished"),
            Ok(Err(e)) => return Err(e.into()),
            Err(e) => return Err(e).context("cycle loop task panicked"),
        }
    }
    info!("nudge-server stopped");
    Ok(())
}
