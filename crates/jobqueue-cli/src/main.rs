//! jobqueue - run or inspect job queues.
//!
//! The queues live in-process, so `--seed` is the way to put work in them
//! before `work` or `list` runs.

mod console;
mod demo;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::info;

use jobqueue_core::app::{App, AppBuilder};
use jobqueue_core::config::{ManagerConfig, WorkerOptions};
use jobqueue_core::domain::JobQueueError;
use jobqueue_core::impls::{InMemoryQueue, QueueManager};
use jobqueue_core::observability;
use jobqueue_core::typed::TypedJob;

use crate::console::ConsoleEventSink;
use crate::demo::{FlakyJob, HelloJob};

/// jobqueue - persistent job queue worker
#[derive(Parser, Debug)]
#[command(name = "jobqueue", version, about = "Run and inspect job queues")]
struct Cli {
    /// Queues that exist in this process (comma separated)
    #[arg(long, global = true, env = "JOBQUEUE_QUEUES", value_delimiter = ',', default_value = "default")]
    queues: Vec<String>,

    /// Enqueue this many demo jobs before running the command
    #[arg(long, global = true, default_value_t = 0)]
    seed: u32,

    /// Failed jobs are requeued while their execution count is at most this
    #[arg(long, global = true, env = "JOBQUEUE_MAX_RETRIES", default_value_t = 10)]
    max_retries: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process jobs from a queue
    Work {
        /// Queue to take jobs from
        #[arg(long)]
        queue: String,

        /// Stop after this many attempts (0 = no limit)
        #[arg(long, default_value_t = 0)]
        limit: u64,

        /// Stop after this many seconds (0 = no limit)
        #[arg(long, default_value_t = 0)]
        max_time: u64,
    },

    /// Show the first jobs of a queue and its size
    List {
        /// Queue to inspect
        #[arg(long)]
        queue: String,

        /// How many jobs to show
        #[arg(long, default_value_t = 1)]
        limit: usize,
    },
}

impl Command {
    fn queue(&self) -> &str {
        match self {
            Command::Work { queue, .. } | Command::List { queue, .. } => queue,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    observability::init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let app = build_app(&cli)?;

    if cli.seed > 0 {
        seed(&app, cli.command.queue(), cli.seed).await?;
    }

    match cli.command {
        Command::Work {
            queue,
            limit,
            max_time,
        } => work(&app, &queue, WorkerOptions::new(limit, max_time)).await,
        Command::List { queue, limit } => list(&app, &queue, limit).await,
    }
}

fn build_app(cli: &Cli) -> Result<App> {
    let mut queues = QueueManager::new();
    for name in cli.queues.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        queues.insert(Arc::new(InMemoryQueue::new(name)));
    }
    if queues.names().is_empty() {
        bail!("no queues configured");
    }

    let app = AppBuilder::new()
        .register::<HelloJob>()?
        .register::<FlakyJob>()?
        .expect_jobs(&[HelloJob::TYPE, FlakyJob::TYPE])
        .queues(Arc::new(queues))
        .config(ManagerConfig {
            max_retries: cli.max_retries,
        })
        .build()?;
    Ok(app)
}

/// Every third demo job fails twice before it succeeds.
async fn seed(app: &App, queue: &str, count: u32) -> Result<()> {
    let manager = app.manager();
    for i in 0..count {
        let result = if i % 3 == 2 {
            manager.queue(queue, &FlakyJob { failures: 2 }).await
        } else {
            let job = HelloJob {
                name: format!("job-{i}"),
            };
            manager.queue(queue, &job).await
        };
        result.with_context(|| format!("seeding queue '{queue}'"))?;
    }
    info!(queue, count, "seeded demo jobs");
    Ok(())
}

async fn work(app: &App, queue: &str, options: WorkerOptions) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        let _ = shutdown_tx.send(true);
    });

    let worker = app
        .worker(options)
        .with_event_sink(Arc::new(ConsoleEventSink))
        .with_shutdown(shutdown_rx);

    let summary = worker.run(queue).await.map_err(describe)?;
    info!(
        queue,
        attempts = summary.attempts,
        executed = summary.executed,
        failed = summary.failed(),
        "worker finished"
    );
    Ok(())
}

async fn list(app: &App, queue: &str, limit: usize) -> Result<()> {
    let listing = app.manager().list(queue, limit).await.map_err(describe)?;
    println!("{listing}");
    Ok(())
}

fn describe(err: JobQueueError) -> anyhow::Error {
    match err {
        JobQueueError::QueueNotFound(_) => anyhow::Error::new(err).context("cannot open queue"),
        other => anyhow::Error::new(other),
    }
}
