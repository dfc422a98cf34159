use std::io::{self, Read};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use conveyor_pipeline::{PipelineRuntime, RuntimeConfig};
use conveyor_supervisor::{RuntimeClient, Supervisor, SupervisorConfig};
use conveyor_task::TaskInput;

/// Conveyor - a task pipeline orchestrator
#[derive(Parser)]
#[command(name = "conveyor")]
#[command(version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Run a task through the pipeline
  Run {
    #[command(subcommand)]
    target: RunTarget,
  },
}

#[derive(Subcommand)]
enum RunTarget {
  /// Run the pipeline directly and print the finalized run
  Pipeline,

  /// Run under the supervising orchestrator and print the envelope
  Supervised {
    /// Ceiling on status checks before supervision times out
    #[arg(long, default_value_t = 30)]
    max_poll_attempts: u32,

    /// Wait between status checks, in milliseconds
    #[arg(long, default_value_t = 1000)]
    poll_interval_ms: u64,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  match cli.command {
    Some(Commands::Run { target }) => match target {
      RunTarget::Pipeline => {
        run_pipeline()?;
      }
      RunTarget::Supervised {
        max_poll_attempts,
        poll_interval_ms,
      } => {
        run_supervised(max_poll_attempts, poll_interval_ms)?;
      }
    },
    None => {
      println!("conveyor - use --help to see available commands");
    }
  }

  Ok(())
}

fn run_pipeline() -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(run_pipeline_async())
}

async fn run_pipeline_async() -> Result<()> {
  let input = read_task_from_stdin()?;
  eprintln!("Loaded task: {} ({:?})", input.id, input.kind);

  let runtime = PipelineRuntime::new(RuntimeConfig::default());
  let run_id = runtime
    .submit(input)
    .await
    .context("task rejected at ingress")?;

  eprintln!("Run started: {}", run_id);

  // Direct mode: poll the local runtime until the run finalizes.
  let poll_interval = Duration::from_millis(250);
  let max_polls = 240;

  for _ in 0..max_polls {
    let status = runtime
      .status(&run_id)
      .await
      .context("failed to query run status")?;

    if let Some(run) = status.run() {
      eprintln!(
        "Run finalized: {:?} ({} steps)",
        run.status,
        run.results.len()
      );
      println!("{}", serde_json::to_string_pretty(run)?);
      return Ok(());
    }

    tokio::time::sleep(poll_interval).await;
  }

  bail!("run {} did not finalize within the wait budget", run_id)
}

fn run_supervised(max_poll_attempts: u32, poll_interval_ms: u64) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(run_supervised_async(max_poll_attempts, poll_interval_ms))
}

async fn run_supervised_async(max_poll_attempts: u32, poll_interval_ms: u64) -> Result<()> {
  let input = read_task_from_stdin()?;
  eprintln!("Loaded task: {} ({:?})", input.id, input.kind);

  let runtime = Arc::new(PipelineRuntime::new(RuntimeConfig::default()));
  let client = RuntimeClient::new(runtime);

  let config = SupervisorConfig {
    max_poll_attempts,
    poll_interval: Duration::from_millis(poll_interval_ms),
    ..SupervisorConfig::default()
  };
  let supervisor = Supervisor::with_config(client, config);

  let envelope = supervisor.supervise(input).await;

  if envelope.success {
    eprintln!(
      "Supervision completed: {}",
      envelope.run_id.as_deref().unwrap_or("-")
    );
  } else {
    eprintln!(
      "Supervision failed: {}",
      envelope.error.as_deref().unwrap_or("unknown reason")
    );
  }

  println!("{}", serde_json::to_string_pretty(&envelope)?);

  Ok(())
}

fn read_task_from_stdin() -> Result<TaskInput> {
  let mut input = String::new();
  io::stdin()
    .read_to_string(&mut input)
    .context("failed to read task from stdin")?;

  if input.trim().is_empty() {
    bail!("expected a task JSON document on stdin");
  }

  serde_json::from_str(&input).context("failed to parse task JSON from stdin")
}
