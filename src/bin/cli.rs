use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use workflow_automation::prelude::*;
use workflow_automation::ExecutionStore;

#[derive(Parser)]
#[command(name = "workflow-automation")]
#[command(about = "Run event-triggered automation workflows", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single workflow file against trigger data
    Run {
        /// Path to the workflow YAML file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Trigger data as inline JSON, or @path to a JSON file
        #[arg(short, long, default_value = "{}")]
        data: String,

        /// Path to engine.yaml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Wait for delayed actions before exiting
        #[arg(short, long)]
        wait: bool,
    },

    /// Publish a trigger to every matching workflow in a directory
    Publish {
        /// Path to the workflows directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Trigger type, e.g. ClinicCreated
        #[arg(short, long)]
        trigger: String,

        /// Trigger data as inline JSON, or @path to a JSON file
        #[arg(short, long, default_value = "{}")]
        data: String,

        /// Path to engine.yaml (default: <DIR>/engine.yaml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Wait for delayed actions before exiting
        #[arg(short, long)]
        wait: bool,
    },

    /// List workflows in a directory
    List {
        /// Path to the workflows directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// Validate workflow files without running them
    Validate {
        /// Path to workflow file or directory
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

#[cfg(feature = "otel")]
fn init_otel_tracing(verbose: bool) {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::runtime::Tokio;
    use opentelemetry_sdk::trace::TracerProvider;

    let filter = if verbose {
        "workflow_automation=debug"
    } else {
        "workflow_automation=info"
    };

    let otlp_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4317".to_string());

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&otlp_endpoint)
        .build()
        .expect("Failed to create OTLP exporter");

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, Tokio)
        .build();

    let tracer = provider.tracer("workflow-automation");
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(otel_layer)
        .init();

    opentelemetry::global::set_tracer_provider(provider);
}

#[cfg(not(feature = "otel"))]
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "workflow_automation=debug"
    } else {
        "workflow_automation=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    #[cfg(feature = "otel")]
    init_otel_tracing(cli.verbose);

    #[cfg(not(feature = "otel"))]
    init_tracing(cli.verbose);

    let result = run(cli).await;

    #[cfg(feature = "otel")]
    opentelemetry::global::shutdown_tracer_provider();

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Commands::Run {
            file,
            data,
            config,
            wait,
        } => run_single(file, &data, config, wait).await,
        Commands::Publish {
            dir,
            trigger,
            data,
            config,
            wait,
        } => publish(dir, &trigger, &data, config, wait).await,
        Commands::List { dir } => list_workflows(dir),
        Commands::Validate { path } => validate(path),
    }
}

/// In-process engine wired to in-memory stores
struct LocalEngine {
    orchestrator: Arc<Orchestrator>,
    repository: Arc<InMemoryWorkflowRepository>,
    store: InMemoryExecutionStore,
    scheduler: TokioDelayScheduler,
}

impl LocalEngine {
    fn start(workflows: Vec<Workflow>, config: &EngineConfig) -> anyhow::Result<Self> {
        let ports = ActionPorts {
            email: Arc::new(OutboxEmailSender::new()),
            notifications: Arc::new(InMemoryNotificationStore::new()),
            tags: Arc::new(InMemoryTagStore::new()),
            tickets: Arc::new(InMemoryTicketStore::new()),
            webhooks: Arc::new(ReqwestWebhookClient::new(&config.webhook)?),
        };
        let dispatcher = ActionDispatcher::new(ports).with_defaults(config.defaults.clone());

        let repository = Arc::new(InMemoryWorkflowRepository::new(workflows));
        let store = InMemoryExecutionStore::new();
        let (scheduler, worker) = TokioDelayScheduler::new(config.scheduler.channel_capacity);

        let orchestrator = Arc::new(Orchestrator::new(
            repository.clone(),
            Arc::new(store.clone()),
            dispatcher,
            Arc::new(scheduler.clone()),
        ));
        tokio::spawn(worker.run(orchestrator.clone()));

        Ok(Self {
            orchestrator,
            repository,
            store,
            scheduler,
        })
    }

    /// Optionally drain delayed actions, then reload executions from the store
    async fn settle(&self, executions: Vec<Execution>, wait: bool) -> anyhow::Result<Vec<Execution>> {
        if !wait {
            if self.scheduler.pending() > 0 {
                println!(
                    "{} delayed action(s) still pending; rerun with --wait to execute them",
                    self.scheduler.pending()
                );
            }
            return Ok(executions);
        }

        self.scheduler.wait_idle().await;
        let mut settled = Vec::with_capacity(executions.len());
        for execution in executions {
            let reloaded = self
                .store
                .get_execution(execution.id)
                .await?
                .unwrap_or(execution);
            settled.push(reloaded);
        }
        Ok(settled)
    }
}

fn parse_trigger_data(data: &str) -> anyhow::Result<TriggerData> {
    let json = match data.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read trigger data from {}", path))?,
        None => data.to_string(),
    };
    Ok(TriggerData::from_json_str(&json)?)
}

fn load_config(explicit: Option<PathBuf>, dir: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let path = explicit.or_else(|| {
        dir.map(|d| d.join("engine.yaml"))
            .filter(|p| p.is_file())
    });
    match path {
        Some(path) => Ok(EngineConfig::load(&path)?),
        None => Ok(EngineConfig::default()),
    }
}

fn report(executions: &[Execution]) -> anyhow::Result<bool> {
    println!("{}", serde_json::to_string_pretty(executions)?);

    let success = executions
        .iter()
        .all(|e| e.status == ExecutionStatus::Completed && e.all_actions_succeeded());
    Ok(success)
}

async fn run_single(
    file: PathBuf,
    data: &str,
    config: Option<PathBuf>,
    wait: bool,
) -> anyhow::Result<bool> {
    let workflow = WorkflowLoader::load_file(&file)?;
    let workflow_id = workflow.id.clone();
    let config = load_config(config, file.parent())?;
    let trigger_data = parse_trigger_data(data)?;

    let engine = LocalEngine::start(vec![workflow], &config)?;
    let Some(execution) = engine
        .orchestrator
        .execute(&workflow_id, &trigger_data)
        .await?
    else {
        println!("Workflow '{}' is disabled, nothing to run", workflow_id);
        return Ok(true);
    };

    let executions = engine.settle(vec![execution], wait).await?;
    report(&executions)
}

async fn publish(
    dir: PathBuf,
    trigger: &str,
    data: &str,
    config: Option<PathBuf>,
    wait: bool,
) -> anyhow::Result<bool> {
    let workflows = WorkflowLoader::load_directory(&dir)?;
    let config = load_config(config, Some(&dir))?;
    let trigger_data = parse_trigger_data(data)?;

    let engine = LocalEngine::start(workflows, &config)?;
    let publisher = EventPublisher::new(engine.repository.clone(), engine.orchestrator.clone());
    let executions = publisher.publish(trigger, &trigger_data).await?;

    if executions.is_empty() {
        println!("No enabled workflow reacts to '{}'", trigger);
        return Ok(true);
    }

    let executions = engine.settle(executions, wait).await?;
    report(&executions)
}

fn list_workflows(dir: PathBuf) -> anyhow::Result<bool> {
    let workflows = WorkflowLoader::load_directory(&dir)?;

    println!("{:<30} {:<25} {:<8} ACTIONS", "ID", "TRIGGER", "ENABLED");
    for workflow in &workflows {
        println!(
            "{:<30} {:<25} {:<8} {}",
            workflow.id,
            workflow.trigger,
            workflow.enabled,
            workflow.actions.len()
        );
    }
    println!("\n{} workflow(s)", workflows.len());
    Ok(true)
}

fn validate(path: PathBuf) -> anyhow::Result<bool> {
    let result = if path.is_dir() {
        WorkflowLoader::load_directory(&path)
    } else {
        WorkflowLoader::load_file(&path).map(|w| vec![w])
    };

    match result {
        Ok(workflows) => {
            for workflow in &workflows {
                let unsupported: Vec<_> = workflow
                    .actions
                    .iter()
                    .filter(|a| matches!(a.action_type, workflow_automation::ActionType::Unsupported(_)))
                    .map(|a| format!("{} ({})", a.id, a.action_type))
                    .collect();
                if unsupported.is_empty() {
                    println!("✓ {}", workflow.id);
                } else {
                    println!(
                        "! {}: unsupported action types will fail at runtime: {}",
                        workflow.id,
                        unsupported.join(", ")
                    );
                }
            }
            println!("\n{} workflow(s) valid", workflows.len());
            Ok(true)
        }
        Err(e) => {
            println!("✗ {}", e);
            Ok(false)
        }
    }
}
