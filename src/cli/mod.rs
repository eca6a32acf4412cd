//! CLI entry point for agentics.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::config::AgenticsConfig;
use crate::definition::GraphDefinition;
use crate::error::Result;
use crate::graph::{Graph, RunSummary};
use crate::hooks::HookRegistry;
use crate::provider::create_provider;
use crate::tools::ToolRegistry;

/// Run agent graphs from JSON definitions.
#[derive(Parser, Debug)]
#[command(name = "agentics", version, about = "Run agent graphs from JSON definitions")]
pub struct Cli {
    /// TOML config file (environment variables still apply on top)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the model for nodes that don't pin one
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the graph once for a single user input
    Run(RunArgs),
    /// Interactive session; each line is one run (`:q` quits)
    Chat(ChatArgs),
}

/// Arguments for `agentics run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Graph definition (JSON)
    pub definition: PathBuf,

    /// User message fed to the graph
    #[arg(short, long)]
    pub input: String,
}

/// Arguments for `agentics chat`.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Graph definition (JSON)
    pub definition: PathBuf,
}

/// Command that ends a chat session.
pub const QUIT: &str = ":q";

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Layered config for this invocation.
    pub fn load_config(&self) -> Result<AgenticsConfig> {
        let mut config = match &self.config {
            Some(path) => AgenticsConfig::from_toml_file(path)?,
            None => AgenticsConfig::from_env()?,
        };
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        Ok(config)
    }
}

/// Load a definition and build it with the built-in tools.
pub fn load_graph(path: &Path, config: &AgenticsConfig) -> Result<Graph> {
    let definition = GraphDefinition::from_path(path)?;
    let provider = create_provider(config)?;
    definition.build(
        &HookRegistry::new(),
        &ToolRegistry::with_builtins(),
        Some(provider),
        config,
    )
}

/// `agentics run`: one input, one run.
pub async fn handle_run(args: RunArgs, config: &AgenticsConfig) -> Result<()> {
    let graph = load_graph(&args.definition, config)?;
    let summary = graph
        .run_with_input(&args.input, CancellationToken::new())
        .await?;

    let mut out = std::io::stdout().lock();
    write_report(&mut out, &graph, &summary)?;
    Ok(())
}

/// `agentics chat`: read lines from stdin until EOF or `:q`.
pub async fn handle_chat(args: ChatArgs, config: &AgenticsConfig) -> Result<()> {
    let graph = load_graph(&args.definition, config)?;
    let cancel = CancellationToken::new();

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let line = line.trim();
        if line == QUIT {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let summary = graph.run_with_input(line, cancel.clone()).await?;
        for step in summary.failures() {
            eprintln!("[{}] error: {}", step.node, step.error.as_deref().unwrap_or_default());
        }
        if let Some(reply) = graph.memory().last() {
            println!("{}", reply.content);
        }
    }
    Ok(())
}

/// Print the last Memory entry, the step trail and the Bag.
pub fn write_report(out: &mut impl Write, graph: &Graph, summary: &RunSummary) -> Result<()> {
    if let Some(last) = graph.memory().last() {
        writeln!(out, "{}", last.content)?;
    }
    writeln!(out)?;
    for step in &summary.steps {
        match &step.error {
            Some(error) => writeln!(out, "  {} -> error: {error}", step.node)?,
            None => writeln!(
                out,
                "  {} ({} ms){}",
                step.node,
                step.duration.as_millis(),
                step.next
                    .as_deref()
                    .map(|n| format!(" -> {n}"))
                    .unwrap_or_default()
            )?,
        }
    }

    let mut state: Vec<(String, String)> = graph.bag().to_text_map().into_iter().collect();
    state.sort();
    if !state.is_empty() {
        writeln!(out)?;
        for (key, value) in state {
            writeln!(out, "  {key} = {value}")?;
        }
    }
    Ok(())
}
