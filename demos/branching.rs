//! An orchestrator picks the language agent that should answer.
//!
//! Requires `OPENAI_API_KEY` (or a `.env` file).
//!
//! ```sh
//! cargo run --example branching -- "Hola mundo"
//! ```

use agentics::prelude::*;
use agentics::provider::create_provider;

#[tokio::main]
async fn main() -> agentics::Result<()> {
    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "hello world".to_string());

    let config = AgenticsConfig::from_env()?;
    let provider = create_provider(&config)?;

    let mut graph = Graph::with_config(config.graph_config()).with_provider(provider);
    graph
        .add_agent(Agent::new(
            "english_agent",
            "You are an agent that will perform a task in English.",
        ))?
        .add_agent(Agent::new(
            "spanish_agent",
            "You are an agent that will perform a task in Spanish.",
        ))?
        .add_agent(
            Agent::new(
                "orchestrator",
                "Your job is to decide which agent to use based on the task.",
            )
            .with_branches(["english_agent", "spanish_agent"]),
        )?
        .set_entry("orchestrator");
    graph
        .add_edge("orchestrator", "english_agent")?
        .add_edge("orchestrator", "spanish_agent")?;

    let summary = graph.run_with_input(&input, CancellationToken::new()).await?;

    for step in &summary.steps {
        match (&step.error, &step.next) {
            (Some(error), _) => println!("{}: error: {error}", step.node),
            (None, Some(next)) => println!("{} -> {next}", step.node),
            (None, None) => println!("{}: {}", step.node, step.content),
        }
    }
    Ok(())
}
