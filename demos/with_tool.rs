//! A single agent answering arithmetic questions with a tool, across two
//! runs that share Memory.
//!
//! Requires `OPENAI_API_KEY` (or a `.env` file).
//!
//! ```sh
//! cargo run --example with_tool
//! ```

use std::sync::Arc;

use agentics::prelude::*;
use agentics::provider::create_provider;
use agentics::tools::{FunctionTool, ParameterBuilder};

#[tokio::main]
async fn main() -> agentics::Result<()> {
    let config = AgenticsConfig::from_env()?;
    let provider = create_provider(&config)?;

    let multiply = FunctionTool::new(
        "multiply",
        "Use this tool to multiply two numbers. The input has two keys, 'a' and 'b', \
         which are the integers to multiply.",
        ParameterBuilder::new()
            .integer("a", "first factor")
            .integer("b", "second factor")
            .build(),
        |args, ctx| async move {
            let product = args.get_i64("a")? * args.get_i64("b")?;
            ctx.bag.set("result", product);
            Ok::<_, AgenticsError>(serde_json::json!(product))
        },
    );

    let mut graph = Graph::new().with_provider(provider);
    graph
        .add_agent(
            Agent::new("agent", "You are Tomas, a helpful assistant.")
                .with_model(config.model.clone())
                .with_tool(Arc::new(multiply)),
        )?
        .set_entry("agent");

    for question in ["how many is 3 * 2?", "how many is 3 * 10?"] {
        graph.run_with_input(question, CancellationToken::new()).await?;
        if let Some(reply) = graph.memory().last() {
            println!("> {question}\n{}\n", reply.content);
        }
    }

    println!("last result: {:?}", graph.bag().get("result"));
    Ok(())
}
