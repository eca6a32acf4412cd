//! Tests for graph traversal.

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;

use agentics::agent::{route_on_last_message, Agent};
use agentics::error::AgenticsError;
use agentics::graph::Graph;
use agentics::state::{Bag, Memory, Value};
use agentics::types::Role;
use tokio_util::sync::CancellationToken;

use common::{fixed_router, marking_router, MockProvider};

fn marker(name: &str) -> Agent {
    Agent::new(name, "").with_router(marking_router(name))
}

#[tokio::test]
async fn each_node_runs_at_most_once_per_run() {
    let mut graph = Graph::new();
    for name in ["a", "b", "c"] {
        graph.add_agent(marker(name)).unwrap();
    }
    // cycle plus duplicates and a self-loop
    for (s, t) in [("a", "b"), ("b", "c"), ("c", "a"), ("a", "b"), ("c", "c")] {
        graph.add_edge(s, t).unwrap();
    }
    graph.set_entry("a");

    let summary = graph.run(CancellationToken::new()).await.unwrap();
    assert_eq!(summary.visited(), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn explicit_next_beats_static_edges() {
    let mut graph = Graph::new();
    graph
        .add_agent(Agent::new("a", "").with_router(fixed_router("c")))
        .unwrap()
        .add_agent(marker("b"))
        .unwrap()
        .add_agent(marker("c"))
        .unwrap();
    graph
        .add_edge("a", "b")
        .unwrap()
        .add_edge("a", "c")
        .unwrap()
        .set_entry("a");

    let summary = graph.run(CancellationToken::new()).await.unwrap();
    // a named c explicitly, so its edges (to b) were never followed
    assert_eq!(summary.visited(), vec!["a", "c"]);
    assert_eq!(summary.step("a").unwrap().next.as_deref(), Some("c"));
}

#[tokio::test]
async fn bypassed_edge_target_still_runs_when_reached_later() {
    let mut graph = Graph::new();
    graph
        .add_agent(Agent::new("a", "").with_router(fixed_router("c")))
        .unwrap()
        .add_agent(marker("b"))
        .unwrap()
        .add_agent(marker("c"))
        .unwrap();
    graph
        .add_edge("a", "b")
        .unwrap()
        .add_edge("a", "c")
        .unwrap()
        .add_edge("c", "b")
        .unwrap()
        .set_entry("a");

    let summary = graph.run(CancellationToken::new()).await.unwrap();
    assert_eq!(summary.visited(), vec!["a", "c", "b"]);
    assert_eq!(graph.bag().get("visited:b"), Some(Value::Boolean(true)));
}

#[tokio::test]
async fn post_hook_failure_keeps_explicit_route() {
    let provider = MockProvider::new();
    provider.queue_response(r#"{"next": "c"}"#);
    let mut hooks = agentics::hooks::HookRegistry::new();
    hooks.register("audit", |_ctx| async move {
        Err(AgenticsError::api(500, "audit log unavailable"))
    });

    let mut graph = Graph::new().with_provider(provider.clone());
    graph
        .add_agent(Agent::new("a", "").with_post_hook(hooks.resolve("audit").unwrap()))
        .unwrap()
        .add_agent(marker("b"))
        .unwrap()
        .add_agent(marker("c"))
        .unwrap();
    graph.add_edge("a", "b").unwrap().set_entry("a");

    let summary = graph.run(CancellationToken::new()).await.unwrap();
    assert_eq!(summary.visited(), vec!["a", "c"]);
    let step = summary.step("a").unwrap();
    assert_eq!(step.next.as_deref(), Some("c"));
    assert!(step.error.as_deref().unwrap().contains("audit"));
}

#[tokio::test]
async fn explicit_route_is_pushed_ahead_of_queued_nodes() {
    let mut graph = Graph::new();
    graph
        .add_agent(marker("a"))
        .unwrap()
        .add_agent(Agent::new("b", "").with_router(fixed_router("d")))
        .unwrap()
        .add_agent(marker("c"))
        .unwrap()
        .add_agent(marker("d"))
        .unwrap();
    graph
        .add_edge("a", "b")
        .unwrap()
        .add_edge("a", "c")
        .unwrap()
        .set_entry("a");

    let summary = graph.run(CancellationToken::new()).await.unwrap();
    assert_eq!(summary.visited(), vec!["a", "b", "d", "c"]);
}

#[tokio::test]
async fn self_route_runs_once() {
    let mut graph = Graph::new();
    graph
        .add_agent(Agent::new("loop", "").with_router(fixed_router("loop")))
        .unwrap()
        .set_entry("loop");

    let summary = graph.run(CancellationToken::new()).await.unwrap();
    assert_eq!(summary.visited(), vec!["loop"]);
}

#[tokio::test]
async fn route_to_unknown_node_falls_back_to_edges() {
    let mut graph = Graph::new();
    graph
        .add_agent(Agent::new("a", "").with_router(fixed_router("nowhere")))
        .unwrap()
        .add_agent(marker("b"))
        .unwrap();
    graph.add_edge("a", "b").unwrap().set_entry("a");

    let summary = graph.run(CancellationToken::new()).await.unwrap();
    assert_eq!(summary.visited(), vec!["a", "b"]);
}

#[tokio::test]
async fn orchestrator_routes_spanish_greeting() {
    let provider = MockProvider::new();
    provider.queue_response("¡Hola! ¿En qué puedo ayudarte?");

    let mut graph = Graph::new().with_provider(provider.clone());
    graph
        .add_agent(
            Agent::new("orchestrator", "Route the user to the right language agent.")
                .with_branches(["english_agent", "spanish_agent"])
                .with_router(route_on_last_message(
                    "Hola",
                    "spanish_agent",
                    Some("english_agent".to_string()),
                )),
        )
        .unwrap()
        .add_agent(Agent::new("english_agent", "Answer in English."))
        .unwrap()
        .add_agent(Agent::new("spanish_agent", "Responde en español."))
        .unwrap();
    graph
        .add_edge("orchestrator", "english_agent")
        .unwrap()
        .add_edge("orchestrator", "spanish_agent")
        .unwrap()
        .set_entry("orchestrator");

    let summary = graph
        .run_with_input("Hola mundo", CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.visited(), vec!["orchestrator", "spanish_agent"]);
    assert_eq!(
        summary.step("orchestrator").unwrap().next.as_deref(),
        Some("spanish_agent")
    );
    // router short-circuits, so only spanish_agent called the model
    assert_eq!(provider.call_count(), 1);
    assert_eq!(provider.requests()[0].system_prompt, "Responde en español.");
    assert_eq!(
        graph.memory().to_strings(),
        vec!["Hola mundo", "¡Hola! ¿En qué puedo ayudarte?"]
    );
}

#[tokio::test]
async fn repeated_runs_get_a_fresh_visited_set() {
    let counter = |bag: &Bag, _memory: &dyn Memory| -> Option<String> {
        let runs = bag.get_i64("runs").unwrap_or(0);
        bag.set("runs", runs + 1);
        None
    };
    let mut graph = Graph::new();
    graph
        .add_agent(Agent::new("count", "").with_router(counter))
        .unwrap()
        .set_entry("count");

    graph.run(CancellationToken::new()).await.unwrap();
    graph.run(CancellationToken::new()).await.unwrap();
    assert_eq!(graph.bag().get("runs"), Some(Value::Integer(2)));
}

#[tokio::test]
async fn failed_turn_is_recorded_and_traversal_continues() {
    let provider = MockProvider::new();
    provider.queue_error(AgenticsError::api(500, "upstream down"));
    provider.queue_response("second node answered");

    let mut graph = Graph::new().with_provider(provider.clone());
    graph
        .add_agent(Agent::new("first", "one"))
        .unwrap()
        .add_agent(Agent::new("second", "two"))
        .unwrap();
    graph.add_edge("first", "second").unwrap().set_entry("first");

    let summary = graph
        .run_with_input("hi", CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.visited(), vec!["first", "second"]);
    let first = summary.step("first").unwrap();
    assert!(first.content.is_empty());
    assert!(first.error.as_deref().unwrap().contains("upstream down"));
    assert!(summary.step("second").unwrap().is_ok());
    assert_eq!(graph.memory().len(), 2);
}

#[tokio::test]
async fn memory_order_follows_execution_order() {
    let provider = MockProvider::new();
    provider.queue_response("from a");
    provider.queue_response("from b");

    let mut graph = Graph::new().with_provider(provider);
    graph
        .add_agent(Agent::new("a", ""))
        .unwrap()
        .add_agent(Agent::new("b", ""))
        .unwrap();
    graph.add_edge("a", "b").unwrap().set_entry("a");

    graph.run(CancellationToken::new()).await.unwrap();
    let contents: Vec<String> = graph
        .memory()
        .all()
        .into_iter()
        .filter(|m| m.role == Role::Assistant)
        .map(|m| m.content)
        .collect();
    assert_eq!(contents, vec!["from a", "from b"]);
}

#[tokio::test]
async fn cancellation_mid_run_is_an_error() {
    let cancel = CancellationToken::new();
    let trip = cancel.clone();
    let mut graph = Graph::new();
    graph
        .add_agent(Agent::new("a", "").with_router(
            move |_bag: &Bag, _memory: &dyn Memory| -> Option<String> {
                trip.cancel();
                None
            },
        ))
        .unwrap()
        .add_agent(marker("b"))
        .unwrap();
    graph.add_edge("a", "b").unwrap().set_entry("a");

    let err = graph.run(cancel).await.unwrap_err();
    assert!(matches!(err, AgenticsError::Cancelled));
    assert!(!graph.bag().contains("visited:b"));
}

#[tokio::test]
async fn shared_state_can_be_supplied() {
    let bag = Arc::new(Bag::new());
    bag.set("seed", "x");
    let memory: Arc<dyn Memory> = Arc::new(agentics::state::SlidingWindowMemory::new(2));
    let graph = Graph::new().with_state(Arc::clone(&bag), Arc::clone(&memory));
    assert_eq!(graph.bag().get_text("seed").as_deref(), Some("x"));
    assert_eq!(graph.memory().capacity(), 2);
}
