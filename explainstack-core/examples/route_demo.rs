//! Routing demo
//!
//! Routes a few inputs through the stock configuration, with API keys taken
//! from OPENAI_API_KEY / CLAUDE_API_KEY / GEMINI_API_KEY. Pass a config file
//! path (YAML or JSON) as the first argument to use it instead.
//!
//! Run with: RUST_LOG=info cargo run --example route_demo [config.yaml]

use anyhow::Context;
use explainstack_core::config::{self, DispatchConfig};
use explainstack_core::{validate_input, AgentRegistry, ProviderErrorKind, Router};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const CALL_TIMEOUT: Duration = Duration::from_secs(60);

const SAMPLES: [(&str, Option<&str>); 4] = [
    (
        "diff --git a/nova/utils.py b/nova/utils.py\n--- a/nova/utils.py\n+++ b/nova/utils.py\n@@ -1,2 +1,2 @@\n-def f(x): return x*2\n+def f(x):\n+    return x * 2",
        None,
    ),
    ("please optimize this loop for speed:\nfor i in range(len(xs)): total += xs[i]", None),
    ("Added retry logic to the volume attach path", Some("commit_writer")),
    ("some code", Some("nonexistent_agent")),
];

fn load_config() -> anyhow::Result<DispatchConfig> {
    match std::env::args().nth(1) {
        Some(path) if path.ends_with(".json") => {
            config::load_from_json(&path).with_context(|| format!("loading {}", path))
        }
        Some(path) => config::load_from_yaml(&path).with_context(|| format!("loading {}", path)),
        None => Ok(DispatchConfig::default().with_env_overrides()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = load_config()?;
    let limits = config.validation;
    let router = Router::new(Arc::new(AgentRegistry::new(config)));

    println!("Agents:");
    for agent in router.agent_list() {
        println!("  {:<20} {}", agent.id, agent.description);
    }
    println!();

    for (input, explicit) in SAMPLES {
        if let Err(e) = validate_input(input, &limits) {
            println!("skipped: {}", e);
            continue;
        }

        let suggested = router.suggest(input);
        println!("> {} (suggested: {}, explicit: {:?})", first_line(input), suggested, explicit);

        let dispatch = match tokio::time::timeout(CALL_TIMEOUT, router.dispatch(input, explicit)).await {
            Ok(dispatch) => dispatch?,
            Err(_) => {
                // Same treatment as a provider connection failure
                println!(
                    "error: {} timed out after {:?}. {}\n",
                    explicit.unwrap_or(suggested.id()),
                    CALL_TIMEOUT,
                    ProviderErrorKind::ConnectionFailed
                );
                continue;
            }
        };

        match dispatch.outcome.text() {
            Some(text) => println!("{}", text),
            None => println!("error: {}", dispatch.outcome.error().unwrap_or_default()),
        }
        println!(
            "[{} in {:?}, ~{} tokens, ~${:.4}]\n",
            dispatch.agent_id, dispatch.elapsed, dispatch.approx_tokens, dispatch.estimated_cost
        );
    }

    Ok(())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
