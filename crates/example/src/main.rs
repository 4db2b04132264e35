//! Flowline graph runner CLI.
//!
//! Loads an FBP JSON graph, wires it with the core components, and logs the
//! channel traffic produced by its initial values.
//!
//! # Usage
//!
//! ```bash
//! flowline-run <graph.json>
//! ```
//!
//! # Example
//!
//! ```bash
//! FLOWLINE_LOG=info,flowline_network=debug flowline-run crates/example/graphs/hello.json
//! ```

use example::{RunConfig, run};

fn main() {
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: flowline-run <graph.json>");
        eprintln!("Example: flowline-run crates/example/graphs/hello.json");
        std::process::exit(1);
    }

    let config = RunConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    if let Err(e) = config.tracing().init() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let network = match run(&args[1]) {
        Ok(network) => network,
        Err(e) => {
            tracing::error!(error = %e, graph = %args[1], "failed to run graph");
            std::process::exit(1);
        }
    };

    for connection in network.connections() {
        tracing::info!(connection = %connection.identity(), "wired");
    }
    tracing::info!(
        graph = %network.graph().name(),
        processes = network.process_count(),
        connections = network.connection_count(),
        uptime = ?network.uptime(),
        "network ready"
    );
}
