// src/main.rs
// unity-mover - MQTT move-command bridge for 3D scenes

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use unity_mover::config::{BrokerConfig, StoreConfig};
use unity_mover::mcp::MoverServer;
use unity_mover::store::CompletionStore;
use unity_mover::transport::MqttTransport;

#[derive(Parser)]
#[command(name = "unity-mover")]
#[command(about = "MQTT move-command bridge for 3D scenes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run as MCP server (default) exposing the move tools over stdio
    Serve,
}

async fn run_mcp_server() -> Result<()> {
    let broker = BrokerConfig::from_env();
    let store_config = StoreConfig::from_env();

    info!(
        broker = %format!("{}:{}", broker.host, broker.port),
        command_topic = %broker.command_topic,
        feedback_topic = %broker.feedback_topic,
        "Starting unity-mover"
    );

    let store = Arc::new(CompletionStore::new());

    // Feedback subscription runs on its own task for the life of the server
    let (transport_shutdown_tx, transport_shutdown_rx) = tokio::sync::watch::channel(false);
    let (transport, feedback_handle) =
        MqttTransport::connect(&broker, store.clone(), transport_shutdown_rx);

    // TTL sweeper for completions nobody ever polls
    let (sweeper_shutdown_tx, sweeper_handle) =
        unity_mover::background::spawn(store.clone(), store_config);

    let server = MoverServer::new(store, transport, &broker);

    // Run with stdio transport
    let io = rmcp::transport::io::stdio();
    let service = rmcp::serve_server(server, io).await?;
    service.waiting().await?;

    // Client went away: stop the background tasks
    let _ = transport_shutdown_tx.send(true);
    let _ = sweeper_shutdown_tx.send(true);
    let _ = feedback_handle.await;
    let _ = sweeper_handle.await;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env from current directory, if any
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Quiet on stderr: stdout belongs to the MCP stdio transport
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        None | Some(Commands::Serve) => {
            run_mcp_server().await?;
        }
    }

    Ok(())
}
