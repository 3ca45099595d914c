//! Room-scoped WebSocket chat relay server.
//!
//! Clients join a named room over WebSocket and exchange messages and
//! typing indicators with the other occupants.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! ```

use clap::Parser;

use irori_shared::logger::setup_logger;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "server", about = "Irori chat relay server")]
struct Args {
    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// SQLite URL for the message history
    #[arg(long, default_value = "sqlite://chat.db?mode=rwc")]
    database_url: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    // Run the server
    if let Err(e) = irori_server::run_server(args.host, args.port, &args.database_url).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
