//! Staff messaging server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin staffchat-server -- --port 4001
//! ```

use clap::Parser;
use staffchat_server::ServerArgs;
use staffchat_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = ServerArgs::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the server
    if let Err(e) = staffchat_server::run(args).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
