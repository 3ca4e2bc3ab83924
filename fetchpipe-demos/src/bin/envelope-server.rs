//! Envelope service for the client demos.
//!
//! Run with: cargo run --bin envelope-server
//! Then:     cargo run --bin envelope-client

use fetchpipe_demos::{envelope_router, server_addr};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let addr = server_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!("=== Envelope service ===");
    println!("Server listening on http://{}", addr);
    println!();
    println!("Test with:");
    println!("  curl http://localhost:3000/api/ping");
    println!("  curl -X POST http://localhost:3000/api/user \\");
    println!("    -H 'Content-Type: application/json' \\");
    println!(
        "    -d '{{\"passport\":\"tok\",\"session\":\"s\",\"resource\":\"{{\\\"id\\\":7}}\",\"sign\":\"\",\"other\":null}}'"
    );

    axum::serve(listener, envelope_router()).await?;
    Ok(())
}
