//! Client demo against envelope-server.
//!
//! Usage:
//!   # First, start the server in another terminal:
//!   cargo run --bin envelope-server
//!
//!   # Then run the client (defaults to http://localhost:3000):
//!   cargo run --bin envelope-client
//!
//!   # Or specify a custom server URL:
//!   cargo run --bin envelope-client -- http://localhost:8080

use std::env;
use std::time::{Duration, Instant};

use fetchpipe_client::{
    ClientError, HttpClient, Interceptor, MemoryStore, RequestConfig, ResponseEnvelope, set_config,
};
use fetchpipe_demos::{User, UserQuery};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fetchpipe_client=debug".into()),
        )
        .init();

    // Check command line args first, then SERVER_URL env var, then default
    let base_url = env::args()
        .nth(1)
        .or_else(|| env::var("SERVER_URL").ok())
        .unwrap_or_else(|| "http://localhost:3000".to_string());

    // Startup defaults for every client in this process
    set_config(RequestConfig::service_defaults())?;

    let client = HttpClient::builder()
        .base_url(&base_url)
        .timeout(Duration::from_secs(5))
        .passport_store(MemoryStore::with_passport("demo-passport"))
        .build()?;

    client.interceptors().request.use_interceptor(Interceptor::new(
        |config: RequestConfig| async move { config.try_header("x-client", "envelope-client") },
    ));
    client.interceptors().response.use_interceptor(
        Interceptor::new(|response: ResponseEnvelope| async move {
            tracing::info!(status = response.status, uri = %response.request.uri, "response");
            Ok(response)
        })
        .on_rejected(|err: ClientError| async move {
            tracing::warn!(error = %err, "request failed");
            Err(err)
        }),
    );

    println!("=== fetchpipe client demo ===");
    println!("Server URL: {}", base_url);
    println!();

    println!("Test 1: GET /api/ping...");
    {
        let started = Instant::now();
        let response = client.get("/api/ping").await?;
        assert_eq!(response.status, 200);
        println!("  PASS: {:?} in {:?}", response.data, started.elapsed());
    }

    println!("Test 2: pack round trip on /api/user...");
    {
        let response = client.send_pack("/api/user", Some(&UserQuery { id: 42 })).await?;
        let pack = response.pack()?;
        let user: Option<User> = pack.decode_resource()?;
        assert!(pack.success);
        println!("  PASS: session={} user={:?}", pack.session, user);
    }

    println!("Test 3: 500 still resolves...");
    {
        let response = client
            .request(RequestConfig::new().url("/api/broken").method(fetchpipe_client::Method::Get))
            .await?;
        assert_eq!(response.status, 500);
        println!("  PASS: {} {} {:?}", response.status, response.status_text, response.data);
    }

    println!("Test 4: ejected interceptor stops running...");
    {
        let handle = client.interceptors().request.use_interceptor(Interceptor::new(
            |_config: RequestConfig| async move { Err(ClientError::rejected("blocked")) },
        ));
        match client.get("/api/ping").await {
            Err(err) => assert_eq!(err, ClientError::rejected("blocked")),
            Ok(_) => anyhow::bail!("interceptor did not block the request"),
        }

        client.interceptors().request.eject(handle);
        client.get("/api/ping").await?;
        println!("  PASS: blocked, then allowed after eject");
    }

    println!();
    println!("All tests passed");
    Ok(())
}
