#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::net::SocketAddr;

    use roadmap_tool::{Roadmap, http_api, load_roadmap_from_json};

    let filter = tracing_subscriber::EnvFilter::try_from_env("ROADMAP_TOOL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    let addr: SocketAddr = std::env::var("ROADMAP_TOOL_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let roadmap = match std::env::var("ROADMAP_TOOL_SNAPSHOT") {
        Ok(path) => load_roadmap_from_json(path)?,
        Err(_) => Roadmap::new(),
    };

    http_api::serve(addr, roadmap).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
