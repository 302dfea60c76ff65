#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use study_plan::{PlannerConfig, TaskRegistry, http_api};
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let config = PlannerConfig::load(config_path.as_deref())?;
    let addr: SocketAddr = config.http_addr.parse()?;

    tracing::info!(%addr, weekly_hours = config.weekly_hours, "study-plan HTTP API listening");
    http_api::serve(addr, TaskRegistry::new(), config).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
