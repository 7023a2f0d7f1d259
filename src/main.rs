use doctor_portal::server::{build_app, load_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = load_config()?;

    eprintln!("🩺 Doctor Portal v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Profile API: {}", config.profile_url());
    eprintln!("   User: {}", config.user_id);
    eprintln!("   Database: {}", config.db_path.display());
    eprintln!("   Onboarding API: http://0.0.0.0:{}/api/onboarding", config.http_port);

    let app = build_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port)).await?;
    tracing::info!(port = config.http_port, "Onboarding server started");
    axum::serve(listener, app).await?;

    Ok(())
}
