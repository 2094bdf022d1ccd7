use clap::Parser;
use signet_api::{config::ApiConfig, server};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::parse();

    if config.dump_openapi {
        let json = server::openapi().to_pretty_json()?;
        print!("{}", json);
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or("signet_api=info,signet_authority=info,signet_db=info".into()),
        )
        .pretty()
        .init();

    let (router, _api) = server::make(config.clone()).await?;

    let listener = TcpListener::bind(config.bind_addr).await?;

    info!("Listening on http://{:?}", config.bind_addr);

    axum::serve(listener, router).await?;

    Ok(())
}
