use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use rpn_gate::config::GateConfig;
use rpn_gate::AppState;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = GateConfig::from_env();
    tracing_subscriber::fmt()
        .with_max_level(cfg.log_level)
        .with_target(false)
        .compact()
        .init();

    if let Some(addr) = cfg.metrics_addr {
        PrometheusBuilder::new().with_http_listener(addr).install()?;
        info!("metrics on {addr}");
    }

    let store = rpn_gate::open_store(&cfg.store)
        .await
        .with_context(|| format!("open stack store {:?}", cfg.store))?;
    let app = rpn_gate::app(AppState::new(store), &cfg);
    let listener = TcpListener::bind(&cfg.bind).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
