use imagematch::{create_router, init, AppState, Config, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging and environment
    init()?;

    // Load configuration and the pretrained models
    let config = Config::from_env()?;
    let addr = config.bind_addr;
    log::info!(
        "Match threshold {}, vision weights {}, text module {}",
        config.match_threshold,
        config.resnet_weights.display(),
        config.bert_model.display()
    );

    let state = AppState::new(config)?;

    // Build our application with routes
    let app = create_router().with_state(state);

    // Set up the server
    log::info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
