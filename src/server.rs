use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post, put},
    Extension, Router,
};
use tokio::sync::oneshot;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    config::Config, directory::UserDirectory, error::StartupError, logging,
    repository::UserRepository, routes, store::UserStore,
};

/// The default port to run the server on.
pub const DEFAULT_PORT: u16 = 3000;

fn user_routes() -> Router {
    Router::new()
        .route("/users", post(routes::register))
        .route("/users/search/:user_id", get(routes::search))
        .route("/users/connect/:user_id", put(routes::connect))
        .route("/users/:user_id", get(routes::list))
}

/// The application, with all routes, serving the given directory.
pub fn app(directory: Arc<UserDirectory>) -> Router {
    Router::new()
        .merge(user_routes())
        .nest("/api", user_routes())
        .route("/version", get(routes::show_version))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // Each handler needs to be able to reach the directory
                .layer(Extension(directory)),
        )
}

/// Everything to do before the server may run: validate the configuration,
/// then set up logging as configured.
pub async fn prepare(config: &Config) -> Result<(), StartupError> {
    config.validate()?;
    logging::init(config.log_dir.clone()).await
}

async fn open_store(config: &Config) -> Result<Arc<dyn UserRepository>, StartupError> {
    let store = match &config.store_path {
        Some(path) => UserStore::open(path).await?,
        None => UserStore::in_memory(),
    };

    Ok(Arc::new(store))
}

async fn run(
    config: Config,
    port: Option<u16>,
    allocated_port: Option<oneshot::Sender<u16>>,
) -> Result<(), StartupError> {
    config.validate()?;

    let directory = Arc::new(UserDirectory::new(open_store(&config).await?));

    let addr = SocketAddr::new(config.bind_address, port.unwrap_or(0));
    let server = axum::Server::try_bind(&addr)
        .map_err(|e| StartupError::Serve(e.to_string()))?
        .serve(app(directory).into_make_service());
    let addr = server.local_addr();

    if let Some(port_reply) = allocated_port {
        // Whoever asked may have given up waiting, that's fine.
        let _ = port_reply.send(addr.port());
    }

    info!("listening on {}", addr);

    server
        .await
        .map_err(|e| StartupError::Serve(e.to_string()))
}

/// Start the server on an arbitrary available port.
/// The port allocated will be sent on the provided channel.
pub async fn run_any_port(
    config: Config,
    allocated_port: oneshot::Sender<u16>,
) -> Result<(), StartupError> {
    run(config, None, Some(allocated_port)).await
}

/// Start the server on the given port.
pub async fn run_on_port(config: Config, port: u16) -> Result<(), StartupError> {
    run(config, Some(port), None).await
}
