//! Serve the Home controller.
//!
//! Run with
//!
//! ```not_rust
//! RUST_LOG=debug cargo run -p home-mvc
//! ```

use home_mvc::{
    HomeController, Server, ServerOptions,
    caching::{Cache, ControllerExt},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting `{}`...", env!("CARGO_BIN_NAME"));

    let options = ServerOptions::from_env()?;
    let cache = Cache::default().with_cache_duration(options.cache_max_age);

    Server::bind(options)
        .await?
        .with_ctrl_c_graceful_shutdown()
        .serve(HomeController.with_cache(cache))
        .await
        .map_err(Into::into)
}
