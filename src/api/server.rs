//! HTTP Server
//!
//! Runs the router until the shutdown signal fires. In-flight bulk actions
//! are cancelled as soon as the signal arrives so draining connections never
//! waits on a stalled substrate.

use std::future::Future;

use tokio::net::TcpListener;
use tracing::info;

use super::{create_router, AppState};

/// Serves the cache API on `listener` until `shutdown` resolves.
pub async fn serve<S>(listener: TcpListener, state: AppState, shutdown: S) -> std::io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let actions = state.actions.clone();
    let app = create_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("Cancelling in-flight actions before draining connections");
            actions.close();
        })
        .await
}
