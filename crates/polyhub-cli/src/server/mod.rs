//! HTTP server startup and graceful shutdown.
//!
//! After a shutdown signal the server stops accepting connections and waits
//! up to the configured shutdown timeout for in-flight requests.

mod error;
mod shutdown;

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;

pub use self::error::{Result, ServerError};
use self::shutdown::shutdown_signal;
use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Binds the configured address and serves `app` until a shutdown signal.
pub async fn serve(app: Router, config: &ServerConfig) -> Result<()> {
    let address = config.server_addr();
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.to_string(),
            source,
        })?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %address,
        "Server is ready and listening for connections"
    );

    if config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "Server is bound to all interfaces. Ensure firewall rules are properly configured."
        );
    }

    serve_listener(listener, app, shutdown_signal(), config.shutdown_timeout()).await
}

/// Serves on an already bound listener and stops once `signal` resolves.
///
/// Connections still open `drain_timeout` after the signal are abandoned.
async fn serve_listener<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    drain_timeout: Duration,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let start_time = Instant::now();
    let draining = Arc::new(Notify::new());

    let notify = draining.clone();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            notify.notify_one();
        })
        .into_future();
    tokio::pin!(server);

    let finished = tokio::select! {
        result = &mut server => Some(result),
        () = draining.notified() => None,
    };

    let result = match finished {
        Some(result) => result,
        None => match tokio::time::timeout(drain_timeout, &mut server).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    timeout_secs = drain_timeout.as_secs(),
                    "Shutdown timeout elapsed, dropping open connections"
                );
                Ok(())
            }
        },
    };

    let uptime_secs = start_time.elapsed().as_secs();
    match result {
        Ok(()) => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                uptime_secs,
                "Server shut down gracefully"
            );
            Ok(())
        }
        Err(error) => {
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                %error,
                uptime_secs,
                "Server encountered an error"
            );
            Err(ServerError::Runtime(error))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use tokio::sync::oneshot;

    use super::*;

    #[tokio::test]
    async fn stops_when_signalled() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let app = Router::new().route("/", get(|| async { "ok" }));
        let (stop, stopped) = oneshot::channel::<()>();

        let handle = tokio::spawn(serve_listener(
            listener,
            app,
            async move {
                let _ = stopped.await;
            },
            Duration::from_secs(1),
        ));

        let _ = stop.send(());
        tokio::time::timeout(Duration::from_secs(5), handle).await???;
        Ok(())
    }
}
