use log::*;
use std::future::Future;
use tokio::net::TcpListener;
use tokio::signal;

pub use error::{Error, Result};
pub use service::AppState;

mod controller;
pub mod error;
mod middleware;
pub mod router;
mod sse;

/// Binds the configured `interface:port` and serves until Ctrl-C or SIGTERM.
///
/// A bind failure is returned to the caller, which treats it as fatal.
pub async fn init_server(app_state: AppState) -> Result<()> {
    let listen_addr = app_state.config.listen_addr();
    let listener = TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| Error::bind(listen_addr.as_str(), e))?;

    info!("[amara-core] API listening on {}", app_state.config.port);

    serve(listener, app_state, shutdown_signal()).await
}

/// Serves the application on an already bound listener until `shutdown`
/// resolves, then drains in-flight connections before returning.
pub async fn serve<F>(listener: TcpListener, app_state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router::define_routes(app_state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(Error::serve)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining open connections");
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::sse::Tick;
    use clap::Parser;
    use error::{ErrorKind, StartupErrorKind};
    use service::config::Config;
    use std::time::{Duration, Instant};
    use tokio::sync::oneshot;

    fn test_state() -> AppState {
        let config = Config::parse_from(["amara_core", "--interface", "127.0.0.1"])
            .set_agent_token(None)
            .set_cors_origins(Vec::new());
        AppState::new(config)
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported_as_startup_error() {
        let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port();

        let mut app_state = test_state();
        app_state.config = app_state.config.set_port(port);

        let err = init_server(app_state).await.unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::Startup(StartupErrorKind::Bind(format!("127.0.0.1:{port}")))
        );
    }

    #[tokio::test]
    async fn test_stream_over_socket_sends_three_frames_then_closes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve(listener, test_state(), async {
            shutdown_rx.await.ok();
        }));

        let response = reqwest::get(format!("http://{addr}/api/stream/test"))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body = response.text().await.unwrap();
        let expected: String = (1..=3).map(|n| Tick::new(n).frame()).collect();
        assert_eq!(body, expected);

        shutdown_tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server did not shut down")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_client_disconnect_stops_stream_and_server_shuts_down() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve(listener, test_state(), async {
            shutdown_rx.await.ok();
        }));

        let mut response = reqwest::get(format!("http://{addr}/api/stream/test"))
            .await
            .unwrap();

        let mut received = Vec::new();
        while !received.ends_with(b"\n\n") {
            let chunk = response
                .chunk()
                .await
                .unwrap()
                .expect("stream ended before the first frame");
            received.extend_from_slice(&chunk);
        }
        assert_eq!(received, Tick::new(1).frame().into_bytes());

        // Hang up after the first frame. Graceful shutdown waits for open
        // connections, so it only finishes well before the third tick (about
        // 2s away) if the stream stopped when the client left.
        drop(response);
        let hung_up = Instant::now();

        shutdown_tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_millis(500), server)
            .await
            .expect("stream kept running after the client hung up")
            .unwrap();
        assert!(result.is_ok());
        assert!(hung_up.elapsed() < Duration::from_millis(500));
    }
}
