use tokio::signal;

/// Resolves once the process receives Ctrl+C or, on unix, SIGTERM.
/// Awaited alongside the server so either signal stops accepting
/// connections and lets in-flight requests drain.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

        tokio::select! {
            res = signal::ctrl_c() => match res {
                Ok(()) => tracing::warn!("Ctrl+C received, shutting down"),
                Err(e) => tracing::error!("Ctrl+C handler failed: {e}"),
            },
            _ = sigterm.recv() => tracing::warn!("SIGTERM received, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Ctrl+C handler failed: {e}");
            return;
        }
        tracing::warn!("Ctrl+C received, shutting down");
    }
}
