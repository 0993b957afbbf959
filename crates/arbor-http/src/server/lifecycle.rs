//! Signal handling

use tokio::signal;
use tracing::{error, warn};

/// Resolves on ctrl-c or, on unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(target: "arbor::server", "failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(target: "arbor::server", "failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!(target: "arbor::server", "received ctrl-c, shutting down gracefully");
        },
        _ = terminate => {
            warn!(target: "arbor::server", "received terminate signal, shutting down gracefully");
        },
    }
}
