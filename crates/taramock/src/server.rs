//! Binding and serving the router over plain HTTP or HTTPS.

use std::{net::SocketAddr, path::Path, time::Duration};

use anyhow::{Context, Result};
use axum::Router;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};

use crate::config::Config;

/// Time in-flight requests get to finish once HTTPS shutdown starts.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Serves the router until Ctrl+C or SIGTERM.
///
/// HTTPS is used when the config names a certificate and key.
pub async fn serve(app: Router, config: &Config) -> Result<()> {
    match config.tls_paths() {
        Some((cert, key)) => serve_tls(app, config, cert, key).await,
        None => serve_plain(app, config).await,
    }
}

async fn serve_plain(app: Router, config: &Config) -> Result<()> {
    if config.expects_tls_proxy() {
        tracing::warn!(
            issuer = %config.issuer,
            "Issuer is https but no TLS certificate is configured, serving plain HTTP"
        );
    }

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        None => {
            let addr = config.listen_addr();
            TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?
        }
    };

    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn serve_tls(app: Router, config: &Config, cert: &Path, key: &Path) -> Result<()> {
    let tls = load_tls_config(cert, key).await?;
    let addr = resolve(&config.listen_addr()).await?;

    let handle = Handle::new();
    tokio::spawn({
        let handle = handle.clone();
        async move {
            shutdown_signal().await;
            handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        }
    });

    tracing::info!(cert = %cert.display(), "listening on https://{addr}");

    axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .with_context(|| format!("failed to serve HTTPS on {addr}"))?;

    Ok(())
}

/// Reads a PEM certificate chain and private key for HTTPS.
pub async fn load_tls_config(cert: &Path, key: &Path) -> Result<RustlsConfig> {
    RustlsConfig::from_pem_file(cert, key).await.with_context(|| {
        format!(
            "failed to load TLS certificate {} and key {}",
            cert.display(),
            key.display()
        )
    })
}

async fn resolve(addr: &str) -> Result<SocketAddr> {
    tokio::net::lookup_host(addr)
        .await
        .with_context(|| format!("failed to resolve {addr}"))?
        .next()
        .with_context(|| format!("{addr} did not resolve to any address"))
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn testdata(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("testdata")
            .join(name)
    }

    #[tokio::test]
    async fn test_load_tls_config() {
        let result = load_tls_config(&testdata("tls.crt"), &testdata("tls.key")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_missing_certificate_reports_path() {
        let err = load_tls_config(&testdata("missing.crt"), &testdata("tls.key"))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("missing.crt"));
    }

    #[tokio::test]
    async fn test_certificate_without_key_rejected() {
        let result = load_tls_config(&testdata("tls.crt"), &testdata("tls.crt")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_resolve_listen_addr() {
        let addr = resolve("127.0.0.1:8443").await.unwrap();
        assert_eq!(addr.port(), 8443);
    }
}
