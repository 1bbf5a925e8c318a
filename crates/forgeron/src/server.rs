//! Accept loop: bind, serve, dispatch.

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::handler;

/// Bind `addr` and serve until the process exits.
///
/// Each accepted connection runs on its own task. The handler shares only
/// the immutable configuration, so requests never contend with each other;
/// every request builds in its own workspace.
pub async fn run(addr: SocketAddr, config: Arc<Config>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        addr = %addr,
        build_file = %config.build_file.display(),
        output_patterns = ?config.output_patterns,
        "forgeron listening"
    );

    loop {
        let (stream, _) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!(error = %e, "accept failed");
                continue;
            }
        };

        let config = Arc::clone(&config);
        let io = TokioIo::new(stream);

        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let config = Arc::clone(&config);
                handler::handle_request(config, req)
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                tracing::debug!(error = %e, "connection error");
            }
        });
    }
}
