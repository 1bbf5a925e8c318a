//! Per-request pipeline: receive, build, collect, package, respond.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Method, Request, Response};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::build;
use crate::collect;
use crate::config::Config;
use crate::response;
use crate::upload;
use crate::workspace::Workspace;

/// Failures inside one request's pipeline.
///
/// Every variant maps to an HTTP response; nothing propagates past the
/// connection task, so one failed request never takes the listener down.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing or invalid Content-Length, the 411 path.
    #[error("request declared no valid content length")]
    MissingLength,

    /// The build exited nonzero or was killed; carries its diagnostics.
    #[error("build command failed")]
    BuildFailed { stderr: Vec<u8> },

    /// Workspace directory could not be created.
    #[error("workspace setup failed: {0}")]
    Workspace(#[source] std::io::Error),

    /// The upload could not be written into the workspace.
    #[error("upload failed: {0}")]
    Upload(#[source] std::io::Error),

    /// The build process could not be spawned or awaited.
    #[error("build could not be run: {0}")]
    Spawn(#[source] std::io::Error),

    /// The workspace could not be listed for collection.
    #[error("output collection failed: {0}")]
    Collect(#[source] std::io::Error),

    /// The bundle could not be assembled.
    #[error("packaging failed: {0}")]
    Package(#[from] forgeron_bundle::BundleError),
}

/// Handle one HTTP exchange.
///
/// `PUT` enters the build pipeline; every other method gets an empty 404,
/// since the service exposes no retrievable resources.
pub async fn handle_request(
    config: Arc<Config>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let resp = if req.method() == Method::PUT {
        run_pipeline(&config, req)
            .await
            .unwrap_or_else(error_response)
    } else {
        response::not_found()
    };

    tracing::info!(
        method = %method,
        path = %path,
        status = resp.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request completed"
    );

    Ok(resp)
}

/// Run the pipeline inside a workspace scope.
///
/// The workspace is released after the response is decided, on every exit
/// path; a panic unwinding through the pipeline still removes it via the
/// guard's drop.
async fn run_pipeline(
    config: &Config,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, PipelineError> {
    let workspace = Workspace::create().map_err(PipelineError::Workspace)?;
    let result = build_and_package(config, req, &workspace).await;
    workspace.close();
    result
}

/// The sequential pipeline body: upload, build, collect, package.
async fn build_and_package(
    config: &Config,
    req: Request<Incoming>,
    workspace: &Workspace,
) -> Result<Response<Full<Bytes>>, PipelineError> {
    let (parts, body) = req.into_parts();

    let Some(length) = upload::declared_length(&parts.headers) else {
        return Err(PipelineError::MissingLength);
    };

    // The final path segment names the uploaded file, taken literally;
    // existing clients may rely on it. A segment cannot contain '/', so the
    // write stays inside the workspace; degenerate names fail the create.
    let target = parts
        .uri
        .path()
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string();
    let dest = workspace.path().join(&target);

    upload::receive_into(body, length, &dest)
        .await
        .map_err(PipelineError::Upload)?;

    let outcome = build::run_build(&config.build_file, workspace.path(), config.build_timeout)
        .await
        .map_err(PipelineError::Spawn)?;

    if !outcome.success() {
        tracing::warn!(exit_code = ?outcome.exit_code, target = %target, "build failed");
        return Err(PipelineError::BuildFailed {
            stderr: outcome.stderr,
        });
    }

    let accept = parts
        .headers
        .get(hyper::header::ACCEPT)
        .and_then(|v| v.to_str().ok());
    let patterns = collect::output_patterns(&config.output_patterns, accept);
    let outputs =
        collect::resolve_outputs(workspace.path(), &patterns).map_err(PipelineError::Collect)?;

    let bundle = forgeron_bundle::write_bundle(workspace.path(), &outputs)?;

    let mut hasher = Sha256::new();
    hasher.update(&bundle);
    tracing::info!(
        target = %target,
        entries = outputs.len(),
        bundle_sha256 = %hex::encode(hasher.finalize()),
        "build succeeded"
    );

    Ok(response::created(bundle))
}

/// Map a pipeline failure onto its response shape.
fn error_response(error: PipelineError) -> Response<Full<Bytes>> {
    match error {
        PipelineError::MissingLength => response::length_required(),
        PipelineError::BuildFailed { stderr } => response::build_failed(stderr),
        other => {
            tracing::error!(error = %other, "request pipeline failed");
            response::internal_error()
        }
    }
}
