//! Upload reception: Content-Length validation and bounded body copy.

use std::path::Path;

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::header::{HeaderMap, CONTENT_LENGTH};
use tokio::io::AsyncWriteExt;

/// Declared request body length.
///
/// `None` when the header is absent or not a valid non-negative integer,
/// which is the 411 path. A literal `0` is a valid declaration and proceeds
/// to the build like any other upload.
pub fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Copy exactly `len` bytes of `body` into a file at `dest`.
///
/// Frames are written as they arrive, so a large declared length never
/// forces one oversized allocation. Surplus bytes past `len` are dropped
/// without being written; a body that ends early is an error, because the
/// build step relies on the file size matching the declaration.
pub async fn receive_into<B>(mut body: B, len: u64, dest: &Path) -> std::io::Result<()>
where
    B: hyper::body::Body<Data = Bytes> + Unpin,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let mut file = tokio::fs::File::create(dest).await?;
    let mut written: u64 = 0;

    while written < len {
        let frame = match body.frame().await {
            Some(frame) => frame.map_err(|e| {
                let e: Box<dyn std::error::Error + Send + Sync> = e.into();
                std::io::Error::new(std::io::ErrorKind::Other, e)
            })?,
            None => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("request body ended after {written} of {len} bytes"),
                ));
            }
        };

        let Some(data) = frame.data_ref() else {
            continue; // trailers carry no body bytes
        };
        let take = ((len - written) as usize).min(data.len());
        file.write_all(&data[..take]).await?;
        written += take as u64;
    }

    file.flush().await?;
    Ok(())
}
