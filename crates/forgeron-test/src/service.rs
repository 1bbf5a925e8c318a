//! End-to-end tests for the forgeron service.
//!
//! Each test boots the built binary with its own makefile and drives it
//! over HTTP. Requires the `forgeron` binary to be built first
//! (`cargo build -p forgeron`) and `make` on the PATH.

use forgeron_bundle::read_bundle_entries;

use crate::TestForge;

const COPY_MAKEFILE: &str = "out.txt: input.txt\n\tcp input.txt out.txt\n";

#[tokio::test]
async fn upload_and_build_returns_archive() {
    let forge = TestForge::start(COPY_MAKEFILE, &["out.txt"])
        .await
        .expect("failed to start forgeron");

    let resp = forge.put("/input.txt", b"hello forge".to_vec()).await.unwrap();
    assert_eq!(resp.status(), 201);
    assert_eq!(resp.headers()["content-type"], "application/gzip");

    let body = resp.bytes().await.unwrap();
    let entries = read_bundle_entries(&body).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "out.txt");
    assert_eq!(entries[0].1, b"hello forge");
}

#[tokio::test]
async fn nested_path_stages_final_segment() {
    let forge = TestForge::start(COPY_MAKEFILE, &["out.txt"])
        .await
        .expect("failed to start forgeron");

    let resp = forge
        .put("/builds/2026/input.txt", b"nested".to_vec())
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let body = resp.bytes().await.unwrap();
    let entries = read_bundle_entries(&body).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].1, b"nested");
}

#[tokio::test]
async fn missing_content_length_is_411() {
    let forge = TestForge::start(COPY_MAKEFILE, &["out.txt"])
        .await
        .expect("failed to start forgeron");

    let resp = forge.put_chunked("/input.txt", b"no length").await.unwrap();
    assert_eq!(resp.status(), 411);
    let text = resp.text().await.unwrap();
    assert!(text.contains("empty"));

    // The listener survives the rejected request.
    let resp = forge.put("/input.txt", b"after".to_vec()).await.unwrap();
    assert_eq!(resp.status(), 201);
}

#[tokio::test]
async fn failing_build_returns_stderr() {
    let forge = TestForge::start("all:\n\t@echo boom >&2; exit 2\n", &[])
        .await
        .expect("failed to start forgeron");

    let resp = forge.put("/input.txt", b"x".to_vec()).await.unwrap();
    assert_eq!(resp.status(), 500);

    let body = resp.text().await.unwrap();
    assert!(body.contains("boom"), "diagnostics missing from body: {body:?}");
    // make reports the failing recipe on stderr too, and the body is the
    // captured stream verbatim.
    assert!(body.contains("Error"), "make diagnostics missing: {body:?}");
}

#[tokio::test]
async fn other_methods_are_404_with_empty_body() {
    let forge = TestForge::start(COPY_MAKEFILE, &["out.txt"])
        .await
        .expect("failed to start forgeron");

    for method in [
        reqwest::Method::GET,
        reqwest::Method::POST,
        reqwest::Method::DELETE,
        reqwest::Method::HEAD,
    ] {
        let resp = forge.request(method.clone(), "/input.txt").await.unwrap();
        assert_eq!(resp.status(), 404, "method {method} should be unmapped");
        assert!(resp.bytes().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn zero_length_upload_builds_normally() {
    let makefile = "all: input.txt\n\t@wc -c < input.txt > size.txt\n";
    let forge = TestForge::start(makefile, &["size.txt"])
        .await
        .expect("failed to start forgeron");

    let resp = forge.put("/input.txt", Vec::new()).await.unwrap();
    assert_eq!(resp.status(), 201);

    let body = resp.bytes().await.unwrap();
    let entries = read_bundle_entries(&body).unwrap();
    assert_eq!(entries.len(), 1);
    let size = String::from_utf8_lossy(&entries[0].1);
    assert_eq!(size.trim(), "0");
}

#[tokio::test]
async fn accept_header_extends_output_patterns() {
    let makefile = "all: input.txt\n\
                    \t@echo pdf > report.pdf\n\
                    \t@echo png > chart.png\n\
                    \t@echo txt > notes.txt\n";
    let forge = TestForge::start(makefile, &["*.pdf"])
        .await
        .expect("failed to start forgeron");

    let resp = forge
        .put_with_accept("/input.txt", b"x".to_vec(), "image/png")
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let body = resp.bytes().await.unwrap();
    let entries = read_bundle_entries(&body).unwrap();
    let mut names: Vec<_> = entries.iter().map(|(name, _)| name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["chart.png", "report.pdf"]);
}

#[tokio::test]
async fn sequential_uploads_get_fresh_workspaces() {
    // Appending would accumulate lines if a workspace were ever reused.
    let makefile = "all: input.txt\n\t@echo marker >> log.txt\n";
    let forge = TestForge::start(makefile, &["log.txt"])
        .await
        .expect("failed to start forgeron");

    let first = forge.put("/input.txt", b"one".to_vec()).await.unwrap();
    assert_eq!(first.status(), 201);

    let second = forge.put("/input.txt", b"two".to_vec()).await.unwrap();
    assert_eq!(second.status(), 201);

    let body = second.bytes().await.unwrap();
    let entries = read_bundle_entries(&body).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].1, b"marker\n");
}

#[tokio::test]
async fn no_patterns_yields_empty_archive() {
    let forge = TestForge::start(COPY_MAKEFILE, &[])
        .await
        .expect("failed to start forgeron");

    let resp = forge.put("/input.txt", b"hello".to_vec()).await.unwrap();
    assert_eq!(resp.status(), 201);

    let body = resp.bytes().await.unwrap();
    let entries = read_bundle_entries(&body).unwrap();
    assert!(entries.is_empty());
}
