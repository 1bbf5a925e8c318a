//! Output collection: pattern union and workspace matching.

use std::path::Path;

use glob::Pattern;

use forgeron_bundle::media;

/// Union of explicit patterns and patterns derived from the Accept header.
///
/// Explicit patterns come first, in configuration order. Each acceptable
/// media type (comma-separated, `;` parameters ignored) then contributes
/// one `*.<ext>` pattern per conventional extension.
pub fn output_patterns(explicit: &[String], accept: Option<&str>) -> Vec<String> {
    let mut patterns = explicit.to_vec();

    if let Some(accept) = accept {
        for item in accept.split(',') {
            let media_type = media::strip_parameters(item);
            for ext in media::extensions_for(media_type) {
                patterns.push(format!("*.{ext}"));
            }
        }
    }

    patterns
}

/// Resolve patterns against the workspace's top-level regular files.
///
/// Matching is by file name with the workspace as the pattern root, so a
/// pattern can never select anything outside it. Result order follows
/// pattern order (names sorted within one pattern); a name matched by two
/// patterns appears twice. Unmatched patterns contribute nothing, and an
/// empty result is valid.
pub fn resolve_outputs(workspace: &Path, patterns: &[String]) -> std::io::Result<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    for entry in std::fs::read_dir(workspace)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    names.sort();

    let mut selected = Vec::new();
    for pattern in patterns {
        let Ok(pattern) = Pattern::new(pattern) else {
            tracing::debug!(pattern = %pattern, "ignoring unparsable output pattern");
            continue;
        };
        for name in &names {
            if pattern.matches(name) {
                selected.push(name.clone());
            }
        }
    }
    Ok(selected)
}
