//! Conventional media-type-to-extension lookup.
//!
//! The collector turns each acceptable media type into one `*.<ext>` output
//! pattern per conventional extension; this module supplies the table. The
//! table is closed: a media type it does not know contributes no patterns.

/// Conventional file extensions by media type.
const EXTENSIONS: &[(&str, &[&str])] = &[
    ("application/gzip", &["gz"]),
    ("application/json", &["json"]),
    ("application/octet-stream", &["bin"]),
    ("application/pdf", &["pdf"]),
    ("application/postscript", &["ps", "eps", "ai"]),
    ("application/x-tar", &["tar"]),
    ("application/zip", &["zip"]),
    ("image/gif", &["gif"]),
    ("image/jpeg", &["jpg", "jpeg", "jpe"]),
    ("image/png", &["png"]),
    ("image/svg+xml", &["svg"]),
    ("image/tiff", &["tiff", "tif"]),
    ("text/css", &["css"]),
    ("text/csv", &["csv"]),
    ("text/html", &["html", "htm"]),
    ("text/markdown", &["md", "markdown"]),
    ("text/plain", &["txt"]),
    ("text/xml", &["xml"]),
];

/// Conventional extensions for a media type; empty when unmapped.
pub fn extensions_for(media_type: &str) -> &'static [&'static str] {
    EXTENSIONS
        .iter()
        .find(|(mt, _)| mt.eq_ignore_ascii_case(media_type))
        .map(|(_, exts)| *exts)
        .unwrap_or(&[])
}

/// Strip `;` parameters and surrounding whitespace from one Accept list item.
pub fn strip_parameters(value: &str) -> &str {
    value.split(';').next().unwrap_or(value).trim()
}
