use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tar::{Archive, Builder};

use crate::error::BundleError;

/// Build an in-memory gzip tar containing `names`, resolved against `root`.
///
/// Entry names equal the workspace-relative names passed in, preserving any
/// subdirectory structure. A name that no longer resolves to a readable file
/// fails loudly rather than being dropped from the bundle. An empty name
/// list produces a valid archive with zero entries.
pub fn write_bundle(root: &Path, names: &[String]) -> Result<Vec<u8>, BundleError> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut archive = Builder::new(encoder);

    for name in names {
        let path = root.join(name);
        let mut content = Vec::new();
        File::open(&path)
            .and_then(|mut f| f.read_to_end(&mut content))
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => BundleError::MissingEntry(name.clone()),
                _ => BundleError::Io(e),
            })?;
        append_entry(&mut archive, name, &content)?;
    }

    let encoder = archive.into_inner()?;
    Ok(encoder.finish()?)
}

/// Add one file to the tar from bytes.
fn append_entry<W: Write>(
    archive: &mut Builder<W>,
    name: &str,
    content: &[u8],
) -> std::io::Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(0); // Reproducible output
    header.set_cksum();
    archive.append_data(&mut header, name, content)
}

/// List a bundle's entries as (name, content) pairs, in archive order.
pub fn read_bundle_entries(bytes: &[u8]) -> Result<Vec<(String, Vec<u8>)>, BundleError> {
    let decoder = GzDecoder::new(bytes);
    let mut archive = Archive::new(decoder);

    let mut entries = Vec::new();
    for entry in archive.entries()? {
        let mut entry = entry?;
        let name = entry.path()?.to_string_lossy().into_owned();
        let mut content = Vec::new();
        entry.read_to_end(&mut content)?;
        entries.push((name, content));
    }
    Ok(entries)
}
