//! Zip archive writing
//!
//! Native Rust compression, no external tools needed.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;

/// Write every regular file under `root` into a deflate-compressed zip at
/// `archive_path`.
///
/// Entry names are the file paths relative to `base`, with `/` separators.
/// Files are visited in sorted order so repeated runs produce the same entry
/// order. Returns the number of entries written.
pub fn write_zip(root: &Path, base: &Path, archive_path: &Path) -> Result<usize> {
    let file = File::create(archive_path)
        .with_context(|| format!("cannot create {}", archive_path.display()))?;
    let mut zip = zip::ZipWriter::new(BufWriter::new(file));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut count = 0;
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("cannot walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let name = entry_name(path, base)?;

        zip.start_file(name.as_str(), options)
            .with_context(|| format!("zip entry error for {}", name))?;
        let mut input = BufReader::new(
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?,
        );
        std::io::copy(&mut input, &mut zip)
            .with_context(|| format!("write error for {}", name))?;
        count += 1;
    }

    zip.finish()
        .with_context(|| format!("cannot finish {}", archive_path.display()))?;
    Ok(count)
}

/// Archive entry name for `path`: relative to `base`, `/`-separated.
fn entry_name(path: &Path, base: &Path) -> Result<String> {
    let rel = path.strip_prefix(base).with_context(|| {
        format!("{} is outside {}", path.display(), base.display())
    })?;

    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

/// SHA-256 of a file as lowercase hex.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut reader = BufReader::new(
        File::open(path).with_context(|| format!("cannot open {}", path.display()))?,
    );
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("read error for {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
