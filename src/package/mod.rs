//! Distribution packaging
//!
//! Amalgamates each configured top-level header into a staging tree, adds
//! the license, and compresses the tree into `simde-<version>.zip`.
//!
//! Layout under the output directory:
//!
//! ```text
//! simde-<version>/
//!     COPYING
//!     simde/arm/neon.h
//!     simde/x86/sse2.h
//!     ...
//! simde-<version>.zip
//! ```
//!
//! Every run starts from scratch: an existing staging directory or archive
//! is removed first.

pub mod archive;

use crate::amalgamate::amalgamate;
use crate::core::fs_utils::{copy_file, ensure_parent_dir, remove_existing};
use crate::core::line_ending::LineFeedWriter;
use crate::core::output;
use crate::core::revision::resolve_version_tag;
use anyhow::{Context, Result, bail};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Top-level headers shipped in the distribution.
///
/// Listed explicitly so stray files in the source tree (merge leftovers such
/// as `sse2_BACKUP_1234.h`) never end up in a release.
pub const HEADERS: &[&str] = &[
    "arm/neon.h",
    "arm/sve.h",
    "mips/msa.h",
    "wasm/relaxed-simd.h",
    "wasm/simd128.h",
    "x86/aes.h",
    "x86/avx.h",
    "x86/avx2.h",
    "x86/avx512.h",
    "x86/clmul.h",
    "x86/f16c.h",
    "x86/fma.h",
    "x86/gfni.h",
    "x86/mmx.h",
    "x86/sse.h",
    "x86/sse2.h",
    "x86/sse3.h",
    "x86/sse4.1.h",
    "x86/sse4.2.h",
    "x86/ssse3.h",
    "x86/svml.h",
    "x86/xop.h",
];

/// Default source directory, relative to the invocation directory.
pub const DEFAULT_SOURCE_DIR: &str = "simde";

/// License file copied into the staging root when present.
pub const LICENSE_FILE: &str = "COPYING";

/// Directory inside the staging root that holds the headers.
const HEADER_DIR: &str = "simde";

/// Settings for one packaging run
#[derive(Debug, Clone)]
pub struct PackageConfig {
    version: String,
    source_dir: PathBuf,
    output_dir: PathBuf,
    invocation_dir: Option<PathBuf>,
    version_tag: Option<String>,
    headers: Vec<String>,
}

impl PackageConfig {
    /// Configuration with defaults: `simde` sources, current directory output,
    /// revision discovered from git, the standard header list.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            output_dir: PathBuf::from("."),
            invocation_dir: None,
            version_tag: None,
            headers: HEADERS.iter().map(|h| h.to_string()).collect(),
        }
    }

    /// Directory containing the headers to amalgamate
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = dir.into();
        self
    }

    /// Directory receiving the staging tree and the archive
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Directory used for banner paths and the license lookup.
    /// Defaults to the process working directory.
    pub fn with_invocation_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.invocation_dir = Some(dir.into());
        self
    }

    /// Fixed stamp for generated banners instead of the git revision
    pub fn with_version_tag(mut self, tag: impl Into<String>) -> Self {
        self.version_tag = Some(tag.into());
        self
    }

    /// Replace the top-level header list
    pub fn with_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Name of the staging directory, `simde-<version>`
    pub fn staging_name(&self) -> String {
        format!("simde-{}", self.version)
    }

    /// Name of the archive, `simde-<version>.zip`
    pub fn archive_name(&self) -> String {
        format!("simde-{}.zip", self.version)
    }

    fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            bail!("Version cannot be empty");
        }
        if self.version.contains(['/', '\\']) || self.version == "." || self.version == ".." {
            bail!(
                "Invalid version '{}': must not contain path separators",
                self.version
            );
        }
        Ok(())
    }
}

/// What a packaging run produced
#[derive(Debug, Clone)]
pub struct PackageReport {
    pub staging_dir: PathBuf,
    pub archive_path: PathBuf,
    /// Headers amalgamated, in configured order
    pub written: Vec<String>,
    /// Headers missing from the source tree
    pub skipped: Vec<String>,
    pub license_copied: bool,
    /// Number of entries stored in the archive
    pub entries: usize,
    /// SHA-256 of the finished archive, hex encoded
    pub sha256: String,
}

/// Build the staging tree and archive described by `config`.
pub fn build_package(config: &PackageConfig) -> Result<PackageReport> {
    config.validate()?;

    let invocation_dir = match &config.invocation_dir {
        Some(dir) => std::path::absolute(dir)
            .with_context(|| format!("cannot resolve {}", dir.display()))?,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let source_dir = absolute_from(&invocation_dir, &config.source_dir);
    let output_dir = absolute_from(&invocation_dir, &config.output_dir);

    let staging_dir = output_dir.join(config.staging_name());
    let archive_path = output_dir.join(config.archive_name());
    let header_root = staging_dir.join(HEADER_DIR);

    if remove_existing(&staging_dir)? {
        output::detail(&format!("removed previous {}", staging_dir.display()));
    }
    if remove_existing(&archive_path)? {
        output::detail(&format!("removed previous {}", archive_path.display()));
    }
    std::fs::create_dir_all(&header_root)
        .with_context(|| format!("cannot create directory {}", header_root.display()))?;

    let version_tag = resolve_version_tag(config.version_tag.as_deref(), &source_dir);
    // Banner paths are computed from canonical file paths, so the root must be canonical too.
    let display_root =
        std::fs::canonicalize(&invocation_dir).unwrap_or_else(|_| invocation_dir.clone());

    output::action(&format!(
        "Amalgamating {} specific headers from '{}'...",
        config.headers.len(),
        source_dir.display()
    ));

    let mut written = Vec::new();
    let mut skipped = Vec::new();
    for rel_path in &config.headers {
        let source_path = source_dir.join(rel_path);
        let dest_path = header_root.join(rel_path);
        ensure_parent_dir(&dest_path)?;

        if !source_path.exists() {
            output::warning(&format!(
                "Source file '{}' not found. Skipping.",
                source_path.display()
            ));
            skipped.push(rel_path.clone());
            continue;
        }

        write_amalgamated(&source_path, &dest_path, &display_root, &version_tag)?;
        output::detail(rel_path);
        written.push(rel_path.clone());
    }

    let license = invocation_dir.join(LICENSE_FILE);
    let license_copied = license.is_file();
    if license_copied {
        copy_file(&license, &staging_dir.join(LICENSE_FILE))?;
    }

    output::action(&format!("Creating archive {}...", archive_path.display()));
    let entries = {
        let _spinner = output::SpinnerGuard::new("compressing");
        archive::write_zip(&staging_dir, &output_dir, &archive_path)?
    };
    let sha256 = archive::sha256_file(&archive_path)?;

    Ok(PackageReport {
        staging_dir,
        archive_path,
        written,
        skipped,
        license_copied,
        entries,
        sha256,
    })
}

/// Amalgamate one top-level header into `dest` with `\n` line endings.
///
/// Each call starts a fresh inclusion record so every output is self-contained.
fn write_amalgamated(
    source: &Path,
    dest: &Path,
    display_root: &Path,
    version_tag: &str,
) -> Result<()> {
    let file =
        File::create(dest).with_context(|| format!("cannot create {}", dest.display()))?;
    let mut out = LineFeedWriter::new(BufWriter::new(file));
    let mut already_included = HashSet::new();

    amalgamate(source, &mut out, &mut already_included, display_root, version_tag)
        .with_context(|| format!("cannot amalgamate {}", source.display()))?;

    out.finish()
        .with_context(|| format!("cannot write {}", dest.display()))?;
    Ok(())
}

fn absolute_from(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
