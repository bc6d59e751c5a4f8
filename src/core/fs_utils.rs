//! Common filesystem utilities
//!
//! Shared path handling for the amalgamator and the package builder.

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

/// Ensure a file's parent directory exists.
///
/// Creates the parent directory (and all ancestors) if it doesn't exist.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Remove a file or directory tree if something exists at `path`.
///
/// Returns true if anything was removed.
pub fn remove_existing(path: &Path) -> Result<bool> {
    let md = match std::fs::symlink_metadata(path) {
        Ok(md) => md,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(e).with_context(|| format!("cannot inspect {}", path.display()));
        }
    };

    if md.is_dir() {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("cannot remove directory {}", path.display()))?;
    } else {
        std::fs::remove_file(path)
            .with_context(|| format!("cannot remove file {}", path.display()))?;
    }
    Ok(true)
}

/// Absolute identity of a file, used to detect repeated inclusion.
///
/// Symlinks and `..` segments are resolved by the filesystem. A path that
/// can no longer be canonicalized falls back to its lexical absolute form.
pub fn file_identity(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        normalize_lexical(&absolute)
    })
}

/// Lexically normalize a path (no filesystem access).
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    let mut has_root = false;

    for c in path.components() {
        match c {
            Component::Prefix(p) => {
                out.clear();
                out.push(p.as_os_str());
                has_root = true;
            }
            Component::RootDir => {
                out.push(Component::RootDir.as_os_str());
                has_root = true;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = out
                    .components()
                    .next_back()
                    .is_some_and(|last| matches!(last, Component::Normal(_)));
                if popped {
                    out.pop();
                } else if !has_root {
                    // Preserve leading ".." for relative paths.
                    out.push("..");
                }
            }
            Component::Normal(seg) => out.push(seg),
        }
    }

    out
}

/// Path of `path` relative to `base`, joined with forward slashes.
///
/// Walks up out of `base` with `..` segments when `path` is not below it.
/// Falls back to the full path when the two share no root (different drives).
pub fn display_relative(path: &Path, base: &Path) -> String {
    let path = normalize_lexical(path);
    let base = normalize_lexical(base);

    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();

    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let shares_root = match (path_parts.first(), base_parts.first()) {
        (Some(Component::Prefix(a)), Some(Component::Prefix(b))) => a == b,
        (Some(Component::Prefix(_)), _) | (_, Some(Component::Prefix(_))) => false,
        _ => true,
    };
    if !shares_root {
        return join_forward(path_parts.iter().map(|c| c.as_os_str().to_string_lossy()));
    }

    let ups = base_parts[common..]
        .iter()
        .filter(|c| matches!(c, Component::Normal(_)))
        .map(|_| Cow::Borrowed(".."));
    let rest = path_parts[common..]
        .iter()
        .map(|c| c.as_os_str().to_string_lossy());

    let joined = join_forward(ups.chain(rest));
    if joined.is_empty() { ".".to_string() } else { joined }
}

fn join_forward<'a>(parts: impl Iterator<Item = Cow<'a, str>>) -> String {
    let mut out = String::new();
    for part in parts {
        if part == "/" || part == "\\" {
            // Root component: keep a single leading slash.
            out.push('/');
            continue;
        }
        if !out.is_empty() && !out.ends_with('/') {
            out.push('/');
        }
        out.push_str(&part.replace('\\', "/"));
    }
    out
}

/// Copy a file, creating parent directories as needed.
pub fn copy_file(src: &Path, dest: &Path) -> Result<u64> {
    ensure_parent_dir(dest)?;
    std::fs::copy(src, dest)
        .with_context(|| format!("copy failed: {} -> {}", src.display(), dest.display()))
}
