//! Header amalgamation
//!
//! Flattens a header and every local `#include "..."` it can resolve into a
//! single stream. Each file is expanded at most once per run; the caller owns
//! the record of what has been emitted and threads it through the descent.
//!
//! Output shape for a file reached for the first time:
//!
//! ```text
//! /* AUTOMATICALLY GENERATED FILE, DO NOT MODIFY */
//! /* <version tag> */
//! /* :: Begin simde/x86/sse2.h :: */
//! ...body, with resolvable local includes replaced recursively...
//! /* :: End simde/x86/sse2.h :: */
//! ```
//!
//! A file reached again only produces the two banner lines.

use crate::core::fs_utils::{display_relative, file_identity};
use crate::core::output;
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// First banner line, written on every call.
pub const GENERATED_NOTICE: &str = "/* AUTOMATICALLY GENERATED FILE, DO NOT MODIFY */";

static LOCAL_INCLUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*#\s*include\s+"([^)]+)"\s*$"#).expect("include pattern is valid")
});

/// Path named by a local include directive, if `line` is exactly one.
///
/// Only double-quoted includes match, and nothing but whitespace may follow
/// the closing quote. Angle-bracket includes, commented-out directives and
/// directives with trailing comments are plain lines.
pub fn local_include(line: &str) -> Option<&str> {
    let content = line.trim_end_matches(['\r', '\n']);
    LOCAL_INCLUDE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Write the amalgamated form of `file` to `out`.
///
/// `already_included` holds the canonical paths expanded so far in this run
/// and is updated in place. `display_root` only affects the paths printed in
/// the begin/end markers. `version_tag` is stamped into the banner.
///
/// Unresolvable includes are kept verbatim. A file that cannot be opened is
/// reported inline in the output rather than as an error; errors writing to
/// `out` or reading an opened file are returned.
pub fn amalgamate<W: Write + ?Sized>(
    file: &Path,
    out: &mut W,
    already_included: &mut HashSet<PathBuf>,
    display_root: &Path,
    version_tag: &str,
) -> Result<()> {
    let identity = file_identity(file);

    writeln!(out, "{}", GENERATED_NOTICE)?;
    writeln!(out, "/* {} */", version_tag)?;

    if !already_included.insert(identity.clone()) {
        return Ok(());
    }

    let text = match std::fs::read(file) {
        Ok(bytes) => String::from_utf8(bytes)
            .with_context(|| format!("{} is not valid UTF-8", file.display()))?,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            output::warning(&format!(
                "Could not find file to amalgamate: {}",
                file.display()
            ));
            writeln!(out, "/* ERROR: Could not find file {} */", file.display())?;
            return Ok(());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("cannot read {}", file.display()));
        }
    };

    let including_dir = identity.parent().unwrap_or(Path::new(""));
    let rel_path = display_relative(&identity, display_root);

    writeln!(out, "/* :: Begin {} :: */", rel_path)?;
    for line in lines_with_endings(&text) {
        match local_include(line) {
            Some(target) => {
                let target_path = including_dir.join(target);
                if target_path.is_file() {
                    amalgamate(&target_path, out, already_included, display_root, version_tag)?;
                } else {
                    // System or external header.
                    out.write_all(line.as_bytes())?;
                }
            }
            None => out.write_all(line.as_bytes())?,
        }
    }
    writeln!(out, "/* :: End {} :: */", rel_path)?;

    Ok(())
}

/// Amalgamate `file` with a fresh record, returning the flattened text.
pub fn amalgamate_to_string(file: &Path, display_root: &Path, version_tag: &str) -> Result<String> {
    let mut out = Vec::new();
    let mut already_included = HashSet::new();
    amalgamate(file, &mut out, &mut already_included, display_root, version_tag)?;
    String::from_utf8(out).context("amalgamated output is not valid UTF-8")
}

/// Split `text` into lines, keeping each line's terminator.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. A final line without a
/// terminator is kept as-is.
fn lines_with_endings(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..=i]);
                start = i + 1;
            }
            b'\r' => {
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                lines.push(&text[start..=i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }

    lines
}
