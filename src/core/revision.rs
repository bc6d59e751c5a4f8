//! Source tree revision discovery
//!
//! The revision is stamped into every generated banner. Discovery is best
//! effort: anything that goes wrong yields [`UNKNOWN_REVISION`].

use std::path::Path;
use std::process::{Command, Stdio};

/// Stamp used when the revision cannot be determined.
pub const UNKNOWN_REVISION: &str = "unknown";

/// Current `HEAD` commit of the git checkout containing `source_dir`.
///
/// Returns [`UNKNOWN_REVISION`] if git is missing, the directory is not
/// inside a repository, or the output is unusable.
pub fn revision_id(source_dir: &Path) -> String {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(source_dir)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();

    match output {
        Ok(out) if out.status.success() => match String::from_utf8(out.stdout) {
            Ok(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => UNKNOWN_REVISION.to_string(),
        },
        _ => UNKNOWN_REVISION.to_string(),
    }
}

/// Version tag for generated banners: the explicit override if given,
/// otherwise the discovered revision.
pub fn resolve_version_tag(override_tag: Option<&str>, source_dir: &Path) -> String {
    match override_tag {
        Some(tag) => tag.to_string(),
        None => revision_id(source_dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_directory_is_unknown() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("does-not-exist");
        assert_eq!(revision_id(&missing), UNKNOWN_REVISION);
    }

    #[test]
    fn test_override_wins() {
        let temp = tempdir().unwrap();
        assert_eq!(resolve_version_tag(Some("deadbeef"), temp.path()), "deadbeef");
    }

    #[test]
    fn test_never_empty() {
        // Either a real hash (if the temp dir sits inside a checkout) or the fallback.
        let temp = tempdir().unwrap();
        assert!(!resolve_version_tag(None, temp.path()).is_empty());
    }
}
