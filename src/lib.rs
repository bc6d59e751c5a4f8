//! SIMDe distribution packager
//!
//! Builds a release of the SIMDe headers in which every top-level header is
//! self-contained: each local `#include "..."` the packager can resolve is
//! replaced by the included file's content, recursively, with begin/end
//! markers around every inlined file.
//!
//! # Example
//!
//! ```no_run
//! use simde_pack::package::{build_package, PackageConfig};
//!
//! let config = PackageConfig::new("0.8.4")
//!     .with_source_dir("simde")
//!     .with_output_dir("dist");
//! let report = build_package(&config)?;
//! println!("{} ({})", report.archive_path.display(), report.sha256);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # Output Layout
//!
//! - `simde-<version>/simde/<arch>/<header>.h` - amalgamated headers
//! - `simde-<version>/COPYING` - license, when present in the invocation directory
//! - `simde-<version>.zip` - deflate-compressed archive of the tree above

pub mod amalgamate;
pub mod core;
pub mod package;

pub use crate::amalgamate::{amalgamate, amalgamate_to_string};
pub use crate::core::output;
pub use crate::package::{PackageConfig, PackageReport, build_package};
