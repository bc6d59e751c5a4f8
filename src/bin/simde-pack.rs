//! simde-pack - build a SIMDe release archive
//!
//! Usage:
//!   simde-pack <VERSION> [--source DIR] [--output-dir DIR] [--git-hash HASH]

use anyhow::Result;
use clap::Parser;
use simde_pack::{build_package, output, PackageConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "simde-pack")]
#[command(about = "Package SIMDe headers into a zip archive with amalgamated includes")]
#[command(version)]
struct Cli {
    /// The version string to use (e.g., 0.8.4)
    #[arg(value_name = "VERSION")]
    release: String,

    /// The source directory containing SIMDe headers
    #[arg(short, long, env = "SIMDE_SOURCE", default_value = "simde")]
    source: PathBuf,

    /// The output directory for the archive
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Override the git hash embedded in the files (for testing/reproducibility)
    #[arg(long, env = "SIMDE_GIT_HASH")]
    git_hash: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = PackageConfig::new(cli.release)
        .with_source_dir(cli.source)
        .with_output_dir(cli.output_dir);
    if let Some(hash) = cli.git_hash {
        config = config.with_version_tag(hash);
    }

    let report = build_package(&config)?;

    if !report.skipped.is_empty() {
        output::info(&format!(
            "{} of {} headers missing from the source tree",
            report.skipped.len(),
            config.headers().len()
        ));
    }
    if !report.license_copied {
        output::info("No COPYING file found, archive has no license file");
    }
    output::success(&format!(
        "Successfully created {}",
        report.archive_path.display()
    ));
    output::detail(&format!("sha256 {}", report.sha256));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["simde-pack", "0.8.4"]).unwrap();
        assert_eq!(cli.release, "0.8.4");
        assert_eq!(cli.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "simde-pack",
            "1.0.0",
            "-s",
            "vendor/simde",
            "-o",
            "dist",
            "--git-hash",
            "cafebabe",
        ])
        .unwrap();
        assert_eq!(cli.source, PathBuf::from("vendor/simde"));
        assert_eq!(cli.output_dir, PathBuf::from("dist"));
        assert_eq!(cli.git_hash.as_deref(), Some("cafebabe"));
    }

    #[test]
    fn test_version_required() {
        let result = Cli::try_parse_from(["simde-pack"]);
        assert!(result.is_err());
    }
}
