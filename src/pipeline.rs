//! Build driver: assembles the bundle in memory, then writes it out.
//!
//! The bundle is generated fully in memory before the output directory is
//! touched, so a failed build never leaves a partial or stale-looking file
//! behind.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use tracing::info;

use crate::assemble::assemble;
use crate::config::BundleConfig;
use crate::error::Result;
use crate::minify::minify;

/// Options for one build invocation
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Also write the regex-minified variant next to the standalone file
    pub minify: bool,
}

/// Summary of a completed build
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output_path: PathBuf,
    pub minified_path: Option<PathBuf>,
    pub bytes: u64,
    pub lines: usize,
    pub elapsed_ms: u128,
}

/// Run one full build: read, clean, assemble, write.
pub fn run_build(config: &BundleConfig, root: &Path, options: BuildOptions) -> Result<BuildReport> {
    let start = Instant::now();
    let build_date = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    // Assemble first; nothing is written if any module is missing
    let standalone = assemble(config, root, &build_date)?;

    let dist_path = root.join(&config.output_dir);
    std::fs::create_dir_all(&dist_path)?;

    let output_path = config.output_path(root);
    std::fs::write(&output_path, &standalone)?;

    let minified_path = if options.minify {
        let minified_path = config.minified_path(root);
        std::fs::write(&minified_path, minify(&standalone))?;
        Some(minified_path)
    } else {
        None
    };

    let report = BuildReport {
        output_path,
        minified_path,
        bytes: standalone.len() as u64,
        lines: standalone.lines().count(),
        elapsed_ms: start.elapsed().as_millis(),
    };

    info!(
        output = %report.output_path.display(),
        bytes = report.bytes,
        lines = report.lines,
        elapsed_ms = report.elapsed_ms,
        minified = report.minified_path.is_some(),
        "Build complete"
    );

    Ok(report)
}

/// Remove the output directory and everything in it.
pub fn clean(config: &BundleConfig, root: &Path) -> Result<()> {
    let dist_path = root.join(&config.output_dir);
    match std::fs::remove_dir_all(&dist_path) {
        Ok(()) => {
            info!(path = %dist_path.display(), "Cleaned output directory");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
