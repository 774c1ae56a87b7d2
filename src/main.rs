use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use uibundle::config::BundleConfig;
use uibundle::error::ResultExt;
use uibundle::logging;
use uibundle::pipeline::{self, BuildOptions, BuildReport};
use uibundle::watcher::BuildWatcher;

/// Bundle the UIFramework Lua modules into a single standalone file
#[derive(Parser, Debug)]
#[command(name = "uibundle", version, about)]
struct Cli {
    /// Watch source files and rebuild on change
    #[arg(short, long, global = true)]
    watch: bool,

    /// Also write the minified variant
    #[arg(long, global = true)]
    minify: bool,

    /// Path to a JSON bundle config (defaults to the built-in module list)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Source root containing the module files
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// One-shot build (the default)
    Build,
    /// Remove the output directory
    Clean,
    /// Clean and build again
    Rebuild,
}

fn main() -> anyhow::Result<()> {
    let _guard = logging::init();
    let cli = Cli::parse();

    let config = BundleConfig::load(cli.config.as_deref()).context("loading bundle config")?;
    let options = BuildOptions { minify: cli.minify };
    let root = cli.root.clone();

    match cli.command {
        Some(Command::Clean) => {
            pipeline::clean(&config, &root).context("cleaning output directory")?;
            return Ok(());
        }
        Some(Command::Rebuild) => {
            pipeline::clean(&config, &root).context("cleaning output directory")?;
        }
        Some(Command::Build) | None => {}
    }

    if cli.watch {
        run_watch(&config, &root, options)?;
    } else {
        let report = pipeline::run_build(&config, &root, options).context("build failed")?;
        print_summary(&report);
    }

    Ok(())
}

/// Watch mode: initial build, then one full rebuild per change event.
fn run_watch(config: &BundleConfig, root: &Path, options: BuildOptions) -> anyhow::Result<()> {
    println!("Watch mode enabled. Watching for changes...");

    // Initial build; a failure is logged so the source can be fixed under watch
    if let Some(report) = pipeline::run_build(config, root, options).log_err() {
        print_summary(&report);
    }

    let (mut watcher, rx) = BuildWatcher::new();
    watcher
        .start(watch_roots(config, root))
        .context("starting file watcher")?;

    // Rebuilds are serial: the next event waits until this build finishes
    for event in rx {
        info!(event = ?event, "Rebuilding");
        match pipeline::run_build(config, root, options) {
            Ok(report) => print_summary(&report),
            Err(e) => error!(error = %e, "Rebuild failed"),
        }
    }

    Ok(())
}

/// Directories to watch: the source root's distinct module parent dirs.
fn watch_roots(config: &BundleConfig, root: &Path) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();
    for path in config.module_source_paths(root) {
        if let Some(parent) = path.parent() {
            let parent = parent.to_path_buf();
            if !roots.contains(&parent) {
                roots.push(parent);
            }
        }
    }
    roots
}

fn print_summary(report: &BuildReport) {
    let size_kb = report.bytes as f64 / 1024.0;

    println!();
    println!("Build complete!");
    println!();
    println!("  Output: {}", report.output_path.display());
    println!("  Size: {:.2} KB ({} lines)", size_kb, report.lines);
    println!("  Time: {}ms", report.elapsed_ms);
    if let Some(minified) = &report.minified_path {
        println!("  Minified: {}", minified.display());
    }
    println!();
    println!("Usage with executor:");
    println!();
    println!("  -- From URL:");
    println!("  local UIFramework = loadstring(game:HttpGet(\"YOUR_URL\"))()");
    println!();
    println!("  -- From local file:");
    println!("  local UIFramework = loadstring(readfile(\"UIFramework.lua\"))()");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_defaults() {
        let cli = Cli::parse_from(["uibundle"]);
        assert!(!cli.watch);
        assert!(!cli.minify);
        assert!(cli.config.is_none());
        assert!(cli.command.is_none());
        assert_eq!(cli.root, PathBuf::from("."));
    }

    #[test]
    fn test_cli_parses_watch_short_flag() {
        let cli = Cli::parse_from(["uibundle", "-w"]);
        assert!(cli.watch);
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::parse_from(["uibundle", "clean"]);
        assert!(matches!(cli.command, Some(Command::Clean)));
        let cli = Cli::parse_from(["uibundle", "rebuild", "--minify"]);
        assert!(matches!(cli.command, Some(Command::Rebuild)));
        assert!(cli.minify);
    }

    #[test]
    fn test_watch_roots_are_distinct() {
        let config = BundleConfig::default();
        let roots = watch_roots(&config, Path::new("/project"));
        assert_eq!(
            roots,
            vec![
                PathBuf::from("/project"),
                PathBuf::from("/project/Components")
            ]
        );
    }
}
