use notify::{recommended_watcher, RecursiveMode, Result as NotifyResult, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use tracing::{info, warn};

/// Event emitted when a watched source file changes and the bundle must be rebuilt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildEvent {
    /// A specific source file was created, modified, or deleted
    Changed(PathBuf),
}

/// Check if a file path is a watchable Lua source file
fn is_lua_source_file(path: &Path) -> bool {
    // Skip hidden files
    if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
        if file_name.starts_with('.') {
            return false;
        }
    }

    matches!(path.extension().and_then(|ext| ext.to_str()), Some("lua"))
}

/// Watches the bundle source tree and emits a rebuild event per change.
///
/// Events are delivered over a plain mpsc channel and consumed serially by
/// the driver: one change, one full synchronous rebuild. No debouncing - a
/// build is fast enough that coalescing is not worth the complexity.
pub struct BuildWatcher {
    tx: Option<Sender<RebuildEvent>>,
    watcher_thread: Option<thread::JoinHandle<()>>,
}

impl BuildWatcher {
    /// Create a new BuildWatcher
    ///
    /// Returns a tuple of (watcher, receiver) where receiver will emit
    /// RebuildEvent when a watched source file changes.
    pub fn new() -> (Self, Receiver<RebuildEvent>) {
        let (tx, rx) = channel();
        let watcher = BuildWatcher {
            tx: Some(tx),
            watcher_thread: None,
        };
        (watcher, rx)
    }

    /// Start watching the given directories for changes
    ///
    /// Spawns a background thread that watches each directory recursively and
    /// sends rebuild events through the receiver when Lua sources change.
    pub fn start(&mut self, watch_paths: Vec<PathBuf>) -> NotifyResult<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| std::io::Error::other("watcher already started"))?;

        let thread_handle = thread::spawn(move || {
            if let Err(e) = Self::watch_loop(tx, watch_paths) {
                warn!(error = %e, watcher = "build", "Build watcher error");
            }
        });

        self.watcher_thread = Some(thread_handle);
        Ok(())
    }

    /// Internal watch loop running in background thread
    fn watch_loop(tx: Sender<RebuildEvent>, watch_paths: Vec<PathBuf>) -> NotifyResult<()> {
        // Channel for the file watcher thread
        let (watch_tx, watch_rx) = channel();

        // Create the watcher with a callback
        let mut watcher: Box<dyn Watcher> = Box::new(recommended_watcher(
            move |res: notify::Result<notify::Event>| {
                let _ = watch_tx.send(res);
            },
        )?);

        for path in &watch_paths {
            if path.exists() {
                watcher.watch(path, RecursiveMode::Recursive)?;
                info!(
                    path = %path.display(),
                    recursive = true,
                    "Build watcher started"
                );
            } else {
                warn!(path = %path.display(), "Watch path does not exist, skipping");
            }
        }

        // Main watch loop
        loop {
            match watch_rx.recv() {
                Ok(Ok(event)) => {
                    // Only care about Create, Modify, and Remove events
                    let is_relevant_event = matches!(
                        event.kind,
                        notify::EventKind::Create(_)
                            | notify::EventKind::Modify(_)
                            | notify::EventKind::Remove(_)
                    );
                    if !is_relevant_event {
                        continue;
                    }

                    for path in event.paths.iter() {
                        if !is_lua_source_file(path) {
                            continue;
                        }

                        info!(path = %path.display(), "Source file changed");
                        if tx.send(RebuildEvent::Changed(path.clone())).is_err() {
                            // Channel closed, exit watch loop
                            info!(watcher = "build", "Build watcher shutting down");
                            return Ok(());
                        }
                    }
                }
                Ok(Err(e)) => {
                    warn!(error = %e, watcher = "build", "File watcher error");
                }
                Err(_) => {
                    info!(watcher = "build", "Build watcher shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}

impl Drop for BuildWatcher {
    fn drop(&mut self) {
        if let Some(handle) = self.watcher_thread.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_watcher_creation() {
        let (_watcher, _rx) = BuildWatcher::new();
        // Watcher should be created without panicking
    }

    #[test]
    fn test_rebuild_event_clone_and_equality() {
        let path = PathBuf::from("/project/Components/Button.lua");
        let event = RebuildEvent::Changed(path.clone());
        assert_eq!(event.clone(), RebuildEvent::Changed(path));
    }

    #[test]
    fn test_is_lua_source_file() {
        assert!(is_lua_source_file(Path::new("/project/Theme.lua")));
        assert!(is_lua_source_file(Path::new(
            "/project/Components/Button.lua"
        )));
        assert!(!is_lua_source_file(Path::new("/project/build.js")));
        assert!(!is_lua_source_file(Path::new("/project/.hidden.lua")));
        assert!(!is_lua_source_file(Path::new("/project/README.md")));
    }

    #[test]
    fn test_watcher_emits_event_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Theme.lua");
        std::fs::write(&source, "local Theme = {}\nreturn Theme").unwrap();

        let (mut watcher, rx) = BuildWatcher::new();
        watcher.start(vec![dir.path().to_path_buf()]).unwrap();

        // Give the backend a moment to register the watch before mutating
        std::thread::sleep(std::time::Duration::from_millis(300));
        std::fs::write(&source, "local Theme = { Dark = true }\nreturn Theme").unwrap();

        let event = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("expected a rebuild event");
        let RebuildEvent::Changed(path) = event;
        assert_eq!(path.file_name().unwrap(), "Theme.lua");

        // Drop the receiver so the watcher thread unblocks and Drop can join
        drop(rx);
        std::fs::write(&source, "local Theme = {}\n").unwrap();
    }
}
