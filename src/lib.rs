//! uibundle - single-file bundler for the UIFramework Lua component library
//!
//! Reads a hand-ordered list of Lua source modules, strips their
//! module-boundary statements, and concatenates them with banner comments
//! into one standalone file ready for direct `loadstring` consumption,
//! optionally emitting a regex-minified variant alongside.

pub mod assemble;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod logging;
pub mod minify;
pub mod pipeline;
pub mod watcher;
