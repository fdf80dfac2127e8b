//! Synchronization core: resolve mappings, preview differences, and copy.
//!
//! - **[`mapping`]**: mapping records and categories
//! - **[`resolve`]**: pure mapping to absolute path resolution
//! - **[`diff`]**: read-only comparison of a source with its destination
//! - **[`copy`]**: materialization of sources at their destinations
//!
//! Nothing here parses configuration or talks to the user; callers pass
//! in already-loaded [`Mapping`]s and explicit options.

pub mod copy;
pub mod diff;
pub mod fs;
pub mod mapping;
pub mod resolve;

pub use copy::{CopyEngine, CopyOptions};
pub use diff::{Change, DiffResult, DiffStatus, compare};
pub use mapping::{Category, Mapping};
pub use resolve::{PathResolver, ResolvedPaths};
