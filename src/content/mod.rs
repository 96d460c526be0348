//! # Content Module
//!
//! Learning content as seen by the search subsystem: the data model, the
//! snapshot store that publishes it, and a file-based loader.

pub mod loader;
pub mod store;
pub mod types;

pub use loader::ContentLoader;
pub use store::{ContentStore, ModuleSnapshot};
pub use types::{CodeExample, Difficulty, Exercise, Module, Section};
