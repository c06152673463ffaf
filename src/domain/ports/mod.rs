//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod file_system;
pub mod layer_store;

pub use file_system::{FileSystem, FsError, FsResult};
pub use layer_store::{LayerStore, STORED_LAYER_PATH};
