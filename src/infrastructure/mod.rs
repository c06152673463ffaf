//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `conf/` - `rose-suite.conf` syntax reader and writer
//! - `fs/` - File system implementations (Local, Memory)
//! - `repositories/` - Stored layer and optional config lookup

pub mod conf;
pub mod fs;
pub mod repositories;

// Re-export for convenience
pub use fs::{LocalFs, MemoryFs};
pub use repositories::{FileLayerStore, OptConfRepository};
