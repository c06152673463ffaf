//! Domain Layer
//!
//! The merge engine itself: pure logic over config trees, no I/O.
//!
//! ## Structure
//!
//! - `entities/` - Config tree and override layers
//! - `value_objects/` - Ignore states, section names, typed values
//! - `services/` - Parser, merger, projector, literal reader
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system directly
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
