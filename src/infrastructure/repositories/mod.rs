//! Repository Implementations
//!
//! Concrete implementations of domain repository ports.

mod layer_store;
mod opt_conf;

pub use layer_store::{FileLayerStore, STORED_LAYER_HEADER};
pub use opt_conf::OptConfRepository;
