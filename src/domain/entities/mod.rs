//! Domain Entities
//!
//! - `ConfigNode` - The recursive config tree read from `rose-suite.conf`
//! - `OverrideLayer` - Ordered assignments from one origin

mod layer;
mod node;

pub use layer::{
    Assignment, AssignmentValue, LayerOrigin, LeafValue, OverrideLayer, SectionTarget,
};
pub use node::{ConfigNode, Leaf, Walk, WalkEntry};
