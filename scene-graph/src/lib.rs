//! 2D Scene Graph - transform hierarchy
//!
//! A tree of nodes composing position, rotation and scale, caching the
//! resolved world-space ("derived") transform of each node and invalidating
//! whole subtrees cheaply when an ancestor changes.
//!
//! Key design points:
//! - Arena-based node storage (slotmap), parent links are plain keys
//! - Per-graph pending-update queue, drained once per frame
//! - One composition rule shared by eager updates and on-demand queries
//! - Drawables are borrowed through `Arc<RwLock<dyn Drawable>>`

pub mod bounds;
pub mod config;
pub mod drawable;
pub mod error;
pub mod graph;
pub mod node;
pub mod render;
pub mod shapes;
pub mod transform;
pub mod types;

pub use bounds::*;
pub use config::*;
pub use drawable::*;
pub use error::*;
pub use graph::*;
pub use node::*;
pub use render::*;
pub use shapes::*;
pub use transform::*;
pub use types::*;

pub fn version() -> &'static str {
    "0.1.0"
}
