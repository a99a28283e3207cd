//! Scene Graph Debug Overlay
//!
//! Optional visualization of node transforms and bounds. An overlay is
//! registered against graphs by their integer id and turns each registered
//! graph's derived transforms into line geometry. It only reads the graph;
//! nothing in the scene graph depends on it.

pub mod overlay;
pub mod vertex;

pub use overlay::*;
pub use vertex::*;

pub fn version() -> &'static str {
    "0.1.0"
}
