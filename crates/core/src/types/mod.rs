//! Domain types shared by every cairn crate

pub mod activity;
pub mod edge;
pub mod ids;
pub mod node;

pub use activity::*;
pub use edge::*;
pub use ids::*;
pub use node::*;
