//! Domain layer: the balanced word tree
//!
//! This layer is independent of external concerns (no filesystem, no CLI, no config loading).
//! Storage works on any `BufRead` / `Write` stream.

pub mod error;
pub mod node;
pub mod render;
pub mod tree;

pub use error::{DomainError, DomainResult};
pub use node::Node;
pub use render::TreeRender;
pub use tree::{Iter, WordTree};
