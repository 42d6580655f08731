pub mod catalog;
pub mod config;
pub mod error;
pub mod id;
pub mod layout;
pub mod model;
pub mod placement;
pub mod render;

pub use catalog::{KindTraits, SizeTarget, apply_size, create_element, palette};
pub use config::{BuilderConfig, LayoutConfig, UiIds};
pub use error::BuilderError;
pub use id::ElementId;
pub use layout::resolve_layout;
pub use model::*;
pub use placement::{Placement, drag_after_element};
pub use render::{RenderState, element_class, render_content, render_zone};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
