mod component;
mod render;
mod state;
mod types;

pub use component::{MindMapCanvas, MindMapController};
pub use state::ForceLayout;
