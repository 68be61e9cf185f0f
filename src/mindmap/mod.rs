//! Mind-map core: the tree, its layout hints, highlighting, the sidebar log and the
//! expansion controller. Nothing in here touches the DOM.

pub mod config;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod layout;
pub mod palette;
pub mod path;
pub mod placement;
pub mod sidebar;
pub mod store;
pub mod topic;
pub mod types;

pub use config::MindMapConfig;
pub use controller::{ExpansionController, MindMapState};
pub use error::{FetchError, MindMapError};
pub use fetch::{ContentSource, HttpContentSource};
pub use layout::{Easing, FitOptions, LayoutEngine};
pub use sidebar::{Section, SectionBody, Sidebar};
pub use store::GraphStore;
pub use types::{Node, NodeId, Point};
