//! Force-directed co-authorship network component.
//!
//! Renders an interactive collaboration network on an HTML canvas with:
//! - A cooling force layout (links, Barnes-Hut charge, centering, collision)
//! - Node dragging with pinning, click callbacks, pan and zoom
//! - Hover tooltips and smooth enlarge-on-hover transitions
//! - Radius by paper count, line width by collaboration weight
//!
//! # Example
//!
//! ```ignore
//! use coauthor_graph::{GraphData, NetworkGraph};
//!
//! let data = RwSignal::new(Some(GraphData::default()));
//! let on_click = Callback::new(|id: String| log::info!("clicked {id}"));
//!
//! view! { <NetworkGraph data=data on_node_click=on_click height=600.0 /> }
//! ```

mod component;
mod error;
pub mod interaction;
pub mod quadtree;
mod render;
pub mod scale;
pub mod simulation;
pub mod state;
pub mod theme;
pub mod tooltip;
pub mod types;

pub use component::NetworkGraph;
pub use error::GraphError;
pub use simulation::{Simulation, SimulationConfig};
pub use theme::Theme;
pub use types::{GraphData, GraphLink, GraphNode, NetworkPayload, NetworkSummary};
