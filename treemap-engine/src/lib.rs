//! FILENAME: treemap-engine/src/lib.rs
//! Treemap layout subsystem.
//!
//! Lays an aggregated pivot tree out as nested rectangles whose areas follow
//! each node's own value, and maps pointer positions back to nodes. Depends
//! on `pivot-engine` for the tree and on `records` for drill-down rows.
//!
//! Layers:
//! - `definition`: Serializable layout options (what the treemap IS)
//! - `view`: Layout rectangles for the renderer (WHAT we display)
//! - `engine`: Tiling and padding (HOW we calculate)
//! - `selection`: Hit testing and the selected-node snapshot
//! - `session`: Records -> tree -> rectangles pipeline with a selection

pub mod definition;
pub mod engine;
pub mod selection;
pub mod session;
pub mod view;

pub use definition::*;
pub use engine::{layout, layout_with};
pub use selection::{hit_test, resolve, resolve_region, Selection};
pub use session::TreemapSession;
pub use view::*;
