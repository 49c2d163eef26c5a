//! Mission topology and the entity store

pub mod area;
pub mod connection;
pub mod graph;
pub mod store;

pub use area::{Area, Rect};
pub use connection::{Connection, ConnectionKind, ConnectionSide, ConnectionSpec, ConnectionView};
pub use graph::AreaGraph;
pub use store::World;
