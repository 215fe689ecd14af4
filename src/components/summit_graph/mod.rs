//! Live summit graph: store, ribbon geometry and the SVG binding that keeps
//! them on screen.

mod color;
mod component;
mod dispatch;
mod error;
mod geometry;
mod render;
mod state;
mod surface;
mod types;

pub use component::{DEFAULT_SCALE, DEFAULT_SOCKET_URL, SummitGraph};
