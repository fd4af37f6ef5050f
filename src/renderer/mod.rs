//! Rendering module
//!
//! The scene is drawn through the immediate-mode [`Canvas`] trait. The
//! [`ShapeBatch`] backend turns it into triangles for the WebGPU pipeline.

pub mod batch;
pub mod canvas;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use batch::{ShapeBatch, TextLabel};
pub use canvas::{Canvas, Color};
pub use pipeline::{RenderInitError, RenderState};
pub use scene::draw_scene;
