//! Canvas 2D rendering module
//!
//! Draws world snapshots each animation frame: sprites where a texture is
//! set, flat fills otherwise, outlines in wireframe mode.

pub mod canvas;

pub use canvas::CanvasRenderer;
