//! tumblecube
//!
//! A small windowed demo that spins two colour cubes sharing one mesh. The
//! crate brings up a GPU device with a software-rasterizer fallback, runs a
//! redraw-driven render loop that survives surface loss, and exposes its
//! scene and camera types for offscreen rendering in tests.
//!
//! High-level modules
//! - `app`: window, event loop, and the per-frame cycle
//! - `camera`: camera types, controller and uniforms for view/projection
//! - `context`: central GPU and window context that owns device/queue
//! - `pipelines`: render pipeline builders and the cube shader
//! - `scene`: the shared cube mesh, the two objects, and the render pass
//! - `texture`: depth buffer creation
//! - `timer`: smoothed frame timing and frame rate measurement
//!

pub mod app;
pub mod camera;
pub mod context;
pub mod pipelines;
pub mod scene;
pub mod texture;
pub mod timer;

pub use app::run;
