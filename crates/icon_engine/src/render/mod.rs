//! # Rendering System
//!
//! Software rendering of icon instances. Everything a render needs lives in a
//! session-scoped [`RenderContext`]; individual renders borrow it mutably.
//!
//! ## Architecture
//!
//! - **Camera**: framing of bounds into an orthographic view ([`camera`])
//! - **Context**: camera, lighting rig, target pool and instance registry ([`context`])
//! - **Rasterizer**: depth-tested triangle fill with Lambert key lighting ([`rasterizer`])
//! - **Renderer**: one instance in, one [`PixelBuffer`] out ([`renderer`])
//!
//! ## Coordinate System
//!
//! Right-handed and Y-up. Cameras and lights look along their local -Z. View
//! depth maps to `[0, 1]`, and pixel rows run top to bottom.

pub mod camera;
pub mod context;
pub mod lighting;
pub mod material;
pub mod mesh;
pub mod pixel_buffer;
pub mod rasterizer;
pub mod renderer;
pub mod target;

pub use camera::{Camera, CameraFramer, CameraPlacement, RenderSettings, SettingsError};
pub use context::{ContextStats, InstanceScope, RenderContext};
pub use lighting::{Light, LightingEnvironment};
pub use material::Material;
pub use mesh::{Mesh, MeshError, Vertex};
pub use pixel_buffer::{EncodeError, PixelBuffer};
pub use renderer::{OffscreenRenderer, RenderError};
pub use target::{RenderTarget, RenderTargetPool, TargetLease, TargetPoolStats};
