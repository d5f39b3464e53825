//! Offscreen icon renderer
//!
//! Renders exactly one registered instance through the session context into a
//! freshly leased target and reads the result back into a [`PixelBuffer`].

use thiserror::Error;

use crate::foundation::collections::InstanceKey;
use crate::foundation::math::utils;
use crate::render::camera::CameraPlacement;
use crate::render::context::RenderContext;
use crate::render::mesh::MeshError;
use crate::render::pixel_buffer::PixelBuffer;
use crate::render::rasterizer::{DrawStats, Rasterizer};

/// Render failures for a single instance
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Resolution must be positive
    #[error("invalid resolution {0}")]
    InvalidResolution(u32),

    /// The instance is not registered in the context
    #[error("instance is not registered in the render context")]
    UnknownInstance,

    /// The placement produces an empty or non-finite view volume
    #[error("degenerate projection: half-height {half_height}, near {near}, far {far}")]
    DegenerateProjection {
        /// Orthographic half-height
        half_height: f32,
        /// Near plane
        near: f32,
        /// Far plane
        far: f32,
    },

    /// A part of the instance has unusable geometry
    #[error("malformed mesh on node '{node}': {source}")]
    MalformedMesh {
        /// Name of the node carrying the mesh
        node: String,
        /// What is wrong with it
        #[source]
        source: MeshError,
    },
}

/// Renders one instance to pixels
pub struct OffscreenRenderer;

impl OffscreenRenderer {
    /// Render `instance` from `placement` into a `resolution × resolution` image
    ///
    /// The context camera is left configured to `placement`. The leased render
    /// target is returned to the pool on every path, including errors.
    pub fn render(
        ctx: &mut RenderContext,
        instance: InstanceKey,
        placement: &CameraPlacement,
        resolution: u32,
    ) -> Result<PixelBuffer, RenderError> {
        if resolution == 0 {
            return Err(RenderError::InvalidResolution(resolution));
        }

        let RenderContext {
            camera,
            lighting,
            targets,
            instances,
            ..
        } = ctx;

        let object = instances.get(instance).ok_or(RenderError::UnknownInstance)?;

        camera.set_placement(placement);
        if !camera.is_valid() {
            return Err(RenderError::DegenerateProjection {
                half_height: camera.half_height,
                near: camera.near,
                far: camera.far,
            });
        }

        let parts = object.world_parts();
        for part in &parts {
            part.renderer.mesh.validate().map_err(|source| RenderError::MalformedMesh {
                node: object
                    .node(part.node)
                    .map(|n| n.name.clone())
                    .unwrap_or_default(),
                source,
            })?;
        }

        let mut target = targets.lease(resolution);
        target.clear();

        let view_projection = camera.view_projection_matrix(1.0);
        let view_direction = camera.rotation * utils::forward_axis();
        let mut rasterizer = Rasterizer::new(&mut target, view_projection, view_direction, lighting);

        let mut stats = DrawStats::default();
        for part in &parts {
            stats += rasterizer.draw_mesh(&part.renderer.mesh, &part.world, &part.renderer.material);
        }
        log::trace!(
            "Rendered '{}' at {resolution}px: {} triangles, {} fragments",
            object.name(),
            stats.triangles,
            stats.fragments
        );

        Ok(PixelBuffer::read_back(&target))
    }
}
