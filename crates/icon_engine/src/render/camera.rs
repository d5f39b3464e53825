//! # Icon Camera Framing
//!
//! Derives an orthographic camera that frames an object's bounding volume from
//! a fixed viewing angle, and the camera state the renderer uses to project
//! geometry.
//!
//! ## Design Principles
//! - **Pure framing**: [`CameraFramer::place_camera`] depends only on its inputs
//! - **Bounds-driven**: the largest side of the bounds sets both distance and extent
//! - **Fixed convention**: right-handed Y-up, the camera looks down its local -Z

use thiserror::Error;

use crate::foundation::math::{utils, Mat4, Mat4Ext, Quat, Vec3};
use crate::scene::bounds::BoundingVolume;

/// Distance from the camera to the near clipping plane
pub const NEAR_PLANE: f32 = 0.1;

/// Camera distance as a multiple of the largest bounds side
pub const DISTANCE_FACTOR: f32 = 2.0;

/// Far plane as a multiple of the camera distance
pub const FAR_PLANE_FACTOR: f32 = 2.0;

/// Invalid render settings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// Resolution must be positive
    #[error("resolution must be greater than zero")]
    ZeroResolution,

    /// A numeric setting is NaN or infinite
    #[error("{0} must be finite")]
    NonFinite(&'static str),

    /// Padding at or below -1 collapses the orthographic extent
    #[error("padding {0} must be greater than -1")]
    PaddingTooSmall(f32),
}

/// Parameters shared by every icon of a render run
///
/// Immutable for the duration of a render call. Defaults reproduce the classic
/// icon look: 512 px, viewed from above-front-left with 10% padding.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Width and height of the output image in pixels
    pub resolution: u32,
    /// Camera Euler angles in degrees (pitch, yaw, roll)
    pub camera_rotation_degrees: Vec3,
    /// World-space offset added to the framed camera position
    pub camera_position_offset: Vec3,
    /// Fractional margin around the object (negative crops)
    pub padding: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resolution: 512,
            camera_rotation_degrees: Vec3::new(30.0, -135.0, 0.0),
            camera_position_offset: Vec3::zeros(),
            padding: 0.1,
        }
    }
}

impl RenderSettings {
    /// Settings with a given resolution and default framing
    pub fn with_resolution(resolution: u32) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }

    /// Check the settings before a render run
    ///
    /// Rejects a zero resolution, non-finite numbers and padding at or below
    /// `-1`. Negative padding above `-1` is allowed and crops the object.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.resolution == 0 {
            return Err(SettingsError::ZeroResolution);
        }
        if !self.camera_rotation_degrees.iter().all(|v| v.is_finite()) {
            return Err(SettingsError::NonFinite("camera rotation"));
        }
        if !self.camera_position_offset.iter().all(|v| v.is_finite()) {
            return Err(SettingsError::NonFinite("camera offset"));
        }
        if !self.padding.is_finite() {
            return Err(SettingsError::NonFinite("padding"));
        }
        if self.padding <= -1.0 {
            return Err(SettingsError::PaddingTooSmall(self.padding));
        }
        Ok(())
    }
}

/// Where and how the camera sees one object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPlacement {
    /// Camera orientation
    pub rotation: Quat,
    /// Camera position in world space
    pub position: Vec3,
    /// Half the visible height of the orthographic view volume
    pub orthographic_half_height: f32,
    /// Near clipping distance
    pub near_plane: f32,
    /// Far clipping distance
    pub far_plane: f32,
    /// Distance between the bounds center and the unoffset camera position
    pub distance: f32,
}

impl CameraPlacement {
    /// Unit vector the camera looks along
    pub fn forward(&self) -> Vec3 {
        self.rotation * utils::forward_axis()
    }
}

/// Computes camera placements from bounds and settings
pub struct CameraFramer;

impl CameraFramer {
    /// Frame `bounds` according to `settings`
    ///
    /// The camera backs away from the bounds center along its forward axis by
    /// twice the largest bounds side, then shifts by the configured offset. The
    /// orthographic half-height is half the largest side grown by the padding.
    ///
    /// # Arguments
    /// * `bounds` - World-space bounds of the posed instance
    /// * `settings` - Rotation, offset and padding to apply
    ///
    /// # Example
    /// ```
    /// use icon_engine::foundation::math::Vec3;
    /// use icon_engine::render::camera::{CameraFramer, RenderSettings};
    /// use icon_engine::scene::bounds::BoundingVolume;
    ///
    /// let bounds = BoundingVolume::new(Vec3::zeros(), Vec3::new(2.0, 1.0, 1.0));
    /// let placement = CameraFramer::place_camera(&bounds, &RenderSettings::default());
    /// assert_eq!(placement.distance, 4.0);
    /// assert_eq!(placement.far_plane, 8.0);
    /// ```
    pub fn place_camera(bounds: &BoundingVolume, settings: &RenderSettings) -> CameraPlacement {
        let max_extent = bounds.max_extent();
        let distance = max_extent * DISTANCE_FACTOR;

        let rotation = utils::euler_degrees_to_quat(settings.camera_rotation_degrees);
        let forward = rotation * utils::forward_axis();
        let base_position = bounds.center - forward * distance;

        let placement = CameraPlacement {
            rotation,
            position: base_position + settings.camera_position_offset,
            orthographic_half_height: (max_extent / 2.0) * (1.0 + settings.padding),
            near_plane: NEAR_PLANE,
            far_plane: distance * FAR_PLANE_FACTOR,
            distance,
        };
        log::trace!("Camera placement for {bounds:?}: {placement:?}");
        placement
    }
}

/// Orthographic camera state held by the render context
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Camera orientation
    pub rotation: Quat,
    /// Half the visible height
    pub half_height: f32,
    /// Near clipping distance
    pub near: f32,
    /// Far clipping distance
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            half_height: 1.0,
            near: NEAR_PLANE,
            far: 100.0,
        }
    }
}

impl Camera {
    /// Adopt a framed placement
    pub fn set_placement(&mut self, placement: &CameraPlacement) {
        self.position = placement.position;
        self.rotation = placement.rotation;
        self.half_height = placement.orthographic_half_height;
        self.near = placement.near_plane;
        self.far = placement.far_plane;
    }

    /// Whether the view volume has positive finite extent and depth
    pub fn is_valid(&self) -> bool {
        self.half_height.is_finite()
            && self.half_height > 0.0
            && self.near.is_finite()
            && self.far.is_finite()
            && self.far > self.near
    }

    /// World-to-view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::view_from_pose(self.position, &self.rotation)
    }

    /// View-to-clip matrix for a target with the given aspect ratio
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::orthographic(self.half_height * aspect, self.half_height, self.near, self.far)
    }

    /// Combined world-to-clip matrix
    pub fn view_projection_matrix(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}
