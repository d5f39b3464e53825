//! Math utilities and types
//!
//! Provides the fundamental math types used by framing and rasterization.
//! All world-space math is right-handed and Y-up; cameras look down their
//! local -Z axis.

pub use nalgebra::{
    Vector3,
    Matrix4,
    Quaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position relative to the parent
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder pattern: set rotation
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: set scale
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to a transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Point3) -> Point3 {
        self.to_matrix().transform_point(&point)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Quat, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Axis a camera or light looks along when its rotation is identity
    pub fn forward_axis() -> Vec3 {
        Vec3::new(0.0, 0.0, -1.0)
    }

    /// Build a rotation from editor-style Euler angles in degrees
    ///
    /// Angles are `(pitch, yaw, roll)` around X, Y and Z. Roll is applied first,
    /// then pitch, then yaw. The convention matches content tools that author
    /// in a left-handed space, mirrored into this crate's right-handed space:
    /// positive pitch tilts the view down and positive yaw turns it clockwise
    /// when seen from above.
    ///
    /// # Example
    /// ```
    /// use icon_engine::foundation::math::{utils, Vec3};
    ///
    /// let rotation = utils::euler_degrees_to_quat(Vec3::new(90.0, 0.0, 0.0));
    /// let forward = rotation * utils::forward_axis();
    /// assert!((forward.y + 1.0).abs() < 1e-5); // looking straight down
    /// ```
    pub fn euler_degrees_to_quat(degrees: Vec3) -> Quat {
        let pitch = Quat::from_axis_angle(&Vec3::x_axis(), -deg_to_rad(degrees.x));
        let yaw = Quat::from_axis_angle(&Vec3::y_axis(), -deg_to_rad(degrees.y));
        let roll = Quat::from_axis_angle(&Vec3::z_axis(), deg_to_rad(degrees.z));
        yaw * pitch * roll
    }
}

/// Extension trait for Mat4 with projection helpers
pub trait Mat4Ext {
    /// Create an orthographic projection matrix
    ///
    /// Maps view-space `x` in `[-half_width, half_width]` and `y` in
    /// `[-half_height, half_height]` to NDC `[-1, 1]`, and view depth
    /// `-z` in `[near, far]` to `[0, 1]`.
    fn orthographic(half_width: f32, half_height: f32, near: f32, far: f32) -> Mat4;

    /// Create a view matrix from a camera position and rotation
    fn view_from_pose(position: Vec3, rotation: &Quat) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn orthographic(half_width: f32, half_height: f32, near: f32, far: f32) -> Mat4 {
        let depth = far - near;
        Mat4::new(
            1.0 / half_width, 0.0, 0.0, 0.0,
            0.0, 1.0 / half_height, 0.0, 0.0,
            0.0, 0.0, -1.0 / depth, -near / depth,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn view_from_pose(position: Vec3, rotation: &Quat) -> Mat4 {
        let inverse_rotation = rotation.inverse();
        inverse_rotation.to_homogeneous() * Mat4::new_translation(&(-position))
    }
}
