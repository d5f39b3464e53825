//! Lighting rig for icon rendering
//!
//! The rig is part of the session render context and never changes between
//! render calls: one directional key light plus a flat ambient term.

use crate::foundation::math::{utils, Vec3};

/// Intensity of the icon key light
pub const KEY_LIGHT_INTENSITY: f32 = 1.2;

/// Euler rotation (degrees) of the icon key light
pub const KEY_LIGHT_ROTATION_DEGREES: [f32; 3] = [50.0, 50.0, 0.0];

/// Ambient contribution added to every lit fragment
pub const AMBIENT_INTENSITY: f32 = 0.25;

/// Directional light source
#[derive(Debug, Clone)]
pub struct Light {
    /// Direction the light travels (normalized)
    pub direction: Vec3,
    /// Light color
    pub color: Vec3,
    /// Light intensity
    pub intensity: f32,
}

impl Light {
    /// Create a directional light
    pub fn directional(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            direction: direction.normalize(),
            color,
            intensity,
        }
    }

    /// Lambert term for a surface normal, in `[0, intensity]`
    pub fn diffuse(&self, normal: &Vec3) -> f32 {
        normal.dot(&(-self.direction)).max(0.0) * self.intensity
    }
}

/// Lighting environment containing the key light and ambient term
#[derive(Debug, Clone)]
pub struct LightingEnvironment {
    /// Lights in the rig
    pub lights: Vec<Light>,
    /// Ambient light color
    pub ambient_color: Vec3,
    /// Ambient light intensity
    pub ambient_intensity: f32,
}

impl LightingEnvironment {
    /// Create a new empty lighting environment
    pub fn new() -> Self {
        Self {
            lights: Vec::new(),
            ambient_color: Vec3::new(1.0, 1.0, 1.0),
            ambient_intensity: AMBIENT_INTENSITY,
        }
    }

    /// Add a light to the environment
    #[must_use]
    pub fn add_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    /// The fixed rig used for every icon: a white key light from above-right
    pub fn icon_key_light() -> Self {
        let rotation = utils::euler_degrees_to_quat(Vec3::from(KEY_LIGHT_ROTATION_DEGREES));
        Self::new().add_light(Light::directional(
            rotation * utils::forward_axis(),
            Vec3::new(1.0, 1.0, 1.0),
            KEY_LIGHT_INTENSITY,
        ))
    }

    /// Total light reaching a surface with the given normal, per RGB channel
    pub fn irradiance(&self, normal: &Vec3) -> Vec3 {
        self.lights.iter().fold(
            self.ambient_color * self.ambient_intensity,
            |acc, light| acc + light.color * light.diffuse(normal),
        )
    }
}

impl Default for LightingEnvironment {
    fn default() -> Self {
        Self::icon_key_light()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_key_light_points_down() {
        let rig = LightingEnvironment::icon_key_light();
        assert_eq!(rig.lights.len(), 1);
        assert!(rig.lights[0].direction.y < 0.0);
        assert_relative_eq!(rig.lights[0].direction.norm(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_irradiance_never_below_ambient() {
        let rig = LightingEnvironment::icon_key_light();
        let away = rig.lights[0].direction;
        let facing = -rig.lights[0].direction;

        assert_relative_eq!(rig.irradiance(&away).x, AMBIENT_INTENSITY, epsilon = 1e-5);
        assert_relative_eq!(
            rig.irradiance(&facing).x,
            AMBIENT_INTENSITY + KEY_LIGHT_INTENSITY,
            epsilon = 1e-5
        );
    }
}
