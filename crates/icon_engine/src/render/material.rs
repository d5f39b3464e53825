//! Surface material carried by an asset's mesh renderers

/// Material properties used by the icon rasterizer
///
/// Only the authored base colour and opacity are honoured; icons are lit by
/// the context's fixed key light, not by per-material shading models.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base color (RGB, linear 0..1)
    pub base_color: [f32; 3],

    /// Alpha/transparency (0.0 = transparent, 1.0 = opaque)
    pub alpha: f32,
}

impl Material {
    /// Create a new material with default properties
    pub fn new() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0], // White
            alpha: 1.0,
        }
    }

    /// Set the base color
    #[must_use]
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = [r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0)];
        self
    }

    /// Set the alpha/transparency
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}
