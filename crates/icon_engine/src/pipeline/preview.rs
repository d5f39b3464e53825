//! Single-asset preview
//!
//! Renders the currently selected asset at a fixed size so settings can be
//! judged before a batch is run. Only one preview image is held at a time.

use crate::animation::AnimationSelection;
use crate::pipeline::batch::render_icon;
use crate::render::camera::RenderSettings;
use crate::render::context::RenderContext;
use crate::render::pixel_buffer::PixelBuffer;
use crate::scene::asset::IconAsset;

/// Edge length of preview images in pixels
pub const PREVIEW_RESOLUTION: u32 = 256;

/// Holds the selected asset and its preview image
///
/// Every change of selection or settings re-renders the preview before
/// returning, so [`PreviewRenderer::preview`] never shows a stale image.
#[derive(Debug)]
pub struct PreviewRenderer {
    settings: RenderSettings,
    animation: AnimationSelection,
    selection: Option<IconAsset>,
    current: Option<PixelBuffer>,
}

impl PreviewRenderer {
    /// Create a preview using the framing of `settings`
    ///
    /// The resolution of `settings` is ignored; previews are always
    /// [`PREVIEW_RESOLUTION`] pixels square.
    pub fn new(settings: &RenderSettings, animation: AnimationSelection) -> Self {
        Self {
            settings: Self::preview_settings(settings),
            animation,
            selection: None,
            current: None,
        }
    }

    fn preview_settings(settings: &RenderSettings) -> RenderSettings {
        RenderSettings {
            resolution: PREVIEW_RESOLUTION,
            ..settings.clone()
        }
    }

    /// Settings used for previews
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Currently selected asset
    pub fn selection(&self) -> Option<&IconAsset> {
        self.selection.as_ref()
    }

    /// Replace framing settings and animation, then re-render
    pub fn configure(
        &mut self,
        ctx: &mut RenderContext,
        settings: &RenderSettings,
        animation: AnimationSelection,
    ) -> Option<&PixelBuffer> {
        self.settings = Self::preview_settings(settings);
        self.animation = animation;
        self.update(ctx)
    }

    /// Change the selected asset, then re-render
    ///
    /// Selecting nothing clears the preview.
    pub fn select(&mut self, ctx: &mut RenderContext, selection: Option<&IconAsset>) -> Option<&PixelBuffer> {
        self.selection = selection.cloned();
        self.update(ctx)
    }

    /// Current preview image, if any
    pub fn preview(&self) -> Option<&PixelBuffer> {
        self.current.as_ref()
    }

    /// Drop the current preview and the selection
    pub fn clear(&mut self) {
        self.selection = None;
        self.current = None;
    }

    /// Re-render the preview of the selected asset
    ///
    /// The previous image is released first. With no selection, or when the
    /// render fails, no preview is installed afterwards.
    pub fn update(&mut self, ctx: &mut RenderContext) -> Option<&PixelBuffer> {
        self.current = None;
        let asset = self.selection.as_ref()?;

        if let Err(err) = self.settings.validate() {
            log::error!("Preview settings are invalid: {err}");
            return None;
        }

        let mut warnings = Vec::new();
        match render_icon(ctx, asset, &self.settings, &self.animation, &mut warnings) {
            Ok(icon) => {
                log::debug!("Preview updated for '{}'", asset.name);
                self.current = Some(icon.pixels);
            }
            Err(err) => log::error!("Preview failed for '{}': {err}", asset.name),
        }
        self.current.as_ref()
    }
}
