//! Chart Viewer Widget
//! Scrollable panel displaying one rendered figure as a texture.

use egui::{ColorImage, RichText, ScrollArea, TextureHandle, TextureOptions};
use image::RgbImage;

/// Scrollable display area for a rendered figure.
/// The texture is uploaded lazily on the first frame.
#[derive(Default)]
pub struct ChartViewer {
    image: Option<RgbImage>,
    texture: Option<TextureHandle>,
}

impl ChartViewer {
    pub fn new(image: RgbImage) -> Self {
        Self {
            image: Some(image),
            texture: None,
        }
    }

    pub fn image(&self) -> Option<&RgbImage> {
        self.image.as_ref()
    }

    /// Pixel size of the figure, if any.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| (img.width(), img.height()))
    }

    pub fn show(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let Some(image) = &self.image else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Figure").size(20.0));
            });
            return;
        };

        let texture = self.texture.get_or_insert_with(|| {
            let size = [image.width() as usize, image.height() as usize];
            let color_image = ColorImage::from_rgb(size, image.as_raw());
            ctx.load_texture("figure", color_image, TextureOptions::LINEAR)
        });

        ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.image((texture.id(), texture.size_vec2()));
            });
    }
}
