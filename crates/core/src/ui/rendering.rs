//! Drawing helpers shared by the studio panels.

use super::state::TextureSlot;
use crate::catalog::ColorPalette;
use crate::encoding::EncodedImage;
use crate::error::Result;
use eframe::egui;

pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(34, 211, 238);
const PANEL_FILL: egui::Color32 = egui::Color32::from_rgb(31, 41, 55);
const BANNER_FILL: egui::Color32 = egui::Color32::from_rgb(127, 29, 29);

/// Converts an encoded image into an egui texture.
pub fn load_texture(ctx: &egui::Context, name: &str, image: &EncodedImage) -> Result<egui::TextureHandle> {
    let decoded = image.to_image()?;
    let rgba = decoded.to_rgba8();
    let size = [decoded.width() as usize, decoded.height() as usize];
    let pixels = rgba.as_flat_samples();
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());

    Ok(ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR))
}

/// Keeps `slot` in sync with `image`, re-uploading only when the image changed.
pub fn sync_texture(
    ctx: &egui::Context,
    slot: &mut Option<TextureSlot>,
    name: &str,
    image: Option<&EncodedImage>,
) {
    match image {
        None => *slot = None,
        Some(image) => {
            if slot.as_ref().is_some_and(|s| &s.source == image) {
                return;
            }
            let handle = match load_texture(ctx, name, image) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    tracing::warn!(error = %e, texture = name, "Could not display image");
                    None
                }
            };
            *slot = Some(TextureSlot {
                source: image.clone(),
                handle,
            });
        }
    }
}

/// Titled image box with a loading and an empty state.
pub fn image_frame(ui: &mut egui::Ui, title: &str, slot: Option<&TextureSlot>, loading: bool) {
    ui.vertical(|ui| {
        ui.label(egui::RichText::new(title).strong());
        egui::Frame::default()
            .fill(egui::Color32::from_rgb(17, 24, 39))
            .stroke(egui::Stroke::new(1.0, egui::Color32::DARK_GRAY))
            .inner_margin(6.0)
            .show(ui, |ui| {
                ui.set_min_size(egui::vec2(240.0, 240.0));
                if loading {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Generating...");
                    });
                    return;
                }
                match slot {
                    Some(TextureSlot {
                        handle: Some(handle),
                        ..
                    }) => {
                        ui.add(
                            egui::Image::from_texture(egui::load::SizedTexture::from_handle(handle))
                                .max_width(360.0)
                                .shrink_to_fit(),
                        );
                    }
                    Some(TextureSlot { handle: None, .. }) => {
                        ui.colored_label(egui::Color32::LIGHT_RED, "This image cannot be displayed");
                    }
                    None => {
                        ui.weak("Your image will appear here");
                    }
                }
            });
    });
}

/// Round color swatch. Returns the click response.
pub fn color_swatch(ui: &mut egui::Ui, palette: ColorPalette, selected: bool) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(28.0, 28.0), egui::Sense::click());
    let [r, g, b] = palette.swatch();
    let painter = ui.painter();
    painter.circle_filled(rect.center(), 12.0, egui::Color32::from_rgb(r, g, b));
    if selected {
        painter.circle_stroke(rect.center(), 13.5, egui::Stroke::new(2.0, ACCENT));
    } else if response.hovered() {
        painter.circle_stroke(rect.center(), 13.0, egui::Stroke::new(1.0, egui::Color32::GRAY));
    }
    response.on_hover_text(palette.name())
}

/// Red dismissable banner. Returns true when the user dismissed it.
pub fn error_banner(ui: &mut egui::Ui, message: &str) -> bool {
    let mut dismissed = false;
    egui::Frame::default()
        .fill(BANNER_FILL)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Error:").strong().color(egui::Color32::WHITE));
                ui.label(egui::RichText::new(message).color(egui::Color32::from_rgb(254, 202, 202)));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    dismissed = ui.button("✕").clicked();
                });
            });
        });
    dismissed
}

/// Bordered card used for the control and result columns.
pub fn card<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    egui::Frame::default()
        .fill(PANEL_FILL)
        .stroke(egui::Stroke::new(1.0, egui::Color32::GRAY))
        .inner_margin(12.0)
        .show(ui, add_contents)
        .inner
}
